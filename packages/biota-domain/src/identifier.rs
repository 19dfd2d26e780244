use uuid::{Uuid, Variant};

/// How a species detail identifier is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeciesKey {
	Id(Uuid),
	Slug(String),
}
impl SpeciesKey {
	/// Hyphenated RFC 4122 UUIDs of versions 1 through 5 are ids; everything else is a slug.
	pub fn parse(identifier: &str) -> Self {
		let identifier = identifier.trim();

		if identifier.len() == 36
			&& let Ok(id) = Uuid::try_parse(identifier)
			&& (1..=5).contains(&id.get_version_num())
			&& id.get_variant() == Variant::RFC4122
		{
			return Self::Id(id);
		}

		Self::Slug(identifier.to_string())
	}
}
