use serde::{Deserialize, Serialize};

/// Structured, non-text predicates applied in both search modes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilters {
	pub featured: bool,
	/// Case-insensitive substring match against the record's kingdom.
	pub kingdom: Option<String>,
	/// Exact match against the record's IUCN status code.
	pub iucn_status: Option<String>,
}
impl CatalogFilters {
	/// Builds filters from raw request values. Blank strings count as absent.
	pub fn new(featured: bool, kingdom: Option<&str>, iucn_status: Option<&str>) -> Self {
		Self { featured, kingdom: non_blank(kingdom), iucn_status: non_blank(iucn_status) }
	}

	pub fn featured_only() -> Self {
		Self { featured: true, ..Self::default() }
	}

	pub fn is_empty(&self) -> bool {
		!self.featured && self.kingdom.is_none() && self.iucn_status.is_none()
	}

	/// Reference semantics of the filters, mirrored by the SQL predicates in storage.
	pub fn matches(
		&self,
		featured: bool,
		kingdom: Option<&str>,
		iucn_status: Option<&str>,
	) -> bool {
		if self.featured && !featured {
			return false;
		}
		if let Some(wanted) = self.kingdom.as_deref() {
			let Some(kingdom) = kingdom else {
				return false;
			};

			if !kingdom.to_lowercase().contains(&wanted.to_lowercase()) {
				return false;
			}
		}
		if let Some(wanted) = self.iucn_status.as_deref()
			&& iucn_status != Some(wanted)
		{
			return false;
		}

		true
	}
}

fn non_blank(value: Option<&str>) -> Option<String> {
	value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}
