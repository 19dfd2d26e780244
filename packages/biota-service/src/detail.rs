use tracing::{debug, warn};
use uuid::Uuid;

use biota_domain::identifier::SpeciesKey;

use crate::{BiotaService, Error, Result, SpeciesDetail};

impl BiotaService {
	/// Looks a species up by id or slug and attaches its taxonomy, conservation and image
	/// sections.
	pub async fn species_detail(&self, identifier: &str) -> Result<SpeciesDetail> {
		let identifier = identifier.trim();

		if identifier.is_empty() {
			return Err(Error::InvalidRequest {
				message: "Species identifier must be non-empty.".to_string(),
			});
		}

		let key = SpeciesKey::parse(identifier);
		let Some(species) = self.store.find_by_key(&key).await? else {
			return Err(Error::NotFound { message: format!("Species {identifier} not found.") });
		};
		let (taxonomy, conservation, images) = tokio::join!(
			self.store.taxonomy(species.id),
			self.store.conservation(species.id),
			self.store.images(species.id),
		);
		// A failed section is served as missing; the species record itself is still returned.
		let taxonomy = section_or(taxonomy, species.id, "taxonomy", None);
		let conservation = section_or(conservation, species.id, "conservation", None);
		let images = section_or(images, species.id, "images", Vec::new());

		debug!(species_id = %species.id, images = images.len(), "Species detail served.");

		Ok(SpeciesDetail { species, taxonomy, conservation, images })
	}
}

fn section_or<T>(result: Result<T>, species_id: Uuid, section: &'static str, missing: T) -> T {
	match result {
		Ok(value) => value,
		Err(err) => {
			warn!(error = %err, %species_id, section, "Species detail section unavailable.");

			missing
		},
	}
}
