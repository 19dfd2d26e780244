use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use biota_storage::models::{ConservationRow, SpeciesImageRow, SpeciesRow, TaxonomyRow};

/// A catalog entry as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
	pub id: Uuid,
	pub scientific_name: String,
	pub common_name: Option<String>,
	pub slug: String,
	pub kingdom: Option<String>,
	pub phylum: Option<String>,
	pub class: Option<String>,
	pub order: Option<String>,
	pub family: Option<String>,
	pub genus: Option<String>,
	pub species: Option<String>,
	pub description: Option<String>,
	pub morphology: Option<String>,
	pub habitat_description: Option<String>,
	pub conservation_status: Option<String>,
	pub iucn_status: Option<String>,
	pub featured: bool,
	pub image_urls: Vec<String>,
	pub habitat_map_coords: Option<Value>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<SpeciesRow> for Species {
	fn from(row: SpeciesRow) -> Self {
		Self {
			id: row.id,
			scientific_name: row.scientific_name,
			common_name: row.common_name,
			slug: row.slug,
			kingdom: row.kingdom,
			phylum: row.phylum,
			class: row.class,
			order: row.order,
			family: row.family,
			genus: row.genus,
			species: row.species,
			description: row.description,
			morphology: row.morphology,
			habitat_description: row.habitat_description,
			conservation_status: row.conservation_status,
			iucn_status: row.iucn_status,
			featured: row.featured,
			image_urls: normalize_image_urls(row.image_urls),
			habitat_map_coords: normalize_coords(row.habitat_map_coords),
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyHierarchy {
	pub kingdom: Option<String>,
	pub phylum: Option<String>,
	pub class: Option<String>,
	pub order: Option<String>,
	pub family: Option<String>,
	pub genus: Option<String>,
	pub species: Option<String>,
	pub subspecies: Option<String>,
}
impl From<TaxonomyRow> for TaxonomyHierarchy {
	fn from(row: TaxonomyRow) -> Self {
		Self {
			kingdom: row.kingdom,
			phylum: row.phylum,
			class: row.class,
			order: row.order,
			family: row.family,
			genus: row.genus,
			species: row.species,
			subspecies: row.subspecies,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConservationData {
	pub iucn_status: Option<String>,
	pub iucn_category: Option<String>,
	pub population_trend: Option<String>,
	pub population_size: Option<String>,
	pub threat_level: Option<String>,
	pub threats: Vec<String>,
	pub conservation_actions: Vec<String>,
	pub habitat_protection: Option<bool>,
	pub last_assessed: Option<String>,
	pub assessor: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<ConservationRow> for ConservationData {
	fn from(row: ConservationRow) -> Self {
		Self {
			iucn_status: row.iucn_status,
			iucn_category: row.iucn_category,
			population_trend: row.population_trend,
			population_size: row.population_size,
			threat_level: row.threat_level,
			threats: row.threats,
			conservation_actions: row.conservation_actions,
			habitat_protection: row.habitat_protection,
			last_assessed: row.last_assessed,
			assessor: row.assessor,
			updated_at: row.updated_at,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesImage {
	pub id: Uuid,
	pub image_url: String,
	pub alt_text: Option<String>,
	pub caption: Option<String>,
	pub photographer: Option<String>,
	pub license: Option<String>,
	pub is_primary: bool,
	pub sort_order: i32,
}
impl From<SpeciesImageRow> for SpeciesImage {
	fn from(row: SpeciesImageRow) -> Self {
		Self {
			id: row.id,
			image_url: row.image_url,
			alt_text: row.alt_text,
			caption: row.caption,
			photographer: row.photographer,
			license: row.license,
			is_primary: row.is_primary,
			sort_order: row.sort_order,
		}
	}
}

/// A species with its detail sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDetail {
	#[serde(flatten)]
	pub species: Species,
	pub taxonomy: Option<TaxonomyHierarchy>,
	pub conservation: Option<ConservationData>,
	pub images: Vec<SpeciesImage>,
}

// Stored as loose JSON; anything but an array of strings collapses to an empty list.
fn normalize_image_urls(value: Option<Value>) -> Vec<String> {
	match value {
		Some(Value::Array(items)) =>
			items.into_iter().filter_map(|item| item.as_str().map(str::to_string)).collect(),
		_ => Vec::new(),
	}
}

fn normalize_coords(value: Option<Value>) -> Option<Value> {
	value.filter(Value::is_object)
}
