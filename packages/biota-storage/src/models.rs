use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// Columns selected for every `species` read. Excludes the generated `search_vector`.
pub const SPECIES_COLUMNS: &str = "\
id, scientific_name, common_name, slug, kingdom, phylum, class, \"order\", family, genus, \
species, description, morphology, habitat_description, conservation_status, iucn_status, \
featured, image_urls, habitat_map_coords, created_at, updated_at";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SpeciesRow {
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
	pub image_urls: Option<Value>,
	pub habitat_map_coords: Option<Value>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// A `species` row plus the window count of the query that produced it.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CountedSpeciesRow {
	#[sqlx(flatten)]
	pub(crate) species: SpeciesRow,
	pub(crate) total_count: i64,
}

/// One row of `search_species(search_query)`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankedRow {
	pub id: Option<Uuid>,
	pub rank: Option<f32>,
}

#[derive(Debug)]
pub struct BasicPage {
	pub rows: Vec<SpeciesRow>,
	pub total: u64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaxonomyRow {
	pub id: Uuid,
	pub species_id: Uuid,
	pub kingdom: Option<String>,
	pub phylum: Option<String>,
	pub class: Option<String>,
	pub order: Option<String>,
	pub family: Option<String>,
	pub genus: Option<String>,
	pub species: Option<String>,
	pub subspecies: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConservationRow {
	pub id: Uuid,
	pub species_id: Uuid,
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
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SpeciesImageRow {
	pub id: Uuid,
	pub species_id: Uuid,
	pub image_url: String,
	pub alt_text: Option<String>,
	pub caption: Option<String>,
	pub photographer: Option<String>,
	pub license: Option<String>,
	pub is_primary: bool,
	pub sort_order: i32,
	pub created_at: OffsetDateTime,
}
