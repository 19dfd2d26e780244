pub mod catalog;
pub mod detail;
pub mod species;
pub mod time_serde;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

pub use biota_domain::{CatalogFilters, PageWindow, identifier::SpeciesKey};
pub use biota_storage::queries::BasicSearch;
pub use catalog::{
	CatalogRequest, EnvelopeFilters, EnvelopeMetadata, FallbackReason, FeaturedRequest,
	QuickSearchRequest, RankedAttempt, RankedPage, ResultEnvelope, SearchMode, SearchQuery,
};
pub use error::{Error, Result};
pub use species::{ConservationData, Species, SpeciesDetail, SpeciesImage, TaxonomyHierarchy};

use biota_config::Config;
use biota_storage::{db::Db, queries};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One relevance-ranked candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedHit {
	pub id: Uuid,
	pub rank: f32,
}

/// A page of the fallback query with the exact number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicResults {
	pub records: Vec<Species>,
	pub total: u64,
}

/// Full-text ranking collaborator.
pub trait RankProvider
where
	Self: Send + Sync,
{
	/// Candidate hits for a non-empty, sanitized term, ordered by descending rank.
	fn rank<'a>(&'a self, term: &'a str) -> BoxFuture<'a, Result<Vec<RankedHit>>>;
}

/// Read access to the species record store.
pub trait CatalogStore
where
	Self: Send + Sync,
{
	/// Bulk fetch. The returned order is unspecified and missing ids are omitted.
	fn find_by_ids<'a>(&'a self, ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Species>>>;

	/// The subset of `ids` that satisfies `filters`, in unspecified order.
	fn exists_filtered<'a>(
		&'a self,
		ids: &'a [Uuid],
		filters: &'a CatalogFilters,
	) -> BoxFuture<'a, Result<Vec<Uuid>>>;

	fn search_basic<'a>(&'a self, search: BasicSearch<'a>) -> BoxFuture<'a, Result<BasicResults>>;

	fn find_by_key<'a>(&'a self, key: &'a SpeciesKey) -> BoxFuture<'a, Result<Option<Species>>>;

	fn taxonomy(&self, species_id: Uuid) -> BoxFuture<'_, Result<Option<TaxonomyHierarchy>>>;

	fn conservation(&self, species_id: Uuid) -> BoxFuture<'_, Result<Option<ConservationData>>>;

	fn images(&self, species_id: Uuid) -> BoxFuture<'_, Result<Vec<SpeciesImage>>>;
}

/// Postgres-backed store and ranker.
pub struct PgCatalog {
	db: Arc<Db>,
}
impl PgCatalog {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}

	async fn rank_hits(&self, term: &str) -> Result<Vec<RankedHit>> {
		let rows = queries::rank_search(&self.db, term)
			.await
			.map_err(|err| Error::RankProvider { message: err.to_string() })?;

		Ok(rows
			.into_iter()
			.filter_map(|row| row.id.map(|id| RankedHit { id, rank: row.rank.unwrap_or(0.0) }))
			.collect())
	}

	async fn species_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Species>> {
		let rows = queries::find_by_ids(&self.db, ids).await?;

		Ok(rows.into_iter().map(Species::from).collect())
	}

	async fn allowed_ids(&self, ids: &[Uuid], filters: &CatalogFilters) -> Result<Vec<Uuid>> {
		Ok(queries::exists_filtered(&self.db, ids, filters).await?)
	}

	async fn basic_page(&self, search: BasicSearch<'_>) -> Result<BasicResults> {
		let page = queries::search_basic(&self.db, search).await?;

		let records = page.rows.into_iter().map(Species::from).collect();

		Ok(BasicResults { records, total: page.total })
	}

	async fn species_by_key(&self, key: &SpeciesKey) -> Result<Option<Species>> {
		let row = match key {
			SpeciesKey::Id(id) => queries::find_by_id(&self.db, *id).await?,
			SpeciesKey::Slug(slug) => queries::find_by_slug(&self.db, slug).await?,
		};

		Ok(row.map(Species::from))
	}

	async fn taxonomy_section(&self, species_id: Uuid) -> Result<Option<TaxonomyHierarchy>> {
		Ok(queries::taxonomy_for(&self.db, species_id).await?.map(TaxonomyHierarchy::from))
	}

	async fn conservation_section(&self, species_id: Uuid) -> Result<Option<ConservationData>> {
		Ok(queries::conservation_for(&self.db, species_id).await?.map(ConservationData::from))
	}

	async fn image_section(&self, species_id: Uuid) -> Result<Vec<SpeciesImage>> {
		let rows = queries::images_for(&self.db, species_id).await?;

		Ok(rows.into_iter().map(SpeciesImage::from).collect())
	}
}

impl RankProvider for PgCatalog {
	fn rank<'a>(&'a self, term: &'a str) -> BoxFuture<'a, Result<Vec<RankedHit>>> {
		Box::pin(self.rank_hits(term))
	}
}

impl CatalogStore for PgCatalog {
	fn find_by_ids<'a>(&'a self, ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Species>>> {
		Box::pin(self.species_by_ids(ids))
	}

	fn exists_filtered<'a>(
		&'a self,
		ids: &'a [Uuid],
		filters: &'a CatalogFilters,
	) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		Box::pin(self.allowed_ids(ids, filters))
	}

	fn search_basic<'a>(&'a self, search: BasicSearch<'a>) -> BoxFuture<'a, Result<BasicResults>> {
		Box::pin(self.basic_page(search))
	}

	fn find_by_key<'a>(&'a self, key: &'a SpeciesKey) -> BoxFuture<'a, Result<Option<Species>>> {
		Box::pin(self.species_by_key(key))
	}

	fn taxonomy(&self, species_id: Uuid) -> BoxFuture<'_, Result<Option<TaxonomyHierarchy>>> {
		Box::pin(self.taxonomy_section(species_id))
	}

	fn conservation(&self, species_id: Uuid) -> BoxFuture<'_, Result<Option<ConservationData>>> {
		Box::pin(self.conservation_section(species_id))
	}

	fn images(&self, species_id: Uuid) -> BoxFuture<'_, Result<Vec<SpeciesImage>>> {
		Box::pin(self.image_section(species_id))
	}
}

pub struct BiotaService {
	pub cfg: Config,
	pub store: Arc<dyn CatalogStore>,
	pub ranker: Arc<dyn RankProvider>,
}
impl BiotaService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let catalog = Arc::new(PgCatalog::new(Arc::new(db)));

		Self { cfg, store: catalog.clone(), ranker: catalog }
	}

	pub fn with_backends(
		cfg: Config,
		store: Arc<dyn CatalogStore>,
		ranker: Arc<dyn RankProvider>,
	) -> Self {
		Self { cfg, store, ranker }
	}
}
