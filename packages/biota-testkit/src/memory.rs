use std::{
	cmp::Reverse,
	collections::{HashMap, HashSet},
	future,
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use uuid::Uuid;

use biota_domain::{CatalogFilters, identifier::SpeciesKey};
use biota_service::{
	BasicResults, BasicSearch, BoxFuture, CatalogStore, ConservationData, Error, RankProvider,
	RankedHit, Result, Species, SpeciesImage, TaxonomyHierarchy,
};

/// Store operations that can be counted or made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
	FindByIds,
	ExistsFiltered,
	SearchBasic,
	FindByKey,
	Taxonomy,
	Conservation,
	Images,
}

/// Deterministic [`CatalogStore`] over a fixed set of records.
///
/// Bulk reads come back in reverse request order so callers cannot rely on store ordering.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
	records: Vec<Species>,
	taxonomy: HashMap<Uuid, TaxonomyHierarchy>,
	conservation: HashMap<Uuid, ConservationData>,
	images: HashMap<Uuid, Vec<SpeciesImage>>,
	failing: Mutex<HashSet<StoreOp>>,
	calls: Mutex<HashMap<StoreOp, usize>>,
}
impl InMemoryCatalog {
	pub fn new(records: Vec<Species>) -> Self {
		Self { records, ..Self::default() }
	}

	pub fn with_taxonomy(mut self, species_id: Uuid, taxonomy: TaxonomyHierarchy) -> Self {
		self.taxonomy.insert(species_id, taxonomy);

		self
	}

	pub fn with_conservation(mut self, species_id: Uuid, conservation: ConservationData) -> Self {
		self.conservation.insert(species_id, conservation);

		self
	}

	pub fn with_images(mut self, species_id: Uuid, images: Vec<SpeciesImage>) -> Self {
		self.images.insert(species_id, images);

		self
	}

	/// Makes every later call of `op` fail with a storage error.
	pub fn fail(&self, op: StoreOp) {
		self.failing.lock().unwrap_or_else(|err| err.into_inner()).insert(op);
	}

	pub fn calls(&self, op: StoreOp) -> usize {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).get(&op).copied().unwrap_or(0)
	}

	pub fn total_calls(&self) -> usize {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).values().sum()
	}

	fn enter(&self, op: StoreOp) -> Result<()> {
		*self.calls.lock().unwrap_or_else(|err| err.into_inner()).entry(op).or_default() += 1;

		if self.failing.lock().unwrap_or_else(|err| err.into_inner()).contains(&op) {
			return Err(Error::Storage { message: format!("Injected {op:?} failure.") });
		}

		Ok(())
	}

	fn by_id(&self, id: &Uuid) -> Option<&Species> {
		self.records.iter().find(|record| &record.id == id)
	}

	fn lookup_ids(&self, ids: &[Uuid]) -> Result<Vec<Species>> {
		self.enter(StoreOp::FindByIds)?;

		Ok(ids.iter().rev().filter_map(|id| self.by_id(id)).cloned().collect())
	}

	fn filter_ids(&self, ids: &[Uuid], filters: &CatalogFilters) -> Result<Vec<Uuid>> {
		self.enter(StoreOp::ExistsFiltered)?;

		Ok(ids
			.iter()
			.rev()
			.filter_map(|id| self.by_id(id))
			.filter(|record| matches_filters(record, filters))
			.map(|record| record.id)
			.collect())
	}

	fn basic_page(&self, search: BasicSearch<'_>) -> Result<BasicResults> {
		self.enter(StoreOp::SearchBasic)?;

		if search.limit == 0 {
			return Err(Error::InvalidRequest {
				message: "limit must be greater than zero.".to_string(),
			});
		}

		let needle = search.term.filter(|term| !term.is_empty()).map(str::to_lowercase);
		let mut matched: Vec<&Species> = self
			.records
			.iter()
			.filter(|record| matches_filters(record, search.filters))
			.filter(|record| needle.as_deref().is_none_or(|needle| matches_term(record, needle)))
			.collect();

		matched.sort_by(|left, right| {
			(Reverse(left.featured), &left.scientific_name, left.id).cmp(&(
				Reverse(right.featured),
				&right.scientific_name,
				right.id,
			))
		});

		let total = matched.len() as u64;
		let records = matched
			.into_iter()
			.skip(search.offset as usize)
			.take(search.limit as usize)
			.cloned()
			.collect();

		Ok(BasicResults { records, total })
	}

	fn lookup_key(&self, key: &SpeciesKey) -> Result<Option<Species>> {
		self.enter(StoreOp::FindByKey)?;

		let found = match key {
			SpeciesKey::Id(id) => self.by_id(id),
			SpeciesKey::Slug(slug) => self.records.iter().find(|record| &record.slug == slug),
		};

		Ok(found.cloned())
	}

	fn section<T>(&self, op: StoreOp, map: &HashMap<Uuid, T>, id: Uuid) -> Result<Option<T>>
	where
		T: Clone,
	{
		self.enter(op)?;

		Ok(map.get(&id).cloned())
	}
}

impl CatalogStore for InMemoryCatalog {
	fn find_by_ids<'a>(&'a self, ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Species>>> {
		Box::pin(future::ready(self.lookup_ids(ids)))
	}

	fn exists_filtered<'a>(
		&'a self,
		ids: &'a [Uuid],
		filters: &'a CatalogFilters,
	) -> BoxFuture<'a, Result<Vec<Uuid>>> {
		Box::pin(future::ready(self.filter_ids(ids, filters)))
	}

	fn search_basic<'a>(&'a self, search: BasicSearch<'a>) -> BoxFuture<'a, Result<BasicResults>> {
		Box::pin(future::ready(self.basic_page(search)))
	}

	fn find_by_key<'a>(&'a self, key: &'a SpeciesKey) -> BoxFuture<'a, Result<Option<Species>>> {
		Box::pin(future::ready(self.lookup_key(key)))
	}

	fn taxonomy(&self, species_id: Uuid) -> BoxFuture<'_, Result<Option<TaxonomyHierarchy>>> {
		Box::pin(future::ready(self.section(StoreOp::Taxonomy, &self.taxonomy, species_id)))
	}

	fn conservation(&self, species_id: Uuid) -> BoxFuture<'_, Result<Option<ConservationData>>> {
		Box::pin(future::ready(self.section(StoreOp::Conservation, &self.conservation, species_id)))
	}

	fn images(&self, species_id: Uuid) -> BoxFuture<'_, Result<Vec<SpeciesImage>>> {
		let images = self
			.section(StoreOp::Images, &self.images, species_id)
			.map(Option::unwrap_or_default);

		Box::pin(future::ready(images))
	}
}

/// [`RankProvider`] that answers every term with the same hits.
#[derive(Debug, Default)]
pub struct ScriptedRanker {
	hits: Vec<RankedHit>,
	failing: bool,
	calls: AtomicUsize,
	terms: Mutex<Vec<String>>,
}
impl ScriptedRanker {
	pub fn new(hits: Vec<RankedHit>) -> Self {
		Self { hits, ..Self::default() }
	}

	pub fn failing() -> Self {
		Self { failing: true, ..Self::default() }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Terms received so far, in call order.
	pub fn terms(&self) -> Vec<String> {
		self.terms.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn answer(&self, term: &str) -> Result<Vec<RankedHit>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.terms.lock().unwrap_or_else(|err| err.into_inner()).push(term.to_string());

		if self.failing {
			return Err(Error::RankProvider { message: "Injected rank failure.".to_string() });
		}

		Ok(self.hits.clone())
	}
}

impl RankProvider for ScriptedRanker {
	fn rank<'a>(&'a self, term: &'a str) -> BoxFuture<'a, Result<Vec<RankedHit>>> {
		Box::pin(future::ready(self.answer(term)))
	}
}

fn matches_filters(record: &Species, filters: &CatalogFilters) -> bool {
	filters.matches(record.featured, record.kingdom.as_deref(), record.iucn_status.as_deref())
}

fn matches_term(record: &Species, needle: &str) -> bool {
	record.scientific_name.to_lowercase().contains(needle)
		|| record.common_name.as_deref().is_some_and(|name| name.to_lowercase().contains(needle))
}
