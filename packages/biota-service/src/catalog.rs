mod fallback;
mod hydrate;
mod intersect;

pub use fallback::fallback_search;
pub use hydrate::hydrate;
pub use intersect::intersect;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use biota_config::CatalogProfile;
use biota_domain::{CatalogFilters, PageWindow, ordering, pagination, term};

use crate::{BiotaService, Error, Result, Species};

/// Query-string parameters of the catalog listing. Values stay raw until [`resolve`].
///
/// [`resolve`]: CatalogRequest::resolve
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogRequest {
	pub search: Option<String>,
	pub kingdom: Option<String>,
	pub iucn_status: Option<String>,
	pub featured: Option<String>,
	pub limit: Option<String>,
	pub offset: Option<String>,
}
impl CatalogRequest {
	pub fn resolve(&self, profile: CatalogProfile) -> SearchQuery {
		let featured = self.featured.as_deref() == Some("true");
		let filters =
			CatalogFilters::new(featured, self.kingdom.as_deref(), self.iucn_status.as_deref());
		let window = PageWindow::from_raw(
			self.limit.as_deref(),
			self.offset.as_deref(),
			profile.default_limit,
			profile.max_limit,
		);

		SearchQuery::new(self.search.as_deref(), filters, window)
	}
}

/// Typeahead parameters. The term is read from `q`, then `query`, then `search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuickSearchRequest {
	pub q: Option<String>,
	pub query: Option<String>,
	pub search: Option<String>,
	pub limit: Option<String>,
}
impl QuickSearchRequest {
	pub fn resolve(&self, profile: CatalogProfile) -> SearchQuery {
		let raw = [&self.q, &self.query, &self.search]
			.into_iter()
			.filter_map(Option::as_deref)
			.find(|value| !value.is_empty());
		let window = PageWindow::from_raw(
			self.limit.as_deref(),
			None,
			profile.default_limit,
			profile.max_limit,
		);

		SearchQuery::new(raw, CatalogFilters::default(), window)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturedRequest {
	pub limit: Option<String>,
}
impl FeaturedRequest {
	pub fn resolve(&self, profile: CatalogProfile) -> SearchQuery {
		let window = PageWindow::from_raw(
			self.limit.as_deref(),
			None,
			profile.default_limit,
			profile.max_limit,
		);

		SearchQuery::new(None, CatalogFilters::featured_only(), window)
	}
}

/// A fully resolved catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
	/// Sanitized, never empty.
	pub term: Option<String>,
	/// The caller's input as received, echoed in basic-query metadata.
	pub raw_search: Option<String>,
	pub filters: CatalogFilters,
	pub window: PageWindow,
}
impl SearchQuery {
	pub fn new(raw_search: Option<&str>, filters: CatalogFilters, window: PageWindow) -> Self {
		Self {
			term: term::effective_term(raw_search),
			raw_search: raw_search.map(str::to_string),
			filters,
			window,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchMode {
	RpcSearch,
	BasicQuery,
}
impl SearchMode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::RpcSearch => "rpc-search",
			Self::BasicQuery => "basic-query",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeFilters {
	pub featured: bool,
	pub kingdom: Option<String>,
	#[serde(rename = "iucnStatus")]
	pub iucn_status: Option<String>,
	pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMetadata {
	/// Matches before pagination.
	pub count: u64,
	pub limit: u32,
	pub offset: u32,
	pub filters: EnvelopeFilters,
	pub mode: SearchMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
	pub data: Vec<Species>,
	pub metadata: EnvelopeMetadata,
}
impl ResultEnvelope {
	fn new(
		query: &SearchQuery,
		mode: SearchMode,
		data: Vec<Species>,
		count: u64,
		search: Option<String>,
	) -> Self {
		let filters = EnvelopeFilters {
			featured: query.filters.featured,
			kingdom: query.filters.kingdom.clone(),
			iucn_status: query.filters.iucn_status.clone(),
			search,
		};

		Self {
			data,
			metadata: EnvelopeMetadata {
				count,
				limit: query.window.limit,
				offset: query.window.offset,
				filters,
				mode,
			},
		}
	}
}

/// Outcome of the ranked pipeline: hydrated records in rank order plus the filtered total.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPage {
	pub records: Vec<Species>,
	pub total: u64,
}

#[derive(Debug)]
pub enum FallbackReason {
	NoTerm,
	RankProvider(Error),
	Intersection(Error),
	Hydration(Error),
}
impl FallbackReason {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::NoTerm => "no_term",
			Self::RankProvider(_) => "rank_provider",
			Self::Intersection(_) => "intersection",
			Self::Hydration(_) => "hydration",
		}
	}

	pub fn error(&self) -> Option<&Error> {
		match self {
			Self::NoTerm => None,
			Self::RankProvider(err) | Self::Intersection(err) | Self::Hydration(err) => Some(err),
		}
	}
}

#[derive(Debug)]
pub enum RankedAttempt {
	Ranked(RankedPage),
	Fallback(FallbackReason),
}

impl BiotaService {
	/// Catalog listing with optional term and structured filters.
	pub async fn catalog(&self, req: &CatalogRequest) -> Result<ResultEnvelope> {
		let query = req.resolve(self.cfg.catalog);

		self.run_catalog(&query).await
	}

	/// Typeahead search. A request without an effective term never reaches the store.
	pub async fn quick_search(&self, req: &QuickSearchRequest) -> Result<ResultEnvelope> {
		let query = req.resolve(self.cfg.quick_search);

		if query.term.is_none() {
			return Ok(ResultEnvelope::new(
				&query,
				SearchMode::BasicQuery,
				Vec::new(),
				0,
				query.raw_search.clone(),
			));
		}

		self.run_catalog(&query).await
	}

	pub async fn featured(&self, req: &FeaturedRequest) -> Result<ResultEnvelope> {
		let query = req.resolve(self.cfg.featured);

		self.run_catalog(&query).await
	}

	/// Serves `query` through the ranked pipeline, falling back to the basic query when no
	/// term is present or any ranked stage fails. A fallback failure is returned as is.
	pub async fn run_catalog(&self, query: &SearchQuery) -> Result<ResultEnvelope> {
		let envelope = match self.attempt_ranked(query).await {
			RankedAttempt::Ranked(page) => ResultEnvelope::new(
				query,
				SearchMode::RpcSearch,
				page.records,
				page.total,
				query.term.clone(),
			),
			RankedAttempt::Fallback(reason) => {
				if let Some(err) = reason.error() {
					warn!(
						reason = reason.as_str(),
						error = %err,
						"Ranked search failed; falling back to basic query."
					);
				}

				let results = fallback_search(self.store.as_ref(), query).await?;

				ResultEnvelope::new(
					query,
					SearchMode::BasicQuery,
					results.records,
					results.total,
					query.raw_search.clone(),
				)
			},
		};

		debug!(
			mode = envelope.metadata.mode.as_str(),
			count = envelope.metadata.count,
			returned = envelope.data.len(),
			limit = query.window.limit,
			offset = query.window.offset,
			"Catalog request served."
		);

		Ok(envelope)
	}

	/// Runs rank, intersect, paginate and hydrate. Never returns a partial page: any failing
	/// stage yields [`RankedAttempt::Fallback`].
	pub async fn attempt_ranked(&self, query: &SearchQuery) -> RankedAttempt {
		let Some(term) = query.term.as_deref() else {
			return RankedAttempt::Fallback(FallbackReason::NoTerm);
		};
		let hits = match self.ranker.rank(term).await {
			Ok(hits) => hits,
			Err(err) => return RankedAttempt::Fallback(FallbackReason::RankProvider(err)),
		};
		let candidates = ordering::dedup_in_order(hits.into_iter().map(|hit| hit.id));
		let allowed = match intersect(self.store.as_ref(), &candidates, &query.filters).await {
			Ok(allowed) => allowed,
			Err(err) => return RankedAttempt::Fallback(FallbackReason::Intersection(err)),
		};
		let page = pagination::paginate(&allowed, query.window);
		let records = match hydrate(self.store.as_ref(), &page.items).await {
			Ok(records) => records,
			Err(err) => return RankedAttempt::Fallback(FallbackReason::Hydration(err)),
		};

		RankedAttempt::Ranked(RankedPage { records, total: page.total as u64 })
	}
}
