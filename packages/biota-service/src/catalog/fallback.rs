use biota_storage::queries::BasicSearch;

use crate::{BasicResults, CatalogStore, Result, catalog::SearchQuery};

/// Substring plus structured-filter query, ordered featured first then by scientific name.
pub async fn fallback_search(
	store: &dyn CatalogStore,
	query: &SearchQuery,
) -> Result<BasicResults> {
	let search = BasicSearch {
		term: query.term.as_deref(),
		filters: &query.filters,
		limit: query.window.limit,
		offset: query.window.offset,
	};

	store.search_basic(search).await
}
