use uuid::Uuid;

use biota_domain::ordering;

use crate::{CatalogStore, Result, Species};

/// Fetches full records for one page of ids and returns them in page order. Ids the store
/// does not return are dropped.
pub async fn hydrate(store: &dyn CatalogStore, page_ids: &[Uuid]) -> Result<Vec<Species>> {
	if page_ids.is_empty() {
		return Ok(Vec::new());
	}

	let records = store.find_by_ids(page_ids).await?;

	Ok(ordering::order_by_ids(page_ids, records, |record| record.id))
}
