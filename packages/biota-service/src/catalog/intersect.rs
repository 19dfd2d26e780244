use std::collections::HashSet;

use uuid::Uuid;

use biota_domain::{CatalogFilters, ordering};

use crate::{CatalogStore, Result};

/// Keeps the candidates that satisfy `filters`, in candidate order.
///
/// Without structured filters, or without candidates, the input is returned as is and the
/// store is not consulted.
pub async fn intersect(
	store: &dyn CatalogStore,
	candidates: &[Uuid],
	filters: &CatalogFilters,
) -> Result<Vec<Uuid>> {
	if filters.is_empty() || candidates.is_empty() {
		return Ok(candidates.to_vec());
	}

	let allowed: HashSet<Uuid> =
		store.exists_filtered(candidates, filters).await?.into_iter().collect();

	Ok(ordering::retain_allowed(candidates, &allowed))
}
