use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use biota_domain::{CatalogFilters, term};

use crate::{
	Error, Result,
	db::Db,
	models::{
		BasicPage, ConservationRow, CountedSpeciesRow, RankedRow, SPECIES_COLUMNS, SpeciesImageRow,
		SpeciesRow, TaxonomyRow,
	},
};

/// Inputs of the substring + structured filter query.
#[derive(Debug, Clone, Copy)]
pub struct BasicSearch<'a> {
	/// Already sanitized. `None` disables the substring clause.
	pub term: Option<&'a str>,
	pub filters: &'a CatalogFilters,
	pub limit: u32,
	pub offset: u32,
}

/// Bulk fetch by id. Row order is whatever the database returns.
pub async fn find_by_ids(db: &Db, ids: &[Uuid]) -> Result<Vec<SpeciesRow>> {
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!("SELECT {SPECIES_COLUMNS} FROM species WHERE id = ANY($1)");
	let rows = sqlx::query_as::<_, SpeciesRow>(&sql).bind(ids).fetch_all(&db.pool).await?;

	Ok(rows)
}

/// Returns the subset of `ids` whose rows satisfy `filters`, in no particular order.
pub async fn exists_filtered(db: &Db, ids: &[Uuid], filters: &CatalogFilters) -> Result<Vec<Uuid>> {
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM species WHERE id = ANY(");

	builder.push_bind(ids.to_vec());
	builder.push(")");
	push_filters(&mut builder, filters);

	let allowed = builder.build_query_scalar::<Uuid>().fetch_all(&db.pool).await?;

	Ok(allowed)
}

/// Page of the fallback ordering (`featured DESC, scientific_name ASC, id ASC`) with the exact
/// number of matching rows.
pub async fn search_basic(db: &Db, search: BasicSearch<'_>) -> Result<BasicPage> {
	if search.limit == 0 {
		return Err(Error::InvalidArgument("limit must be greater than zero.".to_string()));
	}

	let mut builder = QueryBuilder::<Postgres>::new(format!(
		"SELECT {SPECIES_COLUMNS}, count(*) OVER () AS total_count FROM species WHERE TRUE"
	));

	push_filters(&mut builder, search.filters);
	push_term(&mut builder, search.term);
	builder.push(" ORDER BY featured DESC, scientific_name ASC, id ASC LIMIT ");
	builder.push_bind(i64::from(search.limit));
	builder.push(" OFFSET ");
	builder.push_bind(i64::from(search.offset));

	let counted: Vec<CountedSpeciesRow> = builder.build_query_as().fetch_all(&db.pool).await?;

	if let Some(first) = counted.first() {
		let total = u64::try_from(first.total_count).unwrap_or_default();
		let rows = counted.into_iter().map(|row| row.species).collect();

		return Ok(BasicPage { rows, total });
	}
	if search.offset == 0 {
		return Ok(BasicPage { rows: Vec::new(), total: 0 });
	}

	// Past the last page the window count is unavailable.
	let mut builder = QueryBuilder::<Postgres>::new("SELECT count(*) FROM species WHERE TRUE");

	push_filters(&mut builder, search.filters);
	push_term(&mut builder, search.term);

	let total: i64 = builder.build_query_scalar().fetch_one(&db.pool).await?;

	Ok(BasicPage { rows: Vec::new(), total: u64::try_from(total).unwrap_or_default() })
}

/// Runs the `search_species` ranking function. Hits arrive in descending rank order.
pub async fn rank_search(db: &Db, term: &str) -> Result<Vec<RankedRow>> {
	let rows = sqlx::query_as::<_, RankedRow>("SELECT id, rank FROM search_species($1)")
		.bind(term)
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

pub async fn find_by_id(db: &Db, id: Uuid) -> Result<Option<SpeciesRow>> {
	let sql = format!("SELECT {SPECIES_COLUMNS} FROM species WHERE id = $1");
	let row = sqlx::query_as::<_, SpeciesRow>(&sql).bind(id).fetch_optional(&db.pool).await?;

	Ok(row)
}

pub async fn find_by_slug(db: &Db, slug: &str) -> Result<Option<SpeciesRow>> {
	let sql = format!("SELECT {SPECIES_COLUMNS} FROM species WHERE slug = $1");
	let row = sqlx::query_as::<_, SpeciesRow>(&sql).bind(slug).fetch_optional(&db.pool).await?;

	Ok(row)
}

pub async fn taxonomy_for(db: &Db, species_id: Uuid) -> Result<Option<TaxonomyRow>> {
	let row = sqlx::query_as::<_, TaxonomyRow>(
		"\
SELECT id, species_id, kingdom, phylum, class, \"order\", family, genus, species, subspecies, created_at
FROM taxonomy_hierarchy
WHERE species_id = $1",
	)
	.bind(species_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn conservation_for(db: &Db, species_id: Uuid) -> Result<Option<ConservationRow>> {
	let row = sqlx::query_as::<_, ConservationRow>(
		"\
SELECT
	id,
	species_id,
	iucn_status,
	iucn_category,
	population_trend,
	population_size,
	threat_level,
	threats,
	conservation_actions,
	habitat_protection,
	last_assessed,
	assessor,
	created_at,
	updated_at
FROM conservation_data
WHERE species_id = $1",
	)
	.bind(species_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn images_for(db: &Db, species_id: Uuid) -> Result<Vec<SpeciesImageRow>> {
	let rows = sqlx::query_as::<_, SpeciesImageRow>(
		"\
SELECT id, species_id, image_url, alt_text, caption, photographer, license, is_primary, sort_order, created_at
FROM species_images
WHERE species_id = $1
ORDER BY sort_order ASC, created_at ASC",
	)
	.bind(species_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &CatalogFilters) {
	if filters.featured {
		builder.push(" AND featured = TRUE");
	}
	if let Some(kingdom) = filters.kingdom.as_deref() {
		builder.push(" AND kingdom ILIKE ");
		builder.push_bind(term::contains_pattern(kingdom));
	}
	if let Some(status) = filters.iucn_status.as_deref() {
		builder.push(" AND iucn_status = ");
		builder.push_bind(status.to_string());
	}
}

fn push_term(builder: &mut QueryBuilder<'_, Postgres>, term: Option<&str>) {
	let Some(term) = term.filter(|term| !term.is_empty()) else {
		return;
	};
	let pattern = term::contains_pattern(term);

	builder.push(" AND (scientific_name ILIKE ");
	builder.push_bind(pattern.clone());
	builder.push(" OR common_name ILIKE ");
	builder.push_bind(pattern);
	builder.push(")");
}
