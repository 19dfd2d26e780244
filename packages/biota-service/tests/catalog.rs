use uuid::Uuid;

use biota_domain::CatalogFilters;
use biota_service::{
	CatalogRequest, FallbackReason, FeaturedRequest, PageWindow, QuickSearchRequest,
	RankedAttempt, SearchMode, SearchQuery, Species, catalog,
};
use biota_testkit::{InMemoryCatalog, ScriptedRanker, StoreOp, hit, memory_service, species};

fn lion() -> Species {
	let mut lion = species("Panthera leo");

	lion.common_name = Some("Lion".to_string());
	lion.kingdom = Some("Animalia".to_string());
	lion.iucn_status = Some("VU".to_string());
	lion.featured = true;

	lion
}

fn oak() -> Species {
	let mut oak = species("Quercus robur");

	oak.common_name = Some("English oak".to_string());
	oak.kingdom = Some("Plantae".to_string());
	oak.iucn_status = Some("LC".to_string());

	oak
}

fn animal(name: &str, featured: bool) -> Species {
	let mut record = species(name);

	record.kingdom = Some("Animalia".to_string());
	record.featured = featured;

	record
}

fn request(search: Option<&str>) -> CatalogRequest {
	CatalogRequest { search: search.map(str::to_string), ..CatalogRequest::default() }
}

fn ids(records: &[Species]) -> Vec<Uuid> {
	records.iter().map(|record| record.id).collect()
}

#[tokio::test]
async fn ranked_term_returns_rank_order() {
	let (lion, oak) = (lion(), oak());
	let catalog = InMemoryCatalog::new(vec![lion.clone(), oak.clone()]);
	let ranker = ScriptedRanker::new(vec![hit(lion.id, 0.9)]);
	let (service, _, ranker) = memory_service(catalog, ranker);
	let envelope = service.catalog(&request(Some("lion"))).await.expect("Catalog failed.");

	assert_eq!(envelope.data, vec![lion]);
	assert_eq!(envelope.metadata.count, 1);
	assert_eq!(envelope.metadata.mode, SearchMode::RpcSearch);
	assert_eq!(envelope.metadata.filters.search.as_deref(), Some("lion"));
	assert_eq!(ranker.terms(), vec!["lion".to_string()]);
}

#[tokio::test]
async fn featured_without_term_uses_basic_query() {
	let (lion, oak) = (lion(), oak());
	let catalog = InMemoryCatalog::new(vec![oak, lion.clone()]);
	let (service, _, ranker) = memory_service(catalog, ScriptedRanker::default());
	let req = CatalogRequest { featured: Some("true".to_string()), ..CatalogRequest::default() };
	let envelope = service.catalog(&req).await.expect("Catalog failed.");

	assert_eq!(envelope.data, vec![lion]);
	assert_eq!(envelope.metadata.count, 1);
	assert_eq!(envelope.metadata.mode, SearchMode::BasicQuery);
	assert!(envelope.metadata.filters.featured);
	assert_eq!(ranker.calls(), 0);
}

#[tokio::test]
async fn hydration_preserves_rank_order() {
	let records: Vec<Species> = ["Alces alces", "Bison bonasus", "Canis lupus", "Dama dama"]
		.map(|name| animal(name, false))
		.into();
	let ranked = [3, 0, 2, 1].map(|index| records[index].id);
	let hits =
		ranked.iter().enumerate().map(|(i, id)| hit(*id, 1.0 - i as f32 * 0.1)).collect();
	let (service, catalog, _) =
		memory_service(InMemoryCatalog::new(records), ScriptedRanker::new(hits));
	let envelope = service.catalog(&request(Some("a"))).await.expect("Catalog failed.");

	assert_eq!(ids(&envelope.data), ranked.to_vec());
	assert_eq!(catalog.calls(StoreOp::FindByIds), 1);
}

#[tokio::test]
async fn duplicate_hits_keep_first_occurrence() {
	let (a, b) = (animal("Alces alces", false), animal("Bison bonasus", false));
	let hits = vec![hit(b.id, 0.9), hit(a.id, 0.8), hit(b.id, 0.7)];
	let (service, _, _) =
		memory_service(InMemoryCatalog::new(vec![a.clone(), b.clone()]), ScriptedRanker::new(hits));
	let envelope = service.catalog(&request(Some("alces bison"))).await.expect("Catalog failed.");

	assert_eq!(ids(&envelope.data), vec![b.id, a.id]);
	assert_eq!(envelope.metadata.count, 2);
}

#[tokio::test]
async fn ranked_pages_respect_the_window() {
	let records: Vec<Species> =
		(0..7).map(|index| animal(&format!("Genus species{index}"), false)).collect();
	let hits = records.iter().map(|record| hit(record.id, 0.5)).collect();
	let expected = ids(&records);
	let (service, _, _) = memory_service(InMemoryCatalog::new(records), ScriptedRanker::new(hits));

	for (limit, offset) in [(3, 0), (3, 3), (3, 6), (3, 7), (10, 2), (1, 100)] {
		let req = CatalogRequest {
			search: Some("genus".to_string()),
			limit: Some(limit.to_string()),
			offset: Some(offset.to_string()),
			..CatalogRequest::default()
		};
		let envelope = service.catalog(&req).await.expect("Catalog failed.");
		let window = PageWindow::new(limit, offset);
		let start = (offset as usize).min(expected.len());
		let end = (start + limit as usize).min(expected.len());

		assert_eq!(envelope.metadata.count, 7);
		assert_eq!(envelope.data.len(), window.expected_len(7), "limit={limit} offset={offset}");
		assert_eq!(ids(&envelope.data), expected[start..end].to_vec());
	}
}

#[tokio::test]
async fn ranked_results_are_intersected_with_filters() {
	let (lion, oak) = (lion(), oak());
	let hits = vec![hit(oak.id, 0.9), hit(lion.id, 0.8)];
	let (service, catalog, _) =
		memory_service(InMemoryCatalog::new(vec![lion.clone(), oak]), ScriptedRanker::new(hits));
	let req = CatalogRequest {
		search: Some("a".to_string()),
		kingdom: Some("anim".to_string()),
		..CatalogRequest::default()
	};
	let envelope = service.catalog(&req).await.expect("Catalog failed.");

	assert_eq!(envelope.data, vec![lion]);
	assert_eq!(envelope.metadata.count, 1);
	assert_eq!(envelope.metadata.mode, SearchMode::RpcSearch);
	assert_eq!(catalog.calls(StoreOp::ExistsFiltered), 1);
}

#[tokio::test]
async fn rank_failure_falls_back_with_same_parameters() {
	let (lion, oak) = (lion(), oak());
	let (service, catalog, _) =
		memory_service(InMemoryCatalog::new(vec![oak, lion.clone()]), ScriptedRanker::failing());
	let req = CatalogRequest {
		search: Some("Lion".to_string()),
		limit: Some("5".to_string()),
		..CatalogRequest::default()
	};
	let envelope = service.catalog(&req).await.expect("Catalog failed.");

	assert_eq!(envelope.data, vec![lion]);
	assert_eq!(envelope.metadata.count, 1);
	assert_eq!(envelope.metadata.limit, 5);
	assert_eq!(envelope.metadata.mode, SearchMode::BasicQuery);
	assert_eq!(envelope.metadata.filters.search.as_deref(), Some("Lion"));
	assert_eq!(catalog.calls(StoreOp::SearchBasic), 1);
}

#[tokio::test]
async fn intersection_failure_falls_back() {
	let lion = lion();
	let catalog = InMemoryCatalog::new(vec![lion.clone(), oak()]);

	catalog.fail(StoreOp::ExistsFiltered);

	let (service, catalog, _) =
		memory_service(catalog, ScriptedRanker::new(vec![hit(lion.id, 0.9)]));
	let req = CatalogRequest {
		search: Some("lion".to_string()),
		iucn_status: Some("VU".to_string()),
		..CatalogRequest::default()
	};
	let query = req.resolve(service.cfg.catalog);

	assert!(matches!(
		service.attempt_ranked(&query).await,
		RankedAttempt::Fallback(FallbackReason::Intersection(_))
	));

	let envelope = service.run_catalog(&query).await.expect("Catalog failed.");

	assert_eq!(envelope.data, vec![lion]);
	assert_eq!(envelope.metadata.mode, SearchMode::BasicQuery);
	assert_eq!(catalog.calls(StoreOp::FindByIds), 0);
}

#[tokio::test]
async fn hydration_failure_falls_back() {
	let lion = lion();
	let catalog = InMemoryCatalog::new(vec![lion.clone(), oak()]);

	catalog.fail(StoreOp::FindByIds);

	let (service, _, _) = memory_service(catalog, ScriptedRanker::new(vec![hit(lion.id, 0.9)]));
	let query = request(Some("lion")).resolve(service.cfg.catalog);

	assert!(matches!(
		service.attempt_ranked(&query).await,
		RankedAttempt::Fallback(FallbackReason::Hydration(_))
	));

	let envelope = service.run_catalog(&query).await.expect("Catalog failed.");

	assert_eq!(envelope.data, vec![lion]);
	assert_eq!(envelope.metadata.mode, SearchMode::BasicQuery);
}

#[tokio::test]
async fn fallback_failure_is_returned() {
	let catalog = InMemoryCatalog::new(vec![lion(), oak()]);

	catalog.fail(StoreOp::SearchBasic);

	let (service, _, _) = memory_service(catalog, ScriptedRanker::failing());
	let err = service.catalog(&request(Some("lion"))).await.expect_err("Fallback should fail.");

	assert!(matches!(err, biota_service::Error::Storage { .. }), "Unexpected error: {err:?}.");
}

#[tokio::test]
async fn no_term_orders_featured_first_then_by_name() {
	let records = vec![
		animal("Zebra zebra", false),
		animal("Canis lupus", true),
		animal("Alces alces", false),
		animal("Bison bonasus", true),
	];
	let expected = vec![records[3].id, records[1].id, records[2].id, records[0].id];
	let (service, _, ranker) =
		memory_service(InMemoryCatalog::new(records), ScriptedRanker::default());

	for search in [None, Some(""), Some(" (),% ")] {
		let envelope = service.catalog(&request(search)).await.expect("Catalog failed.");

		assert_eq!(envelope.metadata.mode, SearchMode::BasicQuery);
		assert_eq!(ids(&envelope.data), expected);
		assert_eq!(envelope.metadata.count, 4);
	}

	assert_eq!(ranker.calls(), 0);
}

#[tokio::test]
async fn basic_query_reports_total_past_last_page() {
	let records: Vec<Species> =
		(0..3).map(|index| animal(&format!("Genus species{index}"), false)).collect();
	let (service, _, _) = memory_service(InMemoryCatalog::new(records), ScriptedRanker::default());
	let req = CatalogRequest { offset: Some("10".to_string()), ..CatalogRequest::default() };
	let envelope = service.catalog(&req).await.expect("Catalog failed.");

	assert!(envelope.data.is_empty());
	assert_eq!(envelope.metadata.count, 3);
	assert_eq!(envelope.metadata.offset, 10);
}

#[tokio::test]
async fn empty_candidates_and_empty_filters_skip_the_store() {
	let lion = lion();
	let (service, memory, _) =
		memory_service(InMemoryCatalog::new(vec![lion.clone()]), ScriptedRanker::default());
	let store = service.store.as_ref();
	let candidates = vec![lion.id];
	let filters = CatalogFilters::new(false, Some("Animalia"), None);

	assert!(catalog::intersect(store, &[], &filters).await.expect("Intersect failed.").is_empty());
	assert_eq!(
		catalog::intersect(store, &candidates, &CatalogFilters::default())
			.await
			.expect("Intersect failed."),
		candidates
	);
	assert!(catalog::hydrate(store, &[]).await.expect("Hydrate failed.").is_empty());
	assert_eq!(memory.total_calls(), 0);
}

#[tokio::test]
async fn ranked_search_with_no_hits_makes_no_store_calls() {
	let (service, catalog, _) =
		memory_service(InMemoryCatalog::new(vec![lion()]), ScriptedRanker::new(Vec::new()));
	let req = CatalogRequest {
		search: Some("nothing".to_string()),
		kingdom: Some("Animalia".to_string()),
		..CatalogRequest::default()
	};
	let envelope = service.catalog(&req).await.expect("Catalog failed.");

	assert!(envelope.data.is_empty());
	assert_eq!(envelope.metadata.count, 0);
	assert_eq!(envelope.metadata.mode, SearchMode::RpcSearch);
	assert_eq!(catalog.total_calls(), 0);
}

#[tokio::test]
async fn hydrator_drops_ids_the_store_does_not_return() {
	let (a, b) = (animal("Alces alces", false), animal("Bison bonasus", false));
	let (service, _, _) =
		memory_service(InMemoryCatalog::new(vec![a.clone(), b.clone()]), ScriptedRanker::default());
	let page = vec![b.id, Uuid::new_v4(), a.id];
	let records =
		catalog::hydrate(service.store.as_ref(), &page).await.expect("Hydrate failed.");

	assert_eq!(ids(&records), vec![b.id, a.id]);
}

#[tokio::test]
async fn identical_requests_return_identical_envelopes() {
	let (lion, oak) = (lion(), oak());
	let hits = vec![hit(lion.id, 0.9), hit(oak.id, 0.1)];
	let (service, _, _) =
		memory_service(InMemoryCatalog::new(vec![lion, oak]), ScriptedRanker::new(hits));

	for search in [Some("lion"), None] {
		let first = service.catalog(&request(search)).await.expect("Catalog failed.");
		let second = service.catalog(&request(search)).await.expect("Catalog failed.");

		assert_eq!(first, second);
	}
}

#[tokio::test]
async fn quick_search_without_term_is_empty() {
	let (service, catalog, ranker) =
		memory_service(InMemoryCatalog::new(vec![lion(), oak()]), ScriptedRanker::default());
	let req = QuickSearchRequest { q: Some(" %% ".to_string()), ..QuickSearchRequest::default() };
	let envelope = service.quick_search(&req).await.expect("Quick search failed.");

	assert!(envelope.data.is_empty());
	assert_eq!(envelope.metadata.count, 0);
	assert_eq!(envelope.metadata.mode, SearchMode::BasicQuery);
	assert_eq!(envelope.metadata.limit, 6);
	assert_eq!(catalog.total_calls(), 0);
	assert_eq!(ranker.calls(), 0);
}

#[tokio::test]
async fn quick_search_caps_the_page() {
	let records: Vec<Species> =
		(0..30).map(|index| animal(&format!("Genus species{index:02}"), false)).collect();
	let hits = records.iter().map(|record| hit(record.id, 0.5)).collect();
	let (service, _, _) = memory_service(InMemoryCatalog::new(records), ScriptedRanker::new(hits));
	let req = QuickSearchRequest {
		search: Some("genus".to_string()),
		limit: Some("99".to_string()),
		..QuickSearchRequest::default()
	};
	let envelope = service.quick_search(&req).await.expect("Quick search failed.");

	assert_eq!(envelope.data.len(), 25);
	assert_eq!(envelope.metadata.count, 30);
	assert_eq!(envelope.metadata.mode, SearchMode::RpcSearch);
}

#[tokio::test]
async fn featured_listing_only_returns_featured() {
	let records = vec![lion(), oak(), animal("Bison bonasus", true)];
	let expected = vec![records[2].id, records[0].id];
	let (service, _, ranker) =
		memory_service(InMemoryCatalog::new(records), ScriptedRanker::default());
	let envelope =
		service.featured(&FeaturedRequest::default()).await.expect("Featured listing failed.");

	assert_eq!(ids(&envelope.data), expected);
	assert_eq!(envelope.metadata.limit, 8);
	assert_eq!(envelope.metadata.mode, SearchMode::BasicQuery);
	assert_eq!(ranker.calls(), 0);
}

#[tokio::test]
async fn fallback_applies_substring_and_filters() {
	let mut underscored = animal("Genus_a", false);

	underscored.common_name = Some("Underscore".to_string());

	let plain = animal("Genusxa", false);
	let catalog = InMemoryCatalog::new(vec![plain, underscored.clone()]);
	let (service, _, _) = memory_service(catalog, ScriptedRanker::default());
	let query = SearchQuery::new(
		Some("genus_"),
		CatalogFilters::new(false, Some("animalia"), None),
		PageWindow::new(10, 0),
	);
	let results =
		catalog::fallback_search(service.store.as_ref(), &query).await.expect("Fallback failed.");

	assert_eq!(ids(&results.records), vec![underscored.id]);
	assert_eq!(results.total, 1);
}
