mod database;
mod error;
mod memory;

pub use database::{TestDatabase, env_dsn};
pub use error::{Error, Result};
pub use memory::{InMemoryCatalog, ScriptedRanker, StoreOp};

use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use biota_config::{CatalogProfile, Config, Postgres, Security, Service, Storage};
use biota_service::{BiotaService, RankedHit, Species};

/// A valid configuration pointing at `dsn`, with the built-in page profiles.
pub fn test_config(dsn: &str) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			postgres: Postgres {
				dsn: dsn.to_string(),
				pool_max_conns: 2,
				acquire_timeout_ms: Some(5_000),
			},
		},
		catalog: CatalogProfile::CATALOG,
		quick_search: CatalogProfile::QUICK_SEARCH,
		featured: CatalogProfile::FEATURED,
		security: Security { bind_localhost_only: true },
	}
}

/// A minimal, non-featured species. The slug is the lowercased name joined by hyphens.
pub fn species(scientific_name: &str) -> Species {
	let slug = scientific_name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");

	Species {
		id: Uuid::new_v4(),
		scientific_name: scientific_name.to_string(),
		common_name: None,
		slug,
		kingdom: None,
		phylum: None,
		class: None,
		order: None,
		family: None,
		genus: None,
		species: None,
		description: None,
		morphology: None,
		habitat_description: None,
		conservation_status: None,
		iucn_status: None,
		featured: false,
		image_urls: Vec::new(),
		habitat_map_coords: None,
		created_at: OffsetDateTime::UNIX_EPOCH,
		updated_at: OffsetDateTime::UNIX_EPOCH,
	}
}

pub fn hit(id: Uuid, rank: f32) -> RankedHit {
	RankedHit { id, rank }
}

/// A service over in-memory doubles. The doubles are returned for call assertions.
pub fn memory_service(
	catalog: InMemoryCatalog,
	ranker: ScriptedRanker,
) -> (BiotaService, Arc<InMemoryCatalog>, Arc<ScriptedRanker>) {
	let catalog = Arc::new(catalog);
	let ranker = Arc::new(ranker);
	let service = BiotaService::with_backends(
		test_config("postgres://unused@127.0.0.1/unused"),
		catalog.clone(),
		ranker.clone(),
	);

	(service, catalog, ranker)
}
