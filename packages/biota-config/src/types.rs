use serde::Deserialize;

/// Upper bound on any page size, regardless of profile.
pub const HARD_MAX_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default = "default_catalog")]
	pub catalog: CatalogProfile,
	#[serde(default = "default_quick_search")]
	pub quick_search: CatalogProfile,
	#[serde(default = "default_featured")]
	pub featured: CatalogProfile,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	/// Optional. Pool acquire timeout; the driver default applies when unset.
	pub acquire_timeout_ms: Option<u64>,
}

/// Page-size policy for one call site of the catalog orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CatalogProfile {
	pub default_limit: u32,
	pub max_limit: u32,
}
impl CatalogProfile {
	pub const CATALOG: Self = Self { default_limit: 24, max_limit: HARD_MAX_LIMIT };
	pub const FEATURED: Self = Self { default_limit: 8, max_limit: HARD_MAX_LIMIT };
	pub const QUICK_SEARCH: Self = Self { default_limit: 6, max_limit: 25 };
}

#[derive(Debug, Deserialize)]
pub struct Security {
	#[serde(default = "default_true")]
	pub bind_localhost_only: bool,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_catalog() -> CatalogProfile {
	CatalogProfile::CATALOG
}

fn default_quick_search() -> CatalogProfile {
	CatalogProfile::QUICK_SEARCH
}

fn default_featured() -> CatalogProfile {
	CatalogProfile::FEATURED
}

fn default_true() -> bool {
	true
}
