mod error;
mod types;

pub use error::{Error, Result};
pub use types::{CatalogProfile, Config, HARD_MAX_LIMIT, Postgres, Security, Service, Storage};

use std::{fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let http_addr = http_addr(cfg)?;

	if cfg.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.http_bind must be a loopback address when security.bind_localhost_only is true."
				.to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	if let Some(timeout) = cfg.storage.postgres.acquire_timeout_ms
		&& timeout == 0
	{
		return Err(Error::Validation {
			message: "storage.postgres.acquire_timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (label, profile) in [
		("catalog", &cfg.catalog),
		("quick_search", &cfg.quick_search),
		("featured", &cfg.featured),
	] {
		validate_profile(label, profile)?;
	}

	Ok(())
}

/// Parses `service.http_bind`.
pub fn http_addr(cfg: &Config) -> Result<SocketAddr> {
	cfg.service.http_bind.parse().map_err(|err| Error::InvalidBind {
		field: "service.http_bind",
		value: cfg.service.http_bind.clone(),
		source: err,
	})
}

fn validate_profile(label: &str, profile: &CatalogProfile) -> Result<()> {
	if profile.max_limit == 0 || profile.max_limit > HARD_MAX_LIMIT {
		return Err(Error::Validation {
			message: format!("{label}.max_limit must be in the range 1-{HARD_MAX_LIMIT}."),
		});
	}
	if profile.default_limit == 0 {
		return Err(Error::Validation {
			message: format!("{label}.default_limit must be greater than zero."),
		});
	}
	if profile.default_limit > profile.max_limit {
		return Err(Error::Validation {
			message: format!("{label}.default_limit must not exceed {label}.max_limit."),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let level = cfg.service.log_level.trim();

	if level.len() != cfg.service.log_level.len() {
		cfg.service.log_level = level.to_string();
	}
	if cfg.storage.postgres.dsn.trim().len() != cfg.storage.postgres.dsn.len() {
		cfg.storage.postgres.dsn = cfg.storage.postgres.dsn.trim().to_string();
	}
}
