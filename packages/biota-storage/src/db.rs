use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Error, Result, schema};

const SCHEMA_LOCK_ID: i64 = 4_210_337;

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &biota_config::Postgres) -> Result<Self> {
		let mut options = PgPoolOptions::new().max_connections(cfg.pool_max_conns);

		if let Some(timeout_ms) = cfg.acquire_timeout_ms {
			options = options.acquire_timeout(Duration::from_millis(timeout_ms));
		}

		let pool = options.connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		// Concurrent starters serialize on a transaction-scoped lock.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)")
			.bind(SCHEMA_LOCK_ID)
			.execute(&mut *tx)
			.await?;

		for (index, statement) in schema::statements(&sql).enumerate() {
			sqlx::query(statement)
				.execute(&mut *tx)
				.await
				.map_err(|source| Error::Bootstrap { index, source })?;
		}

		tx.commit().await?;

		tracing::debug!("Schema is up to date.");

		Ok(())
	}
}
