use std::sync::Arc;

use biota_service::BiotaService;
use biota_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<BiotaService>,
}
impl AppState {
	/// Connects to Postgres and applies the schema before serving.
	pub async fn new(config: biota_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(BiotaService::new(config, db)))
	}

	pub fn from_service(service: BiotaService) -> Self {
		Self { service: Arc::new(service) }
	}
}
