pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Rank provider error: {message}")]
	RankProvider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<biota_storage::Error> for Error {
	fn from(err: biota_storage::Error) -> Self {
		match err {
			biota_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			biota_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			err @ biota_storage::Error::Bootstrap { .. } =>
				Self::Storage { message: err.to_string() },
		}
	}
}
