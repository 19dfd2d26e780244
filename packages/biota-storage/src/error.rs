#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Schema bootstrap failed at statement {index}: {source}")]
	Bootstrap { index: usize, source: sqlx::Error },
}
