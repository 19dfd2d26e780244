use axum::{
	Json, Router,
	extract::{Path, Query, State, rejection::QueryRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;

use biota_service::{
	CatalogRequest, Error, FeaturedRequest, QuickSearchRequest, ResultEnvelope, SpeciesDetail,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/species", get(list_species))
		.route("/v1/search", get(quick_search))
		.route("/v1/species/featured", get(featured_species))
		.route("/v1/species/{identifier}", get(species_detail))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn list_species(
	State(state): State<AppState>,
	query: Result<Query<CatalogRequest>, QueryRejection>,
) -> Result<Json<ResultEnvelope>, ApiError> {
	let Query(req) = query?;
	let envelope = state.service.catalog(&req).await?;

	Ok(Json(envelope))
}

async fn quick_search(
	State(state): State<AppState>,
	query: Result<Query<QuickSearchRequest>, QueryRejection>,
) -> Result<Json<ResultEnvelope>, ApiError> {
	let Query(req) = query?;
	let envelope = state.service.quick_search(&req).await?;

	Ok(Json(envelope))
}

async fn featured_species(
	State(state): State<AppState>,
	query: Result<Query<FeaturedRequest>, QueryRejection>,
) -> Result<Json<ResultEnvelope>, ApiError> {
	let Query(req) = query?;
	let envelope = state.service.featured(&req).await?;

	Ok(Json(envelope))
}

async fn species_detail(
	State(state): State<AppState>,
	Path(identifier): Path<String>,
) -> Result<Json<SpeciesDetail>, ApiError> {
	let detail = state.service.species_detail(&identifier).await?;

	Ok(Json(detail))
}

#[derive(Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
		Self { status, error_code, message: message.into(), fields: None }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			Error::NotFound { message } => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			Error::RankProvider { message } | Error::Storage { message } => {
				tracing::error!(error = %message, "Request failed in storage.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", message)
			},
		}
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", rejection.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code.to_string(),
			message: self.message,
			fields: self.fields,
		};

		(self.status, Json(body)).into_response()
	}
}
