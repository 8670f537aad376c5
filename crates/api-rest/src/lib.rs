//! # API REST
//!
//! REST API implementation for the SCLC advisor.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for common types and request handling.

#![warn(rust_2018_idioms)]

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{pb, AdvisorApi, ApiError, HealthService};

/// Application state for the REST API server
#[derive(Clone, Default)]
pub struct AppState {
    api: AdvisorApi,
}

impl AppState {
    pub fn new(api: AdvisorApi) -> Self {
        Self { api }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, compute_frailty_score, classify_tnm, generate_recommendations),
    components(schemas(
        pb::HealthRes,
        pb::G8Answer,
        pb::FrailtyScoreReq,
        pb::FrailtyScoreRes,
        pb::TnmInputs,
        pb::ClassifyTnmReq,
        pb::ClassifyTnmRes,
        pb::PatientRecord,
        pb::RecommendationsReq,
        pb::Recommendation,
        pb::RecommendationsRes,
    ))
)]
pub struct ApiDoc;

type HandlerError = (StatusCode, String);

/// Builds the REST router, including Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/g8", post(compute_frailty_score))
        .route("/tnm", post(classify_tnm))
        .route("/recommendations", post(generate_recommendations))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn bad_request(err: ApiError) -> HandlerError {
    tracing::warn!("Rejected request: {}", err);
    (StatusCode::BAD_REQUEST, err.to_string())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = pb::HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<pb::HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/g8",
    request_body = pb::FrailtyScoreReq,
    responses(
        (status = 200, description = "Aggregated G8 score", body = pb::FrailtyScoreRes),
        (status = 400, description = "Unknown G8 item")
    )
)]
/// Aggregate G8 questionnaire answers into a frailty score
///
/// Blank or non-numeric answers are skipped; `complete` tells whether all eight items were
/// answered.
#[axum::debug_handler]
async fn compute_frailty_score(
    State(state): State<AppState>,
    Json(req): Json<pb::FrailtyScoreReq>,
) -> Result<Json<pb::FrailtyScoreRes>, HandlerError> {
    state
        .api
        .compute_frailty_score(req)
        .map(Json)
        .map_err(bad_request)
}

#[utoipa::path(
    post,
    path = "/tnm",
    request_body = pb::ClassifyTnmReq,
    responses(
        (status = 200, description = "T, N, M categories and stage group", body = pb::ClassifyTnmRes),
        (status = 400, description = "Invalid staging input")
    )
)]
#[axum::debug_handler]
async fn classify_tnm(
    State(state): State<AppState>,
    Json(req): Json<pb::ClassifyTnmReq>,
) -> Result<Json<pb::ClassifyTnmRes>, HandlerError> {
    state.api.classify_tnm(req).map(Json).map_err(bad_request)
}

#[utoipa::path(
    post,
    path = "/recommendations",
    request_body = pb::RecommendationsReq,
    responses(
        (status = 200, description = "Ordered recommendations", body = pb::RecommendationsRes),
        (status = 400, description = "Invalid patient record")
    )
)]
/// Generate the ordered recommendation list for a patient record
///
/// # Errors
/// Returns `400 Bad Request` naming the field when a non-blank value does not parse.
#[axum::debug_handler]
async fn generate_recommendations(
    State(state): State<AppState>,
    Json(req): Json<pb::RecommendationsReq>,
) -> Result<Json<pb::RecommendationsRes>, HandlerError> {
    let res = state
        .api
        .generate_recommendations(req)
        .map_err(bad_request)?;
    tracing::info!(
        count = res.recommendations.len(),
        stage = %res.effective_stage,
        "served recommendations"
    );
    Ok(Json(res))
}
