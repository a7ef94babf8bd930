use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Form, Json, Path, Query, State,
        rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::core::{
    Allocation, InMemoryRecordStore, ProfileUpdate, Record, RecordId, RecordStore, StoreError,
    UpdateError, UserProfile, compute,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Clone)]
struct AppState {
    store: Arc<dyn RecordStore>,
}

#[derive(Debug, Deserialize)]
struct AdjustForm {
    user_id: u64,
    field: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ProgressForm {
    user_id: u64,
    goal: String,
    progress: f64,
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    user_id: RecordId,
    recommendation: Allocation,
}

#[derive(Debug, Serialize)]
struct AdjustResponse {
    success: bool,
    recommendation: Allocation,
}

#[derive(Debug, Serialize)]
struct SuccessResponse {
    success: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

#[derive(Debug, Error)]
enum ApiError {
    #[error("User not found")]
    RecordNotFound(RecordId),
    #[error("{0}")]
    InvalidUpdate(#[from] UpdateError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Not found")]
    RouteNotFound,
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => ApiError::RecordNotFound(id),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::RecordNotFound(id) => {
                tracing::warn!(record_id = %id, "record not found");
                StatusCode::NOT_FOUND
            }
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidUpdate(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        error_response(status, &self.to_string())
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Builds the application router around `store`.
pub fn router(store: Arc<dyn RecordStore>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/healthz", get(health_handler))
        .route("/submit", post(submit_handler))
        .route("/adjust", post(adjust_handler))
        .route("/track_progress", post(track_progress_handler))
        .route(
            "/api/recommend",
            get(recommend_get_handler).post(recommend_post_handler),
        )
        .route("/api/records/:id", get(record_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let app = router(Arc::new(InMemoryRecordStore::new()));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "allocation advisor listening");
    tracing::info!("local access: http://127.0.0.1:{}/", addr.port());

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> ApiError {
    ApiError::RouteNotFound
}

async fn submit_handler(
    State(state): State<AppState>,
    form: Result<Form<UserProfile>, FormRejection>,
) -> ApiResult<Response> {
    let Form(profile) = form.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let record = state.store.create(profile);
    tracing::info!(
        record_id = %record.id,
        risk_tolerance = %record.profile.risk_tolerance,
        "recommendation created"
    );
    log_unbalanced(&record.allocation);

    Ok(json_response(
        StatusCode::OK,
        SubmitResponse {
            user_id: record.id,
            recommendation: record.allocation,
        },
    ))
}

async fn adjust_handler(
    State(state): State<AppState>,
    form: Result<Form<AdjustForm>, FormRejection>,
) -> ApiResult<Response> {
    let Form(form) = form.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let id = RecordId(form.user_id);
    // An unknown record takes precedence over a malformed field.
    state.store.get(id)?;

    let update = ProfileUpdate::parse(&form.field, &form.value)?;
    let field = update.field();
    let recommendation = state.store.update_profile(id, update)?;
    tracing::info!(record_id = %id, field, "profile adjusted");
    log_unbalanced(&recommendation);

    Ok(json_response(
        StatusCode::OK,
        AdjustResponse {
            success: true,
            recommendation,
        },
    ))
}

async fn track_progress_handler(
    State(state): State<AppState>,
    form: Result<Form<ProgressForm>, FormRejection>,
) -> ApiResult<Response> {
    let Form(form) = form.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let id = RecordId(form.user_id);
    state.store.record_progress(id, &form.goal, form.progress)?;
    tracing::info!(
        record_id = %id,
        goal = %form.goal,
        progress = form.progress,
        "progress recorded"
    );

    Ok(json_response(StatusCode::OK, SuccessResponse { success: true }))
}

async fn recommend_get_handler(
    query: Result<Query<UserProfile>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(profile) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(recommend_impl(&profile))
}

async fn recommend_post_handler(
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(profile) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(recommend_impl(&profile))
}

fn recommend_impl(profile: &UserProfile) -> Response {
    let allocation = compute(profile);
    log_unbalanced(&allocation);
    json_response(StatusCode::OK, allocation)
}

async fn record_handler(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Response> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let record: Record = state.store.get(RecordId(id))?;
    Ok(json_response(StatusCode::OK, record))
}

fn log_unbalanced(allocation: &Allocation) {
    let total = allocation.total();
    if total != 100 {
        tracing::debug!(total, "allocation does not sum to 100");
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            success: false,
            error: msg.to_string(),
        },
    )
}
