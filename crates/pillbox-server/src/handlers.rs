//! HTTP request handlers for the pill catalog.
//!
//! Every handler opens its own storage session on the blocking pool, runs
//! one service operation and drops the session before responding.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router as AxumRouter,
};
use pillbox_domain::{PillId, StoreProvider};
use pillbox_service::{
    Created, Deleted, PillInfo, PillService, PillUpdate, PillView, ServiceError, Updated,
};
use pillbox_store::{SqliteDatabase, SqliteStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Detail returned for any unexpected failure
pub const INTERNAL_ERROR_DETAIL: &str = "Error interno del servidor.";
/// Detail returned when a query parameter is missing or malformed
pub const INVALID_QUERY_DETAIL: &str = "Parámetros de consulta inválidos.";
/// Detail returned when the id in the path is not an integer
pub const INVALID_ID_DETAIL: &str = "ID inválido.";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database that hands out one session per request
    pub db: Arc<SqliteDatabase>,
}

impl AppState {
    /// Wrap a database for sharing across handlers
    pub fn new(db: SqliteDatabase) -> Self {
        Self { db: Arc::new(db) }
    }
}

/// Query for `GET /pills/dibujos`
#[derive(Debug, Deserialize)]
pub struct DrawingsQuery {
    /// Color to list drawings for
    pub color: String,
}

/// Query for `GET /pills/info`
#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    /// Color of the pill
    pub color: String,
    /// Drawing of the pill
    pub dibujo: String,
}

/// Query for `POST /pills`
#[derive(Debug, Deserialize)]
pub struct CreateQuery {
    /// Color of the pill
    pub color: String,
    /// Drawing of the pill
    pub dibujo: String,
    /// Free-text description
    pub info: String,
    /// `dd/mm/yyyy`
    pub fecha: String,
}

/// Query for `PUT /pills/{id}`; every field optional
#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuery {
    /// New color
    pub color: Option<String>,
    /// New drawing
    pub dibujo: Option<String>,
    /// New description
    pub info: Option<String>,
    /// New date, `dd/mm/yyyy`
    pub fecha: Option<String>,
}

impl From<UpdateQuery> for PillUpdate {
    fn from(query: UpdateQuery) -> Self {
        PillUpdate {
            color: query.color,
            drawing: query.dibujo,
            info: query.info,
            date: query.fecha,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub detail: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// "ok" or "unavailable"
    pub status: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Error from the pill service
    Service(ServiceError),
    /// Request parameters could not be extracted
    BadRequest(&'static str),
    /// Blocking task failed to complete
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::Service(ServiceError::NotFound(e)) => (StatusCode::NOT_FOUND, e.to_string()),
            AppError::Service(e @ ServiceError::InvalidDate(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail.to_string()),
            AppError::Service(ServiceError::Store(msg)) | AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_DETAIL.to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { detail });
        (status, body).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected query string");
        AppError::BadRequest(INVALID_QUERY_DETAIL)
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected path");
        AppError::BadRequest(INVALID_ID_DETAIL)
    }
}

/// Run one service operation in its own storage session
async fn with_service<T, F>(state: &AppState, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&mut PillService<SqliteStore>) -> Result<T, ServiceError> + Send + 'static,
{
    let db = Arc::clone(&state.db);

    tokio::task::spawn_blocking(move || {
        let store = db
            .open()
            .map_err(|e| ServiceError::Store(e.to_string()))?;
        let mut service = PillService::new(store);
        op(&mut service)
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?
    .map_err(AppError::from)
}

/// GET /pills - Every record
async fn list_pills(State(state): State<AppState>) -> Result<Json<Vec<PillView>>, AppError> {
    let pills = with_service(&state, |service| service.list_all()).await?;
    Ok(Json(pills))
}

/// GET /pills/colores - Distinct colors
async fn list_colors(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let colors = with_service(&state, |service| service.list_colors()).await?;
    Ok(Json(colors))
}

/// GET /pills/dibujos?color= - Drawings for one color
async fn list_drawings(
    State(state): State<AppState>,
    query: Result<Query<DrawingsQuery>, QueryRejection>,
) -> Result<Json<Vec<String>>, AppError> {
    let Query(query) = query?;
    let drawings = with_service(&state, move |service| {
        service.list_drawings_by_color(&query.color)
    })
    .await?;
    Ok(Json(drawings))
}

/// GET /pills/info?color=&dibujo= - Info and date of the first match
async fn pill_info(
    State(state): State<AppState>,
    query: Result<Query<InfoQuery>, QueryRejection>,
) -> Result<Json<PillInfo>, AppError> {
    let Query(query) = query?;
    let info = with_service(&state, move |service| {
        service.get_info(&query.color, &query.dibujo)
    })
    .await?;
    Ok(Json(info))
}

/// POST /pills?color=&dibujo=&info=&fecha= - Add a record
async fn create_pill(
    State(state): State<AppState>,
    query: Result<Query<CreateQuery>, QueryRejection>,
) -> Result<Json<Created>, AppError> {
    let Query(query) = query?;
    let created = with_service(&state, move |service| {
        service.create(&query.color, &query.dibujo, &query.info, &query.fecha)
    })
    .await?;
    Ok(Json(created))
}

/// PUT /pills/{id} - Change the supplied fields
async fn update_pill(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    query: Result<Query<UpdateQuery>, QueryRejection>,
) -> Result<Json<Updated>, AppError> {
    let Path(id) = id?;
    let Query(query) = query?;
    let updated = with_service(&state, move |service| {
        service.update(PillId::new(id), PillUpdate::from(query))
    })
    .await?;
    Ok(Json(updated))
}

/// DELETE /pills/{id} - Remove a record
async fn delete_pill(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Deleted>, AppError> {
    let Path(id) = id?;
    let deleted = with_service(&state, move |service| service.delete(PillId::new(id))).await?;
    Ok(Json(deleted))
}

/// GET /health - Whether a storage session can be opened
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthCheckResponse>) {
    let db = Arc::clone(&state.db);
    let reachable = tokio::task::spawn_blocking(move || db.open().is_ok())
        .await
        .unwrap_or(false);

    let (status, label) = if reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(HealthCheckResponse {
            status: label.to_string(),
        }),
    )
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/pills", get(list_pills).post(create_pill))
        .route("/pills/colores", get(list_colors))
        .route("/pills/dibujos", get(list_drawings))
        .route("/pills/info", get(pill_info))
        .route("/pills/:id", put(update_pill).delete(delete_pill))
        .route("/health", get(health_check))
        .with_state(state)
}
