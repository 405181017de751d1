use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use pharmalog_common::{FormulaRecord, IncidentRecord, Role};
use serde::Deserialize;
use tracing::{error, info};

use super::handle::StoreHandle;
use crate::errors::{StoreError, ValidationError};
use crate::report::{CostReport, Granularity, ProductionReport, ReportFilter};

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub store: StoreHandle,
    /// Grouping used by the report routes when the query has none
    pub report_group: Granularity,
}

pub type SharedState = Arc<AppState>;

// ── Request payload types ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    pub name: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateErrorTypeRequest {
    #[serde(default)]
    pub name: String,
}

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_not_found() {
            ApiError::NotFound(err.to_string())
        } else if err.is_rejection() {
            ApiError::BadRequest(err.to_string())
        } else {
            error!(error = %err, "store operation failed");
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

// Extractor failures answer with the same JSON error body and a 400.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

fn success(status: StatusCode, message: String) -> impl IntoResponse {
    (
        status,
        Json(serde_json::json!({"success": true, "message": message})),
    )
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/{name}", delete(delete_employee))
        .route("/formulas", get(list_formulas).post(create_formula))
        .route("/incidents", get(list_incidents).post(create_incident))
        .route("/error-types", get(list_error_types).post(create_error_type))
        .route("/error-types/{name}", delete(delete_error_type))
        .route("/reports/production", get(production_report))
        .route("/reports/costs", get(cost_report))
        .route("/health", get(health_check))
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn list_employees(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let employees = state.store.call(|store| store.employees.list()).await?;
    Ok(Json(employees))
}

async fn create_employee(
    State(state): State<SharedState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let role = match req.role.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<Role>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        ),
    };
    let name = req.name;
    let employee = state
        .store
        .call(move |store| store.employees.add(&name, role))
        .await?;
    info!(name = %employee.name, "employee added over HTTP");
    Ok(success(
        StatusCode::CREATED,
        format!("Employee '{}' added.", employee.name),
    ))
}

async fn delete_employee(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .store
        .call(move |store| store.employees.remove(&name))
        .await?;
    Ok(success(
        StatusCode::OK,
        format!("Employee '{}' removed.", removed.name),
    ))
}

async fn list_formulas(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let formulas = state.store.call(|store| store.formulas.list()).await?;
    Ok(Json(formulas))
}

async fn create_formula(
    State(state): State<SharedState>,
    payload: Result<Json<FormulaRecord>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(record) = payload?;
    state
        .store
        .call(move |store| store.formulas.append(record))
        .await?;
    Ok(success(StatusCode::CREATED, "Formula added.".to_string()))
}

async fn list_incidents(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let incidents = state.store.call(|store| store.incidents.list()).await?;
    Ok(Json(incidents))
}

async fn create_incident(
    State(state): State<SharedState>,
    payload: Result<Json<IncidentRecord>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(record) = payload?;
    state
        .store
        .call(move |store| store.incidents.append(record))
        .await?;
    Ok(success(StatusCode::CREATED, "Incident added.".to_string()))
}

async fn list_error_types(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let types = state.store.call(|store| store.error_types.list()).await?;
    Ok(Json(types))
}

async fn create_error_type(
    State(state): State<SharedState>,
    payload: Result<Json<CreateErrorTypeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let name = req.name.trim().to_string();
    let message = format!("Error type '{}' added.", name);
    state
        .store
        .call(move |store| store.error_types.add(&name))
        .await?;
    Ok(success(StatusCode::CREATED, message))
}

async fn delete_error_type(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let message = format!("Error type '{}' removed.", name);
    state
        .store
        .call(move |store| store.error_types.remove(&name))
        .await?;
    Ok(success(StatusCode::OK, message))
}

async fn production_report(
    State(state): State<SharedState>,
    query: Result<Query<ReportFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = query?;
    filter.validate()?;
    let records = state.store.call(|store| store.formulas.load()).await?;
    let mut report = ProductionReport::build(&records.rows, &filter, state.report_group, today());
    report.skipped += records.skipped;
    Ok(Json(report))
}

async fn cost_report(
    State(state): State<SharedState>,
    query: Result<Query<ReportFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = query?;
    filter.validate()?;
    let records = state.store.call(|store| store.incidents.load()).await?;
    let mut report = CostReport::build(&records.rows, &filter, state.report_group, today());
    report.skipped += records.skipped;
    Ok(Json(report))
}
