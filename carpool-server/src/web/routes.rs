//! HTTP route handlers.

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use serde::de::DeserializeOwned;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::DomainError;
use crate::matcher::{PlanError, plan_carpools};
use crate::oracle::{DistanceOracle, OracleError};

use super::dto::*;
use super::state::AppState;
use super::templates::ReportTemplate;

/// Create the application router.
pub fn create_router<O: DistanceOracle + 'static>(state: AppState<O>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/plan", post(plan::<O>))
        .route("/report", post(report::<O>))
        .route("/report/from-result", post(report_from_result::<O>))
        .route("/diag/oracle", get(diag_oracle::<O>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan carpools and return them as JSON.
async fn plan<O: DistanceOracle>(
    State(state): State<AppState<O>>,
    body: Bytes,
) -> Result<Json<PlanResponse>, AppError> {
    let request: PlanRequest = parse_json(&body)?;
    Ok(Json(run_plan(&state, request).await?))
}

/// Plan carpools and return a printable report.
async fn report<O: DistanceOracle>(
    State(state): State<AppState<O>>,
    Query(query): Query<ReportQuery>,
    body: Bytes,
) -> Result<Html<String>, AppError> {
    let request: PlanRequest = parse_json(&body)?;
    let destination = request.destination.clone();
    let response = run_plan(&state, request).await?;

    render_report(&response, &query, Some(&destination), &state.logo_url)
}

/// Render a report from a previously returned plan, without routing calls.
async fn report_from_result<O: DistanceOracle>(
    State(state): State<AppState<O>>,
    Query(query): Query<ReportQuery>,
    body: Bytes,
) -> Result<Html<String>, AppError> {
    let response: PlanResponse = parse_json(&body)?;
    render_report(&response, &query, query.destination.as_deref(), &state.logo_url)
}

/// Check that the routing provider can be reached.
async fn diag_oracle<O: DistanceOracle>(
    State(state): State<AppState<O>>,
) -> Result<Json<DiagResponse>, AppError> {
    let status_code = state
        .oracle
        .ping()
        .await
        .map_err(|e| AppError::Unavailable {
            message: format!("Routing provider unreachable: {e}"),
        })?;

    Ok(Json(DiagResponse {
        ok: true,
        status_code,
    }))
}

/// Parse a JSON body manually so the body can be logged on failure.
fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

async fn run_plan<O: DistanceOracle>(
    state: &AppState<O>,
    request: PlanRequest,
) -> Result<PlanResponse, AppError> {
    let (participants, destination) = request.into_parts()?;
    let plan = plan_carpools(state.oracle.as_ref(), participants, &destination, &state.config).await?;
    Ok(PlanResponse::from_plan(&plan)?)
}

fn render_report(
    response: &PlanResponse,
    query: &ReportQuery,
    destination: Option<&str>,
    default_logo: &str,
) -> Result<Html<String>, AppError> {
    let template = ReportTemplate::new(response, query, destination, default_logo, &Local::now());
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })?;
    Ok(Html(html))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    BadGateway { message: String },
    Unavailable { message: String },
    GatewayTimeout { message: String },
    Internal { message: String },
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<OracleError> for AppError {
    fn from(e: OracleError) -> Self {
        let message = e.to_string();
        if e.is_address_not_found() {
            AppError::BadRequest { message }
        } else if e.is_timeout() {
            AppError::GatewayTimeout { message }
        } else {
            AppError::BadGateway { message }
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Oracle(e) => e.into(),
            PlanError::Domain(e) => e.into(),
            PlanError::InvalidRequest(message) => AppError::BadRequest { message },
            PlanError::Config(e) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::GatewayTimeout { message } => (StatusCode::GATEWAY_TIMEOUT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
