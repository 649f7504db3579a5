// HTTP handlers: metrics queries, export, alerts, service health

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::error::MetricsError;
use crate::models::{AlertSnapshot, ExportFormat, ExportOutput, Metric, Sample};
use crate::version::{NAME, VERSION};

/// Maps core errors to a 400 with `{"error": "..."}`.
pub(super) struct ApiError(MetricsError);

impl From<MetricsError> for ApiError {
    fn from(e: MetricsError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            MetricsError::Csv(_) | MetricsError::Utf8(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WindowParams {
    window_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RangeParams {
    start: u64,
    end: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct ExportParams {
    format: Option<String>,
    start: Option<u64>,
    end: Option<u64>,
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/monitoring/health — liveness of this process.
pub(super) async fn self_health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": VERSION,
        "samples": state.aggregator.len(),
        "capacity": state.aggregator.capacity(),
        "memoryFootprintBytes": state.aggregator.memory_footprint_bytes(),
    }))
}

pub(super) async fn latest_handler(State(state): State<AppState>) -> Response {
    match state.aggregator.latest() {
        Some(sample) => Json(sample).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "no samples collected yet" })),
        )
            .into_response(),
    }
}

pub(super) async fn add_sample_handler(
    State(state): State<AppState>,
    Json(sample): Json<Sample>,
) -> Result<impl IntoResponse, ApiError> {
    state.aggregator.add_sample(sample)?;
    Ok((StatusCode::CREATED, Json(sample)))
}

pub(super) async fn clear_handler(State(state): State<AppState>) -> StatusCode {
    state.aggregator.clear();
    tracing::info!(operation = "clear_metrics", "metrics store cleared");
    StatusCode::NO_CONTENT
}

pub(super) async fn summary_handler(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> impl IntoResponse {
    let window_ms = params
        .window_ms
        .unwrap_or(state.config.monitoring.default_window_ms);
    Json(state.aggregator.summary(window_ms))
}

pub(super) async fn trend_handler(
    State(state): State<AppState>,
    Path(metric): Path<String>,
    Query(params): Query<WindowParams>,
) -> Result<impl IntoResponse, ApiError> {
    let metric: Metric = metric.parse()?;
    let window_ms = params
        .window_ms
        .unwrap_or(state.config.monitoring.default_window_ms);
    Ok(Json(state.aggregator.trend(metric, window_ms)))
}

pub(super) async fn range_handler(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> impl IntoResponse {
    Json(state.aggregator.range(params.start, params.end))
}

/// GET /api/metrics/export — JSON body, or a CSV attachment when `format=csv`.
pub(super) async fn export_handler(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<Response, ApiError> {
    let format = params
        .format
        .as_deref()
        .map(ExportFormat::parse_or_default)
        .unwrap_or_default();
    let out = state.aggregator.export(format, params.start, params.end)?;
    let response = match out {
        ExportOutput::Json(export) => Json(export).into_response(),
        ExportOutput::Csv(export) => (
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export.filename),
                ),
            ],
            export.content,
        )
            .into_response(),
    };
    Ok(response)
}

pub(super) async fn evaluate_alerts_handler(
    State(state): State<AppState>,
    Json(snapshot): Json<AlertSnapshot>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.evaluator.evaluate(&snapshot)?))
}

/// GET /api/alerts/current — alerts for the most recent sample; empty when nothing is stored.
pub(super) async fn current_alerts_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let alerts = match state.aggregator.latest() {
        Some(sample) => state.evaluator.evaluate(&AlertSnapshot::from(&sample))?,
        None => Vec::new(),
    };
    Ok(Json(alerts))
}

pub(super) async fn alert_rules_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.evaluator.rules().to_vec())
}

/// GET /api/services/health — probes every configured service concurrently.
pub(super) async fn services_health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.health_checker.check_configured().await)
}
