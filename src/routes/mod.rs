// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregator::MetricsAggregator;
use crate::alerts::AlertEvaluator;
use crate::config::AppConfig;
use crate::models::MetricsEvent;
use crate::service_health::ServiceHealthChecker;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) aggregator: Arc<MetricsAggregator>,
    pub(crate) evaluator: Arc<AlertEvaluator>,
    pub(crate) health_checker: Arc<ServiceHealthChecker>,
    pub(crate) events_tx: broadcast::Sender<MetricsEvent>,
    pub(crate) ws_connections: Arc<AtomicUsize>,
    pub(crate) config: AppConfig,
}

/// Everything the router needs; built once in main (or a test) and moved in.
pub struct AppDeps {
    pub aggregator: Arc<MetricsAggregator>,
    pub evaluator: Arc<AlertEvaluator>,
    pub health_checker: Arc<ServiceHealthChecker>,
    pub events_tx: broadcast::Sender<MetricsEvent>,
    pub ws_connections: Arc<AtomicUsize>,
}

pub fn app(deps: AppDeps, config: AppConfig) -> Router {
    let state = AppState {
        aggregator: deps.aggregator,
        evaluator: deps.evaluator,
        health_checker: deps.health_checker,
        events_tx: deps.events_tx,
        ws_connections: deps.ws_connections,
        config,
    };
    Router::new()
        .route("/", get(|| async { "pulsewatch monitoring backend" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/monitoring/health", get(http::self_health_handler))
        .route("/api/metrics", delete(http::clear_handler))
        .route("/api/metrics/latest", get(http::latest_handler))
        .route("/api/metrics/samples", post(http::add_sample_handler))
        .route("/api/metrics/summary", get(http::summary_handler))
        .route("/api/metrics/trend/{metric}", get(http::trend_handler))
        .route("/api/metrics/range", get(http::range_handler))
        .route("/api/metrics/export", get(http::export_handler))
        .route("/api/alerts/evaluate", post(http::evaluate_alerts_handler))
        .route("/api/alerts/current", get(http::current_alerts_handler))
        .route("/api/alerts/rules", get(http::alert_rules_handler))
        .route("/api/services/health", get(http::services_health_handler))
        .route("/ws/metrics", get(ws::ws_metrics)) // WS /ws/metrics
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
