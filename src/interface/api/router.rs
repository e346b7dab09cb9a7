//! API Router configuration

use super::event_handler::{
    health_check, ingest_event, list_events, AppState, MAX_EVENT_BODY_BYTES,
};
use super::metrics_handler::metrics_handler;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

/// Build the consumer API router
pub fn build_router(state: AppState) -> Router {
    let event_routes = Router::new()
        .route(
            "/event",
            post(ingest_event).layer(DefaultBodyLimit::max(MAX_EVENT_BODY_BYTES)),
        )
        .route("/events", get(list_events));

    Router::new()
        .route("/health", get(health_check))
        .merge(event_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Add the Prometheus scrape route to a router
pub fn with_metrics(router: Router, prometheus_handle: PrometheusHandle) -> Router {
    let metrics_routes = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(prometheus_handle);

    router.merge(metrics_routes)
}
