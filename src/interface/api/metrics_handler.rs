//! Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;

fn describe_metrics() {
    describe_counter!("events_received_total", "Ingest requests received");
    describe_counter!("events_rejected_total", "Ingest requests rejected as malformed");
    describe_counter!("events_stored_total", "Events committed to the store");
    describe_counter!("events_storage_errors_total", "Store operations that failed");
    describe_counter!("events_dispatched_total", "Events queued for delivery");
    describe_counter!("events_dropped_total", "Events dropped because the dispatch queue was full");
    describe_counter!("events_delivered_total", "Events accepted by the consumer");
    describe_counter!("events_delivery_failed_total", "Deliveries that failed");
}

/// Install the Prometheus recorder, rendered through [`metrics_handler`]
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    Ok(handle)
}

/// Install the Prometheus recorder with its own scrape listener.
///
/// Used by processes that do not run an axum server.
pub fn init_metrics_listener(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    describe_metrics();
    Ok(())
}

/// HTTP metrics handler
pub async fn metrics_handler(State(prometheus_handle): State<PrometheusHandle>) -> Response {
    let metrics = prometheus_handle.render();
    (StatusCode::OK, metrics).into_response()
}

pub fn record_event_received() {
    counter!("events_received_total").increment(1);
}

pub fn record_event_rejected() {
    counter!("events_rejected_total").increment(1);
}

pub fn record_event_stored() {
    counter!("events_stored_total").increment(1);
}

pub fn record_storage_error(operation: &'static str) {
    counter!("events_storage_errors_total", "operation" => operation).increment(1);
}
