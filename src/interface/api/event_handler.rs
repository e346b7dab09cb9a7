//! Event API handlers

use super::error::ApiError;
use super::event_dto::{EventResponse, IngestResponse, ListEventsQuery};
use super::metrics_handler::{
    record_event_received, record_event_rejected, record_event_stored, record_storage_error,
};
use crate::domain::event::{Event, EventRepository};
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Largest accepted ingest body, in bytes
pub const MAX_EVENT_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub event_repository: Arc<dyn EventRepository>,
}

impl AppState {
    pub fn new(event_repository: Arc<dyn EventRepository>) -> Self {
        Self { event_repository }
    }
}

/// Ingest a single event.
///
/// The body is parsed whatever its `Content-Type`; it must be a JSON object
/// with string `event_type` and `event_payload` fields, at most
/// [`MAX_EVENT_BODY_BYTES`] long.
pub async fn ingest_event(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<IngestResponse>, ApiError> {
    record_event_received();

    let body = body.map_err(|rejection| {
        warn!("API: Unreadable event body: {}", rejection);
        record_event_rejected();
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::InvalidDataFormat
        }
    })?;

    let event = Event::from_json_slice(&body).map_err(|e| {
        warn!("API: Rejected event: {}", e);
        record_event_rejected();
        ApiError::from(e)
    })?;

    info!(
        "API: Received event (type: {}, payload: {})",
        event.event_type, event.event_payload
    );

    let id = state
        .event_repository
        .insert(&event.event_type, &event.event_payload)
        .await
        .map_err(|e| {
            record_storage_error("insert");
            ApiError::from(e)
        })?;

    record_event_stored();
    info!("API: Stored event {}", id);

    Ok(Json(IngestResponse::received()))
}

/// List stored events, earliest first
pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<ListEventsQuery>, QueryRejection>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    // Repeated or undecodable parameters fall under the same policy
    let Query(query) = query.map_err(|rejection| {
        warn!("API: Rejected list query: {}", rejection);
        ApiError::InvalidCount
    })?;
    let limit = query.limit()?;
    info!("API: Listing events (count: {:?})", limit);

    let events = state.event_repository.list(limit).await.map_err(|e| {
        record_storage_error("list");
        ApiError::from(e)
    })?;

    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::MockEventRepository;
    use crate::domain::shared::{DomainError, EventId};

    #[tokio::test]
    async fn test_ingest_calls_store_once() {
        let mut repo = MockEventRepository::new();
        repo.expect_insert()
            .withf(|t, p| t == "click" && p == "btn1")
            .times(1)
            .returning(|_, _| Ok(EventId::new(1)));

        let state = AppState::new(Arc::new(repo));
        let body = Bytes::from_static(br#"{"event_type":"click","event_payload":"btn1"}"#);

        let Json(resp) = ingest_event(State(state), Ok(body)).await.unwrap();
        assert_eq!(resp.status, "received");
    }

    #[tokio::test]
    async fn test_invalid_event_never_reaches_store() {
        let mut repo = MockEventRepository::new();
        repo.expect_insert().times(0);

        let state = AppState::new(Arc::new(repo));
        let body = Bytes::from_static(br#"{"event_type":123,"event_payload":"x"}"#);

        let err = ingest_event(State(state), Ok(body)).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidDataFormat));
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces() {
        let mut repo = MockEventRepository::new();
        repo.expect_insert()
            .returning(|_, _| Err(DomainError::Storage("connection refused".to_string())));

        let state = AppState::new(Arc::new(repo));
        let body = Bytes::from_static(br#"{"event_type":"click","event_payload":"btn1"}"#);

        let err = ingest_event(State(state), Ok(body)).await.unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
    }

    #[tokio::test]
    async fn test_list_passes_limit() {
        let mut repo = MockEventRepository::new();
        repo.expect_list()
            .withf(|limit| *limit == Some(2))
            .times(1)
            .returning(|_| Ok(vec![]));

        let state = AppState::new(Arc::new(repo));
        let query = ListEventsQuery {
            count: Some("2".to_string()),
        };

        let Json(events) = list_events(State(state), Ok(Query(query))).await.unwrap();
        assert!(events.is_empty());
    }
}
