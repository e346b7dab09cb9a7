//! Event API DTOs

use super::error::ApiError;
use crate::domain::event::StoredEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored event as returned by `GET /events`
#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredEvent> for EventResponse {
    fn from(event: StoredEvent) -> Self {
        EventResponse {
            id: event.id.as_i64(),
            event_type: event.event_type,
            payload: event.payload,
            created_at: event.created_at,
        }
    }
}

/// Acknowledgement for `POST /event`
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: String,
}

impl IngestResponse {
    pub fn received() -> Self {
        Self {
            status: "received".to_string(),
        }
    }
}

/// Query parameters for listing events
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsQuery {
    /// Kept as text so malformed values get our own error body
    pub count: Option<String>,
}

impl ListEventsQuery {
    /// `Ok(None)` when absent; non-integer or negative values are rejected
    pub fn limit(&self) -> Result<Option<i64>, ApiError> {
        match self.count.as_deref() {
            None => Ok(None),
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(n) if n >= 0 => Ok(Some(n)),
                _ => Err(ApiError::InvalidCount),
            },
        }
    }
}
