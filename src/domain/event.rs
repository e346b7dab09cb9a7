//! Event domain model
//!
//! `Event` is the wire form exchanged between the propagator and the
//! consumer. `StoredEvent` is the persisted, id/timestamp-augmented record.

use super::shared::{DomainError, EventId, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event as sent by the propagator and received by the consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_type: String,
    pub event_payload: String,
}

impl Event {
    pub fn new(event_type: impl Into<String>, event_payload: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            event_payload: event_payload.into(),
        }
    }

    /// Parse and validate a raw ingest body.
    ///
    /// The body must be a JSON object carrying string `event_type` and
    /// `event_payload` fields. Unknown fields are ignored.
    pub fn from_json_slice(body: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| DomainError::Validation(format!("body is not valid JSON: {}", e)))?;

        // Derived deserializers also accept sequences; only objects are valid here.
        if !value.is_object() {
            return Err(DomainError::Validation("body is not a JSON object".to_string()));
        }

        serde_json::from_value(value).map_err(|e| DomainError::Validation(e.to_string()))
    }
}

/// Event as persisted by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only event store port
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EventRepository: Send + Sync {
    /// Append one event, returning its newly assigned id
    async fn insert(&self, event_type: &str, payload: &str) -> Result<EventId>;

    /// List events in ascending id order; `None` returns every row
    async fn list(&self, limit: Option<i64>) -> Result<Vec<StoredEvent>>;

    /// Number of stored events
    async fn count(&self) -> Result<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_event() {
        let event =
            Event::from_json_slice(br#"{"event_type":"click","event_payload":"btn1"}"#).unwrap();
        assert_eq!(event, Event::new("click", "btn1"));
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let event = Event::from_json_slice(
            br#"{"event_type":"view","event_payload":"home","source":"web"}"#,
        )
        .unwrap();
        assert_eq!(event.event_type, "view");
    }

    #[test]
    fn test_parse_rejects_non_string_type() {
        let err = Event::from_json_slice(br#"{"event_type":123,"event_payload":"x"}"#).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_parse_rejects_missing_payload() {
        let err = Event::from_json_slice(br#"{"event_type":"click"}"#).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_parse_rejects_null_and_non_objects() {
        for body in [
            &br#"{"event_type":null,"event_payload":"x"}"#[..],
            &br#"["click","btn1"]"#[..],
            &b"not json"[..],
            &b""[..],
        ] {
            assert!(Event::from_json_slice(body).is_err());
        }
    }

    #[test]
    fn test_stored_event_wire_names() {
        let stored = StoredEvent {
            id: EventId::new(1),
            event_type: "click".to_string(),
            payload: "btn1".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["type"], "click");
        assert_eq!(json["payload"], "btn1");
        assert!(json["created_at"].is_string());
    }
}
