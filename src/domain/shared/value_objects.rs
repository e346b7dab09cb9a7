//! Shared value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the store to a persisted event.
///
/// Ids are strictly increasing and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_ordering() {
        assert!(EventId::new(1) < EventId::new(2));
        assert_eq!(EventId::from(7).as_i64(), 7);
    }

    #[test]
    fn test_event_id_serializes_as_number() {
        let json = serde_json::to_string(&EventId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
