//! Event catalog
//!
//! The fixed pool of candidate events the propagator samples from. Loaded
//! once at startup and never mutated afterwards.

use super::event::Event;
use super::shared::{DomainError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;
use tracing::info;

/// Immutable, non-empty set of candidate events
#[derive(Debug, Clone)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    /// Build a catalog from already-parsed events; fails on an empty list
    pub fn from_events(events: Vec<Event>) -> Result<Self> {
        if events.is_empty() {
            return Err(DomainError::Catalog("catalog contains no events".to_string()));
        }
        Ok(Self { events })
    }

    /// Load a catalog from a JSON file holding an array of
    /// `{"event_type": ..., "event_payload": ...}` objects
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Catalog(format!("cannot read event file {}: {}", path.display(), e))
        })?;

        let events: Vec<Event> = serde_json::from_str(&contents).map_err(|e| {
            DomainError::Catalog(format!("invalid JSON in event file {}: {}", path.display(), e))
        })?;

        let catalog = Self::from_events(events)?;
        info!("Successfully loaded {} events from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Pick one event uniformly at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Event {
        self.events
            .choose(rng)
            .expect("catalog is non-empty by construction")
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
