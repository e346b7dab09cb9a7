//! Domain layer - Core types and ports
//!
//! This layer contains:
//! - Events: the wire form and the persisted form
//! - Repository interface: port for the append-only event store
//! - Catalog: the candidate pool sampled by the propagator

pub mod catalog;
pub mod event;
pub mod shared;

// Re-export commonly used types
pub use catalog::EventCatalog;
pub use event::{Event, EventRepository, StoredEvent};
pub use shared::{DomainError, EventId, Result};
