//! eventpipe - A minimal event ingestion pipeline
//!
//! A propagator periodically picks a random event from a catalog and POSTs it
//! to a consumer service, which validates it, appends it to an event store
//! and exposes it through a listing endpoint.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod telemetry;

// Re-export commonly used types
pub use domain::shared::error::DomainError;
pub use domain::shared::error::Result;
