//! Infrastructure layer - Technical implementations
//!
//! This layer contains:
//! - Event store implementations (PostgreSQL, in-memory)
//! - HTTP dispatch of events to the consumer

pub mod dispatch;
pub mod persistence;
