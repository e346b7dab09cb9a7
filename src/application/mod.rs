//! Application layer - Use cases
//!
//! Orchestrates the catalog and the dispatch infrastructure into the
//! propagator's timer-driven delivery loop.

pub mod propagator;

pub use propagator::Propagator;
