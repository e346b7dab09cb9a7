//! Event dispatch to the consumer service

pub mod pool;
pub mod sender;

pub use pool::{DispatchPool, SubmitOutcome};
pub use sender::{event_endpoint, EventSender, HttpEventSender};
