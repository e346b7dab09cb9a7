//! HTTP API of the consumer service

pub mod error;
pub mod event_dto;
pub mod event_handler;
pub mod metrics_handler;
pub mod router;

pub use error::ApiError;
pub use event_handler::AppState;
pub use metrics_handler::{init_metrics, init_metrics_listener};
pub use router::{build_router, with_metrics};
