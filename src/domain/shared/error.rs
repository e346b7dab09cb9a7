//! Domain errors

use thiserror::Error;

/// Domain result type
pub type Result<T> = std::result::Result<T, DomainError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Inbound event payload is malformed or missing fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage connection or commit failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Event catalog could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// An event could not be delivered to the consumer
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Invalid or missing startup configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for DomainError {
    fn from(e: sqlx::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}
