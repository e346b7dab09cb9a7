//! HTTP delivery of events to the consumer

use crate::domain::event::Event;
use crate::domain::shared::{DomainError, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

/// Delivers a single event to the consumer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSender: Send + Sync {
    /// Send the event, returning the response status code on success
    async fn send(&self, event: &Event) -> Result<u16>;
}

/// POSTs events as JSON to `<base>/event`
pub struct HttpEventSender {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpEventSender {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let endpoint = event_endpoint(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Resolve the ingest endpoint against the consumer base URL
pub fn event_endpoint(base_url: &str) -> Result<Url> {
    let base = Url::parse(base_url)
        .map_err(|e| DomainError::Config(format!("invalid consumer URL {}: {}", base_url, e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(DomainError::Config(format!(
            "consumer URL must be http or https: {}",
            base_url
        )));
    }

    base.join("/event")
        .map_err(|e| DomainError::Config(format!("invalid consumer URL {}: {}", base_url, e)))
}

#[async_trait]
impl EventSender for HttpEventSender {
    async fn send(&self, event: &Event) -> Result<u16> {
        debug!("POST {} ({})", self.endpoint, event.event_type);

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(event)
            .send()
            .await
            .map_err(|e| DomainError::Delivery(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Delivery(format!(
                "consumer returned {}: {}",
                status, body
            )));
        }

        Ok(status.as_u16())
    }
}
