//! Propagator loop
//!
//! Every `period` one event is picked uniformly at random from the catalog
//! and handed to the dispatch pool. The ticker only selects and submits; it
//! never waits on network I/O, so slow or failed deliveries do not shift the
//! schedule.

use crate::domain::catalog::EventCatalog;
use crate::domain::shared::{DomainError, Result};
use crate::infrastructure::dispatch::{DispatchPool, SubmitOutcome};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// How long queued deliveries may keep running after shutdown is requested
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub struct Propagator {
    catalog: Arc<EventCatalog>,
    pool: DispatchPool,
    period: Duration,
}

impl Propagator {
    pub fn new(catalog: Arc<EventCatalog>, pool: DispatchPool, period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(DomainError::Config("period must be positive".to_string()));
        }

        Ok(Self {
            catalog,
            pool,
            period,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run until `shutdown` resolves, returning the number of selections made.
    ///
    /// The first selection happens immediately.
    pub async fn run_until<F>(self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        info!(
            "Propagating {} catalog events every {:?}",
            self.catalog.len(),
            self.period
        );

        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut selections = 0u64;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let event = {
                        let mut rng = rand::thread_rng();
                        self.catalog.choose(&mut rng).clone()
                    };
                    info!("Sending event: {:?}", event);

                    if self.pool.submit(event) == SubmitOutcome::Closed {
                        warn!("Dispatch pool closed, stopping propagator");
                        break;
                    }
                    selections += 1;
                }
            }
        }

        info!("Propagator stopping after {} selections", selections);
        if tokio::time::timeout(SHUTDOWN_GRACE, self.pool.shutdown())
            .await
            .is_err()
        {
            warn!("Abandoning in-flight deliveries after {:?}", SHUTDOWN_GRACE);
        }

        selections
    }
}
