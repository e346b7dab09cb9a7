//! Dispatch worker pool
//!
//! A bounded queue drained by a fixed set of worker tasks. Submission never
//! waits: when the queue is full the event is dropped and counted. Delivery
//! failures are logged and never retried.

use super::sender::EventSender;
use crate::domain::event::Event;
use metrics::counter;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Result of handing an event to the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Queued,
    /// Queue at capacity; the event was discarded
    Dropped,
    /// Pool is shutting down
    Closed,
}

pub struct DispatchPool {
    tx: mpsc::Sender<Event>,
    workers: Vec<JoinHandle<()>>,
}

impl DispatchPool {
    /// Spawn `workers` delivery tasks sharing a queue of `capacity` events
    pub fn spawn(sender: Arc<dyn EventSender>, workers: usize, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let workers = (0..workers.max(1))
            .map(|worker_id| {
                let rx = rx.clone();
                let sender = sender.clone();
                tokio::spawn(async move { run_worker(worker_id, rx, sender).await })
            })
            .collect::<Vec<_>>();

        info!(
            "Dispatch pool started ({} workers, queue capacity {})",
            workers.len(),
            capacity.max(1)
        );

        Self { tx, workers }
    }

    /// Queue an event for delivery without waiting
    pub fn submit(&self, event: Event) -> SubmitOutcome {
        match self.tx.try_send(event) {
            Ok(()) => {
                counter!("events_dispatched_total").increment(1);
                SubmitOutcome::Queued
            }
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!("Dispatch queue full, dropping event: {:?}", event);
                counter!("events_dropped_total").increment(1);
                SubmitOutcome::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => SubmitOutcome::Closed,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Stop accepting events and wait for queued deliveries to finish
    pub async fn shutdown(self) {
        drop(self.tx);
        for result in futures::future::join_all(self.workers).await {
            if let Err(e) = result {
                error!("Dispatch worker panicked: {}", e);
            }
        }
        info!("Dispatch pool stopped");
    }
}

async fn run_worker(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<Event>>>,
    sender: Arc<dyn EventSender>,
) {
    loop {
        // Lock is only held while waiting for the next event
        let next = rx.lock().await.recv().await;
        let Some(event) = next else {
            debug!("Dispatch worker {} exiting", worker_id);
            break;
        };

        match sender.send(&event).await {
            Ok(status) => {
                info!("Event sent successfully: {}", status);
                counter!("events_delivered_total").increment(1);
            }
            Err(e) => {
                error!("Error sending event: {}", e);
                counter!("events_delivery_failed_total").increment(1);
            }
        }
    }
}
