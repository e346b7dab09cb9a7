use anyhow::Context;
use clap::Parser;
use eventpipe::application::Propagator;
use eventpipe::config::PropagatorArgs;
use eventpipe::domain::EventCatalog;
use eventpipe::infrastructure::dispatch::{DispatchPool, HttpEventSender};
use eventpipe::interface::api::init_metrics_listener;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    eventpipe::telemetry::init_tracing();

    let config = PropagatorArgs::parse()
        .into_config()
        .context("invalid propagator configuration")?;

    // validate() guarantees both are present
    let event_file = config.event_file.clone().context("event file is required")?;
    let api_address = config.api_address.clone().context("api address is required")?;

    let catalog = Arc::new(EventCatalog::load(&event_file).context("failed to load events")?);

    if let Some(addr) = config.metrics_address {
        init_metrics_listener(addr).context("failed to start metrics listener")?;
        info!("Serving metrics on {}", addr);
    }

    let sender = HttpEventSender::new(&api_address, config.request_timeout_duration())?;
    info!("Delivering events to {}", sender.endpoint());

    let pool = DispatchPool::spawn(Arc::new(sender), config.workers, config.queue_capacity);
    let propagator = Propagator::new(catalog, pool, config.period_duration())?;

    propagator
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    info!("Service stopped.");
    Ok(())
}
