use anyhow::Context;
use clap::Parser;
use eventpipe::config::{ConsumerArgs, StorageBackend};
use eventpipe::domain::EventRepository;
use eventpipe::infrastructure::persistence::MemoryEventStore;
use eventpipe::interface::api::{build_router, init_metrics, with_metrics, AppState};
use std::sync::Arc;
use tracing::{info, warn};

#[cfg(feature = "postgres")]
use eventpipe::infrastructure::persistence::{create_pool, run_migrations, DatabaseConfig, PgEventStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    eventpipe::telemetry::init_tracing();

    let config = ConsumerArgs::parse()
        .into_config()
        .context("invalid consumer configuration")?;
    info!("Configuration loaded: {:?}", config.server);

    let event_repository: Arc<dyn EventRepository> = match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory event store; events are lost on exit");
            Arc::new(MemoryEventStore::new())
        }
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_storage(&config.storage);
            let pool = create_pool(&db_config)
                .await
                .context("failed to connect to the database")?;
            run_migrations(&pool)
                .await
                .context("failed to apply the event schema")?;

            Arc::new(PgEventStore::new(pool))
        }
        #[cfg(not(feature = "postgres"))]
        StorageBackend::Postgres => {
            anyhow::bail!("built without the `postgres` feature; use --storage memory");
        }
    };
    info!("Event store initialized ({:?})", config.storage.backend);

    let prometheus_handle = init_metrics().context("failed to install metrics recorder")?;
    let app = with_metrics(
        build_router(AppState::new(event_repository)),
        prometheus_handle,
    );

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;

    info!("Starting consumer API on {}", bind_address);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down...");
        })
        .await?;

    Ok(())
}
