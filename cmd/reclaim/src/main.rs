//! # Reclaim server
//!
//! Assembles the application from settings and compile-time features.

use std::sync::Arc;

use api_adapters::http::{router, AppState};
use configs::{LoggingSettings, Settings};
use domains::{ClaimRepository, ItemRepository, MessageRepository, ThreadRepository};
use services::MessageLimits;
use storage_adapters::{InMemoryStore, LogNotifier};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Stores {
    items: Arc<dyn ItemRepository>,
    claims: Arc<dyn ClaimRepository>,
    threads: Arc<dyn ThreadRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl Stores {
    fn shared<S>(store: Arc<S>) -> Self
    where
        S: ItemRepository + ClaimRepository + ThreadRepository + MessageRepository + 'static,
    {
        Self {
            items: store.clone(),
            claims: store.clone(),
            threads: store.clone(),
            messages: store,
        }
    }
}

fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[cfg(feature = "db-postgres")]
async fn open_stores(settings: &Settings) -> anyhow::Result<Stores> {
    use secrecy::ExposeSecret;
    use storage_adapters::PgStore;

    match &settings.database.url {
        Some(url) => {
            let store =
                PgStore::connect(url.expose_secret(), settings.database.max_connections).await?;
            Ok(Stores::shared(Arc::new(store)))
        }
        None => {
            warn!("database.url not set, using the in-memory store; data is lost on exit");
            Ok(Stores::shared(Arc::new(InMemoryStore::new())))
        }
    }
}

#[cfg(not(feature = "db-postgres"))]
async fn open_stores(settings: &Settings) -> anyhow::Result<Stores> {
    if settings.database.url.is_some() {
        warn!("database.url ignored: built without the db-postgres feature");
    }
    Ok(Stores::shared(Arc::new(InMemoryStore::new())))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings.logging);

    let limits = MessageLimits {
        default_page_size: settings.messages.default_page_size,
        max_page_size: settings.messages.max_page_size,
        max_text_len: settings.messages.max_text_len,
    };

    let stores = open_stores(&settings).await?;
    let state = AppState::new(
        stores.items,
        stores.claims,
        stores.threads,
        stores.messages,
        Arc::new(LogNotifier),
        limits,
    );

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "reclaim listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
