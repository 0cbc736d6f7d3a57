use anyhow::Result;
use clap::Parser;
use dynamodb_gateway::{
    config::Config,
    server::{AppState, create_app},
    store::{dynamodb::DynamoDbStore, namespace::Namespaced},
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dynamodb_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store =
        DynamoDbStore::connect(config.endpoint_url.as_deref(), config.region.as_deref()).await;
    let store = Namespaced::new(store, config.table_prefix.clone());
    tracing::info!(
        table_prefix = %store.prefix(),
        max_pages = config.max_pages,
        batch_max_retries = config.batch_max_retries,
        "connected to store"
    );

    let state = AppState {
        store: Arc::new(store),
        max_pages: config.max_pages,
        retry: config.unprocessed_retry(),
    };
    let app = create_app(state, config.request_timeout());

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
