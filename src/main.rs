//! Webhook ingest service entry point.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use webhook_ingest::adapters::{app_router, AppState, DryRunTransactionStore, PostgresTransactionStore};
use webhook_ingest::application::IngestWebhookHandler;
use webhook_ingest::config::AppConfig;
use webhook_ingest::domain::webhook::GatewayWebhookVerifier;
use webhook_ingest::ports::TransactionStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        gateway_sandbox = config.gateway.is_sandbox(),
        dry_run = config.server.dry_run,
        "starting webhook ingest service"
    );

    let store: Arc<dyn TransactionStore> = if config.server.dry_run {
        Arc::new(DryRunTransactionStore::new())
    } else {
        let pool = PgPoolOptions::new()
            .min_connections(config.database.min_connections)
            .max_connections(config.database.max_connections)
            .acquire_timeout(config.database.acquire_timeout())
            .idle_timeout(config.database.idle_timeout())
            .connect(&config.database.url)
            .await?;

        if config.database.run_migrations {
            sqlx::migrate!().run(&pool).await?;
            tracing::info!("database migrations applied");
        }

        Arc::new(PostgresTransactionStore::new(pool))
    };

    let verifier = GatewayWebhookVerifier::new(config.gateway.app_secret.clone());
    let ingest = Arc::new(IngestWebhookHandler::new(verifier, store));
    let app = app_router().with_state(AppState::new(ingest));

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
