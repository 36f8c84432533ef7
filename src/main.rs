use anyhow::Context;
use bourse::config::Config;
use bourse::services::{AnalysisService, CheckpointStore, Pipeline, SeriesStore, SyncRunner, Synchronizer};
use bourse::sources::MseClient;
use bourse::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bourse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Bourse server on {}:{}", config.host, config.port);

    // Open durable stores
    let store = Arc::new(
        SeriesStore::open(&config.storage.series_db_path).context("failed to open series store")?,
    );
    let checkpoints = Arc::new(
        CheckpointStore::open(&config.storage.checkpoint_path)
            .context("failed to open checkpoint store")?,
    );

    // Remote source for history pages and the instrument list
    let client = Arc::new(
        MseClient::new(&config.source, config.sync.fetch_timeout)
            .context("failed to build HTTP client")?,
    );

    let analysis = Arc::new(AnalysisService::new(store.clone(), config.indicators.clone()));

    let synchronizer = Synchronizer::new(client.clone(), store.clone(), config.sync.clone());
    let pipeline = Pipeline::new(synchronizer, store.clone(), checkpoints).with_discovery(client);
    let sync = Arc::new(SyncRunner::new(pipeline, analysis.clone()));

    // Start the background sync loop
    sync.spawn_periodic(config.sync.interval, config.sync.on_startup);

    let state = AppState {
        store,
        analysis,
        sync,
    };

    let app = bourse::app(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
