//! Transcript backfill worker binary.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

use ytscribe_captions::InnertubeClient;
use ytscribe_db::Store;
use ytscribe_worker::{Runner, WorkerConfig};

// One sequential worker: selection order is persistence order.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sqlx=warn".into());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let run_id = Uuid::new_v4();
    info!(run_id = %run_id, "Starting ytscribe-worker");

    // Load configuration
    let config = match WorkerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        batch_limit = config.batch_limit,
        languages = ?config.languages,
        max_retries = config.max_retries,
        "Worker config loaded"
    );

    // Connect to the store and run migrations
    let store = match Store::connect(&config.database_url).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = store.run_migrations().await {
        error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    // Create the caption client
    let source = match InnertubeClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create caption client: {}", e);
            std::process::exit(1);
        }
    };

    // Run one batch
    let runner = Runner::new(source, store, config);
    match runner.run().await {
        Ok(stats) => {
            info!(run_id = %run_id, "Transcript fetch complete: {}", stats);
        }
        Err(e) => {
            error!(run_id = %run_id, "Fatal error: {}", e);
            std::process::exit(1);
        }
    }
}
