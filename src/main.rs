use tracing_subscriber::EnvFilter;

use patient_registry::api::start_api_server;
use patient_registry::config;
use patient_registry::db::SqlitePool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real env vars win
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!(
        "{} starting v{}",
        config::APP_NAME,
        config::APP_VERSION
    );

    let db_path = config::database_path();
    let pool = SqlitePool::open(&db_path)
        .map_err(|e| anyhow::anyhow!("Cannot open database at {}: {e}", db_path.display()))?;

    let mut server = start_api_server(pool, config::bind_addr()).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received, shutting down");
    server.shutdown();

    Ok(())
}
