use anyhow::Context;
use trivia_api::config::Settings;
use trivia_api::db::{establish_connection, run_migrations};
use trivia_api::server::app::run_server;
use trivia_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = Settings::from_env()?;
    let addr = settings.addr()?;

    let pool = establish_connection(&settings.db_path)
        .await
        .with_context(|| format!("Cannot open database {}", settings.db_path))?;

    tracing::info!("Running db migrations...");
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    run_server(pool, addr).await
}
