mod admin;
mod auth;
mod dashboard;
mod db;
mod error;
mod middleware;
mod notification;
mod routes;
mod state;
mod task;
#[cfg(test)]
mod test_support;
mod user;

use anyhow::Context;
use db::{create_pool, run_migrations};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,team_task_manager=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env()?);

    tracing::info!("Connecting to database...");
    let db = create_pool(&config.database_url)
        .await
        .context("failed to connect to the database")?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    let addr = config.bind_addr();
    let app = create_router(AppState::new(db, config));

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
