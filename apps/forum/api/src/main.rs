use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_embeddings::OpenAIProvider;
use migration::Migrator;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
    }

    let seeded = migration::seed_topics(&db)
        .await
        .map_err(|e| eyre::eyre!("Seeding default topics failed: {}", e))?;
    info!(seeded, "Default topics in place");

    let embedder = OpenAIProvider::new(config.embedding.clone())
        .map_err(|e| eyre::eyre!("Embedding client setup failed: {}", e))?;
    info!(model = config.embedding.model.model_name(), "Embedding provider ready");

    let state = AppState {
        config,
        db,
        embedder: Arc::new(embedder),
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // /health is liveness only; /ready pings the database
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::ready_router(state.clone()));

    info!("Starting forum API (30s graceful shutdown)");

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            match state.db.close().await {
                Ok(_) => info!("PostgreSQL connection closed"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Forum API shutdown complete");
    Ok(())
}
