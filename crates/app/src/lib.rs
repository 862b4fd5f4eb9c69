//! Wardrobe application composition root
//!
//! Composes the closet domain router over the configured store, workflow
//! engine, and event bus providers.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use wardrobe_closet::{ClosetState, ItemStore, MemoryItemStore, PostgresItemStore};
use wardrobe_common::Config;
use wardrobe_events::{EventBusConfig, EventBusFactory};
use wardrobe_workflow::{WorkflowEngineConfig, WorkflowEngineFactory};

/// Create the main application router with all routes and middleware
pub async fn create_app(config: Config) -> Result<Router, anyhow::Error> {
    // Select the item store backend
    let store: Arc<dyn ItemStore> = match config.store_provider.as_str() {
        "memory" => {
            tracing::info!("Using in-memory item store");
            Arc::new(MemoryItemStore::new())
        }
        "postgres" => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for postgres"))?;
            let pool = PgPool::connect(database_url).await?;
            tracing::info!("Connected to Postgres item store");
            Arc::new(PostgresItemStore::new(pool))
        }
        provider => {
            return Err(anyhow::anyhow!(
                "Unknown store provider: {provider}. Supported providers: memory, postgres"
            ))
        }
    };

    let engine = WorkflowEngineFactory::create(WorkflowEngineConfig::from_env()?)?;
    let bus = EventBusFactory::create(EventBusConfig::from_env()?)?;

    let closet_state = ClosetState::new(store, Arc::from(engine), Arc::from(bus));

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Wardrobe API v0.1.0" }),
        )
        .merge(wardrobe_closet::routes().with_state(closet_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
