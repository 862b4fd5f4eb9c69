//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Item store provider: "memory" or "postgres"
    pub store_provider: String,

    /// Database connection URL, required for the postgres provider
    pub database_url: Option<String>,

    /// Workflow engine provider: "http" or "mock"
    pub workflow_provider: String,
    pub workflow_base_url: String,

    /// Event bus provider: "http" or "mock"
    pub event_bus_provider: String,
    pub event_bus_base_url: String,

    /// Runtime configuration
    pub log_level: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let store_provider =
            env::var("STORE_PROVIDER").unwrap_or_else(|_| "memory".to_string());
        let database_url = env::var("DATABASE_URL").ok();

        if store_provider == "postgres" && database_url.is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL is required for the postgres store provider"
            ));
        }

        Ok(Self {
            store_provider,
            database_url,
            workflow_provider: env::var("WORKFLOW_PROVIDER")
                .unwrap_or_else(|_| "mock".to_string()),
            workflow_base_url: env::var("WORKFLOW_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8288".to_string()),
            event_bus_provider: env::var("EVENT_BUS_PROVIDER")
                .unwrap_or_else(|_| "mock".to_string()),
            event_bus_base_url: env::var("EVENT_BUS_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8289".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        })
    }
}
