//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub reconciliation: ReconciliationConfig,
    pub features: FeaturesConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Object storage configuration (screenshots and thumbnails)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub base_url: String,
    pub api_key: String,
    pub screenshot_bucket: String,
    pub thumbnail_bucket: String,
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

/// Reconciliation job configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReconciliationConfig {
    pub enabled: bool,
    pub interval_seconds: u64,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub notifications: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("THOLVI"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::TholviError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/tholvitrader".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            storage: StorageConfig {
                base_url: "http://localhost:54321/storage/v1".to_string(),
                api_key: String::new(),
                screenshot_bucket: "payment-screenshots".to_string(),
                thumbnail_bucket: "thumbnails".to_string(),
                timeout_seconds: 15,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
            reconciliation: ReconciliationConfig {
                enabled: true,
                interval_seconds: 900,
            },
            features: FeaturesConfig {
                notifications: true,
            },
        }
    }
}
