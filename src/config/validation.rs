//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, TholviError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_storage_config(&settings.storage)?;
    validate_logging_config(&settings.logging)?;
    validate_reconciliation_config(&settings.reconciliation)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(TholviError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(TholviError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(TholviError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate object storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(TholviError::Config(
            "Storage base URL is required".to_string(),
        ));
    }

    url::Url::parse(&config.base_url)
        .map_err(|e| TholviError::Config(format!("Invalid storage base URL: {e}")))?;

    if config.api_key.is_empty() {
        return Err(TholviError::Config(
            "Storage API key is required".to_string(),
        ));
    }

    if config.screenshot_bucket.is_empty() || config.thumbnail_bucket.is_empty() {
        return Err(TholviError::Config(
            "Storage bucket names are required".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(TholviError::Config(
            "Storage timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(TholviError::Config("Log level is required".to_string()));
    }

    if config.file_path.is_empty() {
        return Err(TholviError::Config("Log file path is required".to_string()));
    }

    Ok(())
}

/// Validate reconciliation configuration
fn validate_reconciliation_config(config: &super::ReconciliationConfig) -> Result<()> {
    if config.enabled && config.interval_seconds == 0 {
        return Err(TholviError::Config(
            "Reconciliation interval must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
