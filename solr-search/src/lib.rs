//! # Solr Search
//!
//! Entry point and configuration for the Solr search driver.
//!
//! This crate loads the driver configuration from the environment, sets up
//! tracing, and wires a ready-to-use `SolrEngine` backed by the HTTP client.

pub mod config;
pub mod telemetry;

pub use config::{Dependencies, EnvSettings};
pub use solr_search_repository::{Builder, Searchable, SearchableSource, SolrEngine};

use thiserror::Error;

/// Errors that can occur while setting up the driver.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Solr error.
    #[error("Solr error: {0}")]
    SolrError(#[from] solr_search_repository::SolrError),

    /// Tracing subscriber could not be installed.
    #[error("Telemetry error: {0}")]
    TelemetryError(String),
}

impl SetupError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
