//! Solr error types.
//!
//! This module defines the error types that can occur while talking to Solr
//! or to the domain-object source. The engine never classifies or recovers
//! from these; they reach the caller unchanged.

use thiserror::Error;

/// Errors that can occur during Solr search operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolrError {
    /// Failed to reach the Solr server.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Solr answered with a non-success status.
    #[error("Solr returned status {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Failed to parse a response from Solr.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a request for Solr.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The endpoint cannot be turned into a valid URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The domain-object source failed to fetch models.
    #[error("Source error: {0}")]
    SourceError(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SolrError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a server error.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create an invalid endpoint error.
    pub fn invalid_endpoint(msg: impl Into<String>) -> Self {
        Self::InvalidEndpoint(msg.into())
    }

    /// Create a source error.
    pub fn source_error(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<serde_json::Error> for SolrError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<url::ParseError> for SolrError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = SolrError::server(400, "undefined field foo");
        assert_eq!(err.to_string(), "Solr returned status 400: undefined field foo");
    }

    #[test]
    fn test_from_json_error() {
        let err: SolrError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, SolrError::ParseError(_)));
    }
}
