//! Driver configuration read from environment variables.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;

use solr_search_repository::SolrConfig;
use solr_search_shared::Endpoint;

use crate::SetupError;

/// Environment variable names.
pub const SOLR_SCHEME: &str = "SOLR_SCHEME";
pub const SOLR_HOST: &str = "SOLR_HOST";
pub const SOLR_PORT: &str = "SOLR_PORT";
pub const SOLR_PATH: &str = "SOLR_PATH";
pub const SOLR_USERNAME: &str = "SOLR_USERNAME";
pub const SOLR_PASSWORD: &str = "SOLR_PASSWORD";
pub const SOLR_TIMEOUT_SECS: &str = "SOLR_TIMEOUT_SECS";
pub const SOLR_LIMIT: &str = "SOLR_LIMIT";
pub const SOLR_CREATE_CONFIG_SET: &str = "SOLR_CREATE_CONFIG_SET";
pub const SOLR_UNLOAD_DELETE_INDEX: &str = "SOLR_UNLOAD_DELETE_INDEX";
pub const SOLR_UNLOAD_DELETE_DATA_DIR: &str = "SOLR_UNLOAD_DELETE_DATA_DIR";
pub const SOLR_UNLOAD_DELETE_INSTANCE_DIR: &str = "SOLR_UNLOAD_DELETE_INSTANCE_DIR";
pub const SOLR_ENDPOINTS: &str = "SOLR_ENDPOINTS";
pub const SOLR_VERIFY_CORE: &str = "SOLR_VERIFY_CORE";

/// Reads `SolrConfig` from a key lookup, normally the process environment.
///
/// Unset variables keep their defaults. Set but malformed variables are
/// reported with the variable name.
pub struct EnvSettings<F> {
    lookup: F,
}

impl EnvSettings<fn(&str) -> Option<String>> {
    /// Settings backed by the process environment.
    pub fn from_env() -> Self {
        Self {
            lookup: |key| env::var(key).ok(),
        }
    }
}

impl<F> EnvSettings<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Settings backed by an arbitrary lookup.
    pub fn from_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>, SetupError>
    where
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|e| SetupError::config(format!("{key}: {e}")))
            })
            .transpose()
    }

    fn flag(&self, key: &str) -> Result<bool, SetupError> {
        match self.get(key) {
            None => Ok(false),
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(SetupError::config(format!(
                    "{key}: expected a boolean, got {other}"
                ))),
            },
        }
    }

    /// Core to ping at startup, if any.
    pub fn verify_core(&self) -> Option<String> {
        self.get(SOLR_VERIFY_CORE).map(|core| core.trim().to_string())
    }

    /// Build the driver configuration.
    pub fn solr_config(&self) -> Result<SolrConfig, SetupError> {
        let mut endpoint = Endpoint::default();
        if let Some(scheme) = self.get(SOLR_SCHEME) {
            endpoint.scheme = scheme;
        }
        if let Some(host) = self.get(SOLR_HOST) {
            endpoint.host = host;
        }
        if let Some(port) = self.parse::<u16>(SOLR_PORT)? {
            endpoint.port = port;
        }
        if let Some(path) = self.get(SOLR_PATH) {
            endpoint.path = path;
        }
        endpoint.username = self.get(SOLR_USERNAME);
        endpoint.password = self.get(SOLR_PASSWORD);
        endpoint.timeout_secs = self.parse::<u64>(SOLR_TIMEOUT_SECS)?;

        let mut config = SolrConfig::new(endpoint);
        if let Some(limit) = self.parse::<usize>(SOLR_LIMIT)? {
            config.default_limit = limit;
        }
        if let Some(config_set) = self.get(SOLR_CREATE_CONFIG_SET) {
            config.create_config_set = Some(config_set);
        }
        config.unload.delete_index = self.flag(SOLR_UNLOAD_DELETE_INDEX)?;
        config.unload.delete_data_dir = self.flag(SOLR_UNLOAD_DELETE_DATA_DIR)?;
        config.unload.delete_instance_dir = self.flag(SOLR_UNLOAD_DELETE_INSTANCE_DIR)?;

        if let Some(raw) = self.get(SOLR_ENDPOINTS) {
            let endpoints: HashMap<String, Endpoint> = serde_json::from_str(&raw)
                .map_err(|e| SetupError::config(format!("{SOLR_ENDPOINTS}: {e}")))?;
            config.endpoints = endpoints;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solr_search_repository::config::{DEFAULT_CONFIG_SET, DEFAULT_LIMIT};

    fn settings(vars: &[(&str, &str)]) -> EnvSettings<impl Fn(&str) -> Option<String>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvSettings::from_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = settings(&[]).solr_config().unwrap();

        assert_eq!(config.default_endpoint, Endpoint::default());
        assert_eq!(config.default_limit, DEFAULT_LIMIT);
        assert_eq!(config.create_config_set.as_deref(), Some(DEFAULT_CONFIG_SET));
        assert!(!config.unload.delete_index);
        assert!(config.endpoints.is_empty());
    }

    #[test]
    fn test_full_configuration() {
        let config = settings(&[
            (SOLR_SCHEME, "https"),
            (SOLR_HOST, "solr.internal"),
            (SOLR_PORT, "443"),
            (SOLR_PATH, "/search"),
            (SOLR_USERNAME, "solr"),
            (SOLR_PASSWORD, "secret"),
            (SOLR_TIMEOUT_SECS, "30"),
            (SOLR_LIMIT, "50"),
            (SOLR_CREATE_CONFIG_SET, "scout"),
            (SOLR_UNLOAD_DELETE_INDEX, "true"),
            (SOLR_UNLOAD_DELETE_DATA_DIR, "1"),
            (SOLR_UNLOAD_DELETE_INSTANCE_DIR, "no"),
            (SOLR_ENDPOINTS, r#"{"users": {"host": "users.internal", "port": 8984}}"#),
        ])
        .solr_config()
        .unwrap();

        assert_eq!(config.default_endpoint.base_url(), "https://solr.internal:443/search");
        assert_eq!(config.default_endpoint.username.as_deref(), Some("solr"));
        assert_eq!(config.default_endpoint.timeout_secs, Some(30));
        assert_eq!(config.default_limit, 50);
        assert_eq!(config.create_config_set.as_deref(), Some("scout"));
        assert!(config.unload.delete_index);
        assert!(config.unload.delete_data_dir);
        assert!(!config.unload.delete_instance_dir);

        let users = config.endpoint_for("users");
        assert_eq!(users.host, "users.internal");
        assert_eq!(users.port, 8984);
        assert_eq!(users.core.as_deref(), Some("users"));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = settings(&[(SOLR_HOST, "  "), (SOLR_USERNAME, "")])
            .solr_config()
            .unwrap();

        assert_eq!(config.default_endpoint.host, "127.0.0.1");
        assert!(config.default_endpoint.username.is_none());
    }

    #[test]
    fn test_verify_core() {
        assert_eq!(
            settings(&[(SOLR_VERIFY_CORE, " posts ")]).verify_core().as_deref(),
            Some("posts")
        );
        assert!(settings(&[(SOLR_VERIFY_CORE, "")]).verify_core().is_none());
        assert!(settings(&[(SOLR_VERIFY_CORE, "   ")]).verify_core().is_none());
        assert!(settings(&[]).verify_core().is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = settings(&[(SOLR_PORT, "eighty")]).solr_config().unwrap_err();
        assert!(matches!(err, SetupError::ConfigError(ref msg) if msg.starts_with(SOLR_PORT)));
    }

    #[test]
    fn test_invalid_flag() {
        let err = settings(&[(SOLR_UNLOAD_DELETE_INDEX, "maybe")])
            .solr_config()
            .unwrap_err();
        assert!(matches!(err, SetupError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_endpoints_json() {
        let err = settings(&[(SOLR_ENDPOINTS, "[1, 2]")]).solr_config().unwrap_err();
        assert!(matches!(err, SetupError::ConfigError(ref msg) if msg.starts_with(SOLR_ENDPOINTS)));
    }

    #[test]
    fn test_invalid_scheme_fails_validation() {
        let err = settings(&[(SOLR_SCHEME, "ftp")]).solr_config().unwrap_err();
        assert!(matches!(err, SetupError::SolrError(_)));
    }
}
