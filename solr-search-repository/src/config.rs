//! Configuration types for the SolrEngine.

use std::collections::HashMap;

use serde::Deserialize;

use crate::errors::SolrError;
use solr_search_shared::Endpoint;

/// Default number of rows returned by a search without an explicit limit.
pub const DEFAULT_LIMIT: usize = 10;

/// Default config set used when creating a core.
pub const DEFAULT_CONFIG_SET: &str = "_default";

/// What to remove from disk when a core is unloaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UnloadConfig {
    /// Remove the index files.
    pub delete_index: bool,
    /// Remove the data directory.
    pub delete_data_dir: bool,
    /// Remove the instance directory.
    pub delete_instance_dir: bool,
}

/// Configuration for the SolrEngine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolrConfig {
    /// Row limit applied when a search has no explicit limit.
    pub default_limit: usize,
    /// Endpoint used for cores without an entry in `endpoints`.
    pub default_endpoint: Endpoint,
    /// Per-core endpoints, keyed by core name.
    pub endpoints: HashMap<String, Endpoint>,
    /// Config set passed when creating a core.
    pub create_config_set: Option<String>,
    /// Flags passed when unloading a core.
    pub unload: UnloadConfig,
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            default_endpoint: Endpoint::default(),
            endpoints: HashMap::new(),
            create_config_set: Some(DEFAULT_CONFIG_SET.to_string()),
            unload: UnloadConfig::default(),
        }
    }
}

impl SolrConfig {
    /// Create a config pointing at the given default endpoint.
    pub fn new(default_endpoint: Endpoint) -> Self {
        Self {
            default_endpoint,
            ..Default::default()
        }
    }

    /// Create a config with a custom default limit.
    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }

    /// Register a dedicated endpoint for `core`.
    pub fn with_endpoint(mut self, core: impl Into<String>, endpoint: Endpoint) -> Self {
        self.endpoints.insert(core.into(), endpoint);
        self
    }

    /// Resolve the endpoint for a core.
    ///
    /// A configured entry wins; its core defaults to `core` when unset. Without
    /// an entry the default endpoint is targeted at `core`.
    pub fn endpoint_for(&self, core: &str) -> Endpoint {
        match self.endpoints.get(core) {
            Some(endpoint) if endpoint.core.is_some() => endpoint.clone(),
            Some(endpoint) => endpoint.clone().with_core(core),
            None => self.default_endpoint.clone().with_core(core),
        }
    }

    /// Check that every endpoint is usable.
    pub fn validate(&self) -> Result<(), SolrError> {
        std::iter::once(("default", &self.default_endpoint))
            .chain(self.endpoints.iter().map(|(k, v)| (k.as_str(), v)))
            .try_for_each(|(name, endpoint)| {
                if endpoint.host.is_empty() {
                    return Err(SolrError::config(format!("endpoint {name}: host is empty")));
                }
                if endpoint.scheme != "http" && endpoint.scheme != "https" {
                    return Err(SolrError::config(format!(
                        "endpoint {name}: unsupported scheme {}",
                        endpoint.scheme
                    )));
                }
                Ok(())
            })
    }
}
