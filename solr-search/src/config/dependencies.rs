//! Dependency initialization and wiring for the Solr search driver.

use tracing::info;

use crate::config::EnvSettings;
use crate::SetupError;
use solr_search_repository::{HttpSolrClient, SolrConfig, SolrEngine};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The engine ready to index and search.
    pub engine: SolrEngine<HttpSolrClient>,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// # Environment Variables
    ///
    /// - `SOLR_SCHEME`, `SOLR_HOST`, `SOLR_PORT`, `SOLR_PATH`: default endpoint
    ///   (default: http://127.0.0.1:8983/solr)
    /// - `SOLR_USERNAME`, `SOLR_PASSWORD`: basic auth credentials
    /// - `SOLR_TIMEOUT_SECS`: per-request timeout
    /// - `SOLR_LIMIT`: rows returned without an explicit limit (default: 10)
    /// - `SOLR_CREATE_CONFIG_SET`: config set for new cores (default: _default)
    /// - `SOLR_UNLOAD_DELETE_*`: cleanup flags for unloading cores
    /// - `SOLR_ENDPOINTS`: JSON object of per-core endpoints
    /// - `SOLR_VERIFY_CORE`: core pinged before returning
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(SetupError)` - If configuration is invalid or Solr is unreachable
    pub async fn new() -> Result<Self, SetupError> {
        dotenv::dotenv().ok();

        let settings = EnvSettings::from_env();
        let dependencies = Self::with_config(settings.solr_config()?)?;

        if let Some(core) = settings.verify_core() {
            dependencies.verify(&core).await?;
        }

        Ok(dependencies)
    }

    /// Wire the engine from an already loaded configuration.
    pub fn with_config(config: SolrConfig) -> Result<Self, SetupError> {
        config.validate()?;

        info!(
            solr_url = %config.default_endpoint.base_url(),
            default_limit = config.default_limit,
            endpoints = config.endpoints.len(),
            "Initializing dependencies"
        );

        let client = HttpSolrClient::new()
            .map_err(|e| SetupError::config(format!("Failed to create Solr client: {}", e)))?;

        Ok(Self {
            engine: SolrEngine::with_config(client, config),
        })
    }

    /// Ping `core` and fail unless Solr reports it healthy.
    pub async fn verify(&self, core: &str) -> Result<(), SetupError> {
        let healthy = self
            .engine
            .ping(core)
            .await
            .map_err(|e| SetupError::config(format!("Solr ping failed for {}: {}", core, e)))?;

        if !healthy {
            return Err(SetupError::config(format!("Solr core {} is unhealthy", core)));
        }

        info!(core = %core, "Solr connection verified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solr_search_shared::Endpoint;

    #[test]
    fn test_with_config_wires_engine() {
        let config = SolrConfig::new(Endpoint::new("solr.local", 8080)).with_default_limit(25);

        let dependencies = Dependencies::with_config(config).unwrap();

        assert_eq!(dependencies.engine.config().default_limit, 25);
        assert_eq!(
            dependencies.engine.config().endpoint_for("posts").core_url().as_deref(),
            Some("http://solr.local:8080/solr/posts")
        );
    }

    #[test]
    fn test_with_config_rejects_invalid_endpoint() {
        let mut endpoint = Endpoint::default();
        endpoint.host = String::new();

        let result = Dependencies::with_config(SolrConfig::new(endpoint));

        assert!(matches!(result, Err(SetupError::SolrError(_))));
    }

    #[tokio::test]
    async fn test_verify_unreachable_solr() {
        // Port 9 (discard) is not expected to host Solr.
        let mut endpoint = Endpoint::new("127.0.0.1", 9);
        endpoint.timeout_secs = Some(2);
        let config = SolrConfig::new(endpoint);
        let dependencies = Dependencies::with_config(config).unwrap();

        let result = dependencies.verify("posts").await;

        assert!(matches!(result, Err(SetupError::ConfigError(_))));
    }
}
