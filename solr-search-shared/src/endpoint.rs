//! Connection parameters for reaching a Solr core.

use serde::{Deserialize, Serialize};

/// Default Solr scheme.
pub const DEFAULT_SCHEME: &str = "http";

/// Default Solr host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default Solr port.
pub const DEFAULT_PORT: u16 = 8983;

/// Default Solr context path.
pub const DEFAULT_PATH: &str = "/solr";

/// Connection parameters for a Solr server, optionally targeted at a core.
///
/// Every field has a default, so a partial descriptor such as
/// `{"host": "search.internal"}` deserializes into a complete endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    /// URL scheme, `http` or `https`.
    pub scheme: String,
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Context path under which Solr is mounted.
    pub path: String,
    /// Target core. `None` addresses the server itself.
    pub core: Option<String>,
    /// Basic-auth user name.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path: DEFAULT_PATH.to_string(),
            core: None,
            username: None,
            password: None,
            timeout_secs: None,
        }
    }
}

impl Endpoint {
    /// Create an endpoint for the given host and port with default path.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Return a copy of this endpoint targeted at `core`.
    pub fn with_core(mut self, core: impl Into<String>) -> Self {
        self.core = Some(core.into());
        self
    }

    /// Set basic-auth credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Server base URL, e.g. `http://127.0.0.1:8983/solr`.
    pub fn base_url(&self) -> String {
        let path = self.path.trim_matches('/');
        if path.is_empty() {
            format!("{}://{}:{}", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}/{}", self.scheme, self.host, self.port, path)
        }
    }

    /// Core URL, e.g. `http://127.0.0.1:8983/solr/posts`, if a core is set.
    pub fn core_url(&self) -> Option<String> {
        self.core
            .as_deref()
            .map(|core| format!("{}/{}", self.base_url(), core.trim_matches('/')))
    }
}
