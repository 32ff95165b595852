//! Solr handler URL builders.

use url::Url;

use crate::errors::SolrError;
use solr_search_shared::Endpoint;

/// URL of a request handler under the endpoint's core, e.g. `/solr/posts/select`.
pub fn core_handler_url(endpoint: &Endpoint, handler: &str) -> Result<Url, SolrError> {
    let core_url = endpoint.core_url().ok_or_else(|| {
        SolrError::invalid_endpoint(format!(
            "no core set for {} (handler {})",
            endpoint.base_url(),
            handler
        ))
    })?;
    Ok(Url::parse(&format!("{}/{}", core_url, handler.trim_matches('/')))?)
}

/// URL of the core admin handler, e.g. `/solr/admin/cores`.
pub fn core_admin_url(endpoint: &Endpoint) -> Result<Url, SolrError> {
    Ok(Url::parse(&format!("{}/admin/cores", endpoint.base_url()))?)
}

/// URL for a forwarded call: under the core when one is set, else under the server.
pub fn invoke_url(endpoint: &Endpoint, method: &str) -> Result<Url, SolrError> {
    let base = endpoint.core_url().unwrap_or_else(|| endpoint.base_url());
    Ok(Url::parse(&format!("{}/{}", base, method.trim_matches('/')))?)
}
