//! Custom search execution hook.

use async_trait::async_trait;

use crate::errors::SolrError;
use crate::interfaces::SolrClient;
use solr_search_shared::{Endpoint, SearchOptions, SelectResult};

/// Replaces the engine's standard select request for one search.
///
/// When a builder carries a callback the engine skips building the select
/// request and returns whatever the callback produces.
#[async_trait]
pub trait SearchCallback: Send + Sync {
    /// Execute the search.
    ///
    /// # Arguments
    ///
    /// * `client` - The underlying Solr client
    /// * `endpoint` - The endpoint resolved for the builder's core
    /// * `query` - The builder's raw query string
    /// * `options` - Filters, limit, offset and sort computed by the engine
    async fn execute(
        &self,
        client: &dyn SolrClient,
        endpoint: &Endpoint,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SelectResult, SolrError>;
}
