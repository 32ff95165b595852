//! Solr client trait definition.
//!
//! This module defines the capability set the engine consumes from the
//! underlying Solr client, allowing the HTTP transport to be swapped for a
//! mock in tests.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SolrError;
use crate::types::{CoreAdminAction, SelectQuery, UpdateRequest};
use solr_search_shared::{CoreAdminResult, Endpoint, SelectResult, UpdateResult};

/// Abstract interface for Solr operations.
///
/// Every call receives the endpoint to execute against; the client keeps no
/// per-core state.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait SolrClient: Send + Sync {
    /// Submit an update request to the endpoint's core.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The resolved endpoint, with its core set
    /// * `request` - Ordered update commands (adds, deletes, commit)
    ///
    /// # Returns
    ///
    /// * `Ok(UpdateResult)` - The parsed response header
    /// * `Err(SolrError)` - If the request fails
    async fn update(
        &self,
        endpoint: &Endpoint,
        request: &UpdateRequest,
    ) -> Result<UpdateResult, SolrError>;

    /// Submit a select request to the endpoint's core.
    ///
    /// # Returns
    ///
    /// * `Ok(SelectResult)` - Documents in result order with the total match count
    /// * `Err(SolrError)` - If the request fails
    async fn select(
        &self,
        endpoint: &Endpoint,
        query: &SelectQuery,
    ) -> Result<SelectResult, SolrError>;

    /// Submit a core admin action to the endpoint's server.
    async fn core_admin(
        &self,
        endpoint: &Endpoint,
        action: &CoreAdminAction,
    ) -> Result<CoreAdminResult, SolrError>;

    /// Check if the endpoint's core is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the core answered the ping with status `OK`
    /// * `Ok(false)` - If the core answered with another status
    /// * `Err(SolrError)` - If the ping fails to execute
    async fn ping(&self, endpoint: &Endpoint) -> Result<bool, SolrError>;

    /// Invoke an arbitrary named capability of the client.
    ///
    /// This is an intentional escape hatch: operations the engine does not
    /// model are forwarded here verbatim and their result returned as-is.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let suggestions = client
    ///     .invoke(&endpoint, "suggest", json!({ "suggest.q": "rus" }))
    ///     .await?;
    /// ```
    async fn invoke(&self, endpoint: &Endpoint, method: &str, args: Value)
        -> Result<Value, SolrError>;
}
