//! Solr engine implementation.
//!
//! This module provides the adapter between the model-search abstraction and
//! Solr. It turns models into update requests, builders into select requests,
//! and select results back into models in Solr's result order.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::future;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use futures::TryFutureExt;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::builder::Builder;
use crate::config::SolrConfig;
use crate::errors::SolrError;
use crate::interfaces::{Searchable, SearchableSource, SolrClient};
use crate::types::{CoreAdminAction, Page, SelectQuery, UpdateRequest};
use solr_search_shared::{
    document_id, CoreAdminResult, SearchOptions, SelectResult, SolrDocument, UpdateResult,
    ID_FIELD,
};

/// Field list requested from Solr. Models are re-hydrated from their ids.
const RESULT_FIELDS: &str = "id,score";

/// Query matching every document.
const MATCH_ALL: &str = "*:*";

/// The search engine adapter backed by Solr.
///
/// The engine holds read-only configuration and a shared client. Each call
/// resolves its endpoint from the configuration and is otherwise stateless.
/// Client errors are returned unchanged.
pub struct SolrEngine<C: SolrClient> {
    client: Arc<C>,
    config: SolrConfig,
}

impl<C: SolrClient> SolrEngine<C> {
    /// Create a new SolrEngine with default configuration.
    pub fn new(client: C) -> Self {
        Self::with_config(client, SolrConfig::default())
    }

    /// Create a new SolrEngine with custom configuration.
    pub fn with_config(client: C, config: SolrConfig) -> Self {
        Self {
            client: Arc::new(client),
            config,
        }
    }

    /// Create a new SolrEngine sharing an existing client.
    pub fn from_shared(client: Arc<C>, config: SolrConfig) -> Self {
        Self { client, config }
    }

    /// The underlying Solr client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The engine configuration.
    pub fn config(&self) -> &SolrConfig {
        &self.config
    }

    /// Index a batch of models in their core.
    ///
    /// Models with an empty searchable array are skipped. The remaining
    /// documents, with metadata merged in, are sent as one batch followed by
    /// a commit.
    #[instrument(skip(self, items), fields(core = %T::searchable_as(), count = items.len()))]
    pub async fn update<T: Searchable>(&self, items: &[T]) -> Result<UpdateResult, SolrError> {
        let documents = build_documents(items);
        debug!(
            documents = documents.len(),
            skipped = items.len() - documents.len(),
            "Submitting update batch"
        );

        let endpoint = self.config.endpoint_for(&T::searchable_as());
        let request = UpdateRequest::new().add_documents(documents).commit();

        self.client.update(&endpoint, &request).await
    }

    /// Remove a batch of models from their core by search key.
    #[instrument(skip(self, items), fields(core = %T::searchable_as(), count = items.len()))]
    pub async fn delete<T: Searchable>(&self, items: &[T]) -> Result<(), SolrError> {
        if items.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = items.iter().map(|item| item.search_key()).collect();
        let endpoint = self.config.endpoint_for(&T::searchable_as());
        let request = UpdateRequest::new().delete_by_ids(ids).commit();

        self.client.update(&endpoint, &request).await?;
        Ok(())
    }

    /// Run a search starting at the first result.
    pub async fn search<T: Searchable>(
        &self,
        builder: &Builder<T>,
    ) -> Result<SelectResult, SolrError> {
        let options = self.search_options(builder, builder.limit, 0);
        self.perform_search(builder, options).await
    }

    /// Run a search for one page of results.
    ///
    /// Pages are 1-based; page `0` is treated as page `1`.
    pub async fn paginate<T: Searchable>(
        &self,
        builder: &Builder<T>,
        per_page: usize,
        page: usize,
    ) -> Result<SelectResult, SolrError> {
        // Saturates; Solr answers an out-of-range start with an empty page.
        let offset = (page.max(1) - 1).saturating_mul(per_page);
        let options = self.search_options(builder, Some(per_page), offset);
        self.perform_search(builder, options).await
    }

    fn search_options<T: Searchable>(
        &self,
        builder: &Builder<T>,
        limit: Option<usize>,
        offset: usize,
    ) -> SearchOptions {
        SearchOptions {
            filters: builder.filters.to_expression(),
            limit: Some(limit.unwrap_or(self.config.default_limit)),
            offset,
            sort: builder.orders.clone(),
        }
    }

    /// Execute a search with precomputed options.
    ///
    /// A builder callback, when present, replaces the select request and its
    /// result is returned as-is.
    #[instrument(skip(self, builder, options), fields(core = %builder.index_name()))]
    pub async fn perform_search<T: Searchable>(
        &self,
        builder: &Builder<T>,
        options: SearchOptions,
    ) -> Result<SelectResult, SolrError> {
        let endpoint = self.config.endpoint_for(&builder.index_name());

        if let Some(callback) = &builder.callback {
            debug!("Executing custom search callback");
            return callback
                .execute(&*self.client, &endpoint, &builder.query, &options)
                .await;
        }

        let query_text = match options.filters {
            Some(ref filters) => filters.clone(),
            None if builder.query.trim().is_empty() => MATCH_ALL.to_string(),
            None => builder.query.clone(),
        };

        let select = SelectQuery::new(query_text)
            .with_start(options.offset)
            .with_rows(options.limit.unwrap_or(self.config.default_limit))
            .with_fields(RESULT_FIELDS)
            .with_sort(options.sort_param());

        let results = self.client.select(&endpoint, &select).await?;
        debug!(
            num_found = results.num_found,
            returned = results.len(),
            "Search completed"
        );
        Ok(results)
    }

    /// Ids of the result documents, in result order.
    pub fn map_ids(&self, results: &SelectResult) -> Vec<String> {
        results.documents.iter().filter_map(document_id).collect()
    }

    /// Turn search results into models, in Solr's result order.
    ///
    /// Models returned by the source whose key is not among the result ids
    /// are dropped. The source is not called when nothing matched.
    pub async fn map<T, S>(
        &self,
        source: &S,
        builder: &Builder<T>,
        results: &SelectResult,
    ) -> Result<Vec<T>, SolrError>
    where
        T: Searchable,
        S: SearchableSource<T> + ?Sized,
    {
        if results.num_found == 0 {
            return Ok(Vec::new());
        }

        let ids = self.map_ids(results);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let positions = result_positions(&ids);
        let models = source.get_by_search_keys(builder, &ids).await?;

        Ok(order_by_positions(models, &positions))
    }

    /// Streaming variant of [`SolrEngine::map`].
    ///
    /// The source's stream is filtered as it is consumed; reordering buffers
    /// the filtered models once before they are yielded.
    pub fn lazy_map<'a, T, S>(
        &'a self,
        source: &'a S,
        builder: &'a Builder<T>,
        results: &SelectResult,
    ) -> BoxStream<'a, Result<T, SolrError>>
    where
        T: Searchable + 'a,
        S: SearchableSource<T> + ?Sized,
    {
        if results.num_found == 0 {
            return stream::empty().boxed();
        }

        let ids = self.map_ids(results);
        if ids.is_empty() {
            return stream::empty().boxed();
        }

        async move {
            let positions = result_positions(&ids);
            let models: Vec<T> = source
                .lazy_get_by_search_keys(builder, &ids)
                .try_filter(|model| future::ready(positions.contains_key(&model.search_key())))
                .try_collect()
                .await?;

            let ordered = order_by_positions(models, &positions);
            Ok::<_, SolrError>(stream::iter(ordered.into_iter().map(Ok)))
        }
        .try_flatten_stream()
        .boxed()
    }

    /// Total number of matches reported by Solr.
    pub fn get_total_count(&self, results: &SelectResult) -> u64 {
        results.num_found
    }

    /// Search and return the matching models.
    pub async fn get<T, S>(&self, source: &S, builder: &Builder<T>) -> Result<Vec<T>, SolrError>
    where
        T: Searchable,
        S: SearchableSource<T> + ?Sized,
    {
        let results = self.search(builder).await?;
        self.map(source, builder, &results).await
    }

    /// Search and stream the matching models.
    pub fn cursor<'a, T, S>(
        &'a self,
        source: &'a S,
        builder: &'a Builder<T>,
    ) -> BoxStream<'a, Result<T, SolrError>>
    where
        T: Searchable + 'a,
        S: SearchableSource<T> + ?Sized,
    {
        async move {
            let results = self.search(builder).await?;
            Ok::<_, SolrError>(self.lazy_map(source, builder, &results))
        }
        .try_flatten_stream()
        .boxed()
    }

    /// Search and return only the ids of the matching documents.
    pub async fn keys<T: Searchable>(&self, builder: &Builder<T>) -> Result<Vec<String>, SolrError> {
        let results = self.search(builder).await?;
        Ok(self.map_ids(&results))
    }

    /// Search one page and return its models with paging information.
    pub async fn paginate_models<T, S>(
        &self,
        source: &S,
        builder: &Builder<T>,
        per_page: usize,
        page: usize,
    ) -> Result<Page<T>, SolrError>
    where
        T: Searchable,
        S: SearchableSource<T> + ?Sized,
    {
        let results = self.paginate(builder, per_page, page).await?;
        let items = self.map(source, builder, &results).await?;

        Ok(Page {
            items,
            total: self.get_total_count(&results),
            per_page,
            current_page: page.max(1),
        })
    }

    /// Remove every document from the core of `T`.
    #[instrument(skip(self), fields(core = %T::searchable_as()))]
    pub async fn flush<T: Searchable>(&self) -> Result<(), SolrError> {
        let endpoint = self.config.endpoint_for(&T::searchable_as());
        let request = UpdateRequest::new().delete_by_query(MATCH_ALL).commit();

        self.client.update(&endpoint, &request).await?;
        info!("Flushed index");
        Ok(())
    }

    /// Create a core from the configured config set.
    ///
    /// `options` are passed as extra action parameters and win over the
    /// configured config set.
    #[instrument(skip(self, options))]
    pub async fn create_index(
        &self,
        name: &str,
        options: BTreeMap<String, String>,
    ) -> Result<CoreAdminResult, SolrError> {
        let endpoint = self.config.endpoint_for(name);
        let action = CoreAdminAction::Create {
            name: name.to_string(),
            config_set: self.config.create_config_set.clone(),
            options,
        };

        let result = self.client.core_admin(&endpoint, &action).await?;
        info!(core = %name, "Created index");
        Ok(result)
    }

    /// Unload a core, removing files according to the configured flags.
    #[instrument(skip(self))]
    pub async fn delete_index(&self, name: &str) -> Result<CoreAdminResult, SolrError> {
        let endpoint = self.config.endpoint_for(name);
        let unload = self.config.unload;
        let action = CoreAdminAction::Unload {
            core: name.to_string(),
            delete_index: unload.delete_index,
            delete_data_dir: unload.delete_data_dir,
            delete_instance_dir: unload.delete_instance_dir,
        };

        let result = self.client.core_admin(&endpoint, &action).await?;
        info!(core = %name, "Deleted index");
        Ok(result)
    }

    /// Check that a core is reachable.
    pub async fn ping(&self, core: &str) -> Result<bool, SolrError> {
        self.client.ping(&self.config.endpoint_for(core)).await
    }

    /// Forward an operation the engine does not model to the client.
    ///
    /// The call goes to the default endpoint; the result is returned as-is.
    pub async fn forward(&self, method: &str, args: Value) -> Result<Value, SolrError> {
        debug!(method = %method, "Forwarding call to Solr client");
        self.client
            .invoke(&self.config.default_endpoint, method, args)
            .await
    }

    /// Forward an operation to the endpoint of a specific core.
    pub async fn forward_to(
        &self,
        core: &str,
        method: &str,
        args: Value,
    ) -> Result<Value, SolrError> {
        debug!(core = %core, method = %method, "Forwarding call to Solr client");
        self.client
            .invoke(&self.config.endpoint_for(core), method, args)
            .await
    }
}

/// Build the indexed documents for a batch, skipping empty searchable arrays.
fn build_documents<T: Searchable>(items: &[T]) -> Vec<SolrDocument> {
    items
        .iter()
        .filter_map(|item| {
            let mut document = item.to_searchable_array();
            if document.is_empty() {
                return None;
            }
            document.extend(item.search_metadata());
            document
                .entry(ID_FIELD)
                .or_insert_with(|| Value::String(item.search_key()));
            Some(document)
        })
        .collect()
}

/// Map each id to its first position in the result order.
fn result_positions(ids: &[String]) -> HashMap<String, usize> {
    let mut positions = HashMap::with_capacity(ids.len());
    for (position, id) in ids.iter().enumerate() {
        positions.entry(id.clone()).or_insert(position);
    }
    positions
}

/// Keep models whose key has a position and sort them by it.
fn order_by_positions<T: Searchable>(models: Vec<T>, positions: &HashMap<String, usize>) -> Vec<T> {
    let mut ranked: Vec<(usize, T)> = models
        .into_iter()
        .filter_map(|model| {
            positions
                .get(&model.search_key())
                .map(|&position| (position, model))
        })
        .collect();
    ranked.sort_by_key(|(position, _)| *position);
    ranked.into_iter().map(|(_, model)| model).collect()
}
