//! Traits implemented by indexable domain types and their data source.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::builder::Builder;
use crate::errors::SolrError;
use solr_search_shared::SolrDocument;

/// A domain object that can be indexed in Solr.
pub trait Searchable: Send + Sync {
    /// Name of the core this type is indexed in.
    fn searchable_as() -> String
    where
        Self: Sized;

    /// The object's unique key, stored as the document id.
    fn search_key(&self) -> String;

    /// Flat field mapping to index. An empty mapping means "do not index".
    fn to_searchable_array(&self) -> SolrDocument;

    /// Extra fields merged into the indexed document.
    fn search_metadata(&self) -> SolrDocument {
        SolrDocument::new()
    }
}

/// Fetches domain objects by search key.
///
/// The engine calls this after a search to turn result ids back into models.
/// Implementations may return the models in any order and may return
/// extras; the engine filters and reorders them.
#[async_trait]
pub trait SearchableSource<T: Searchable>: Send + Sync {
    /// Fetch the models with the given keys, scoped by the builder's constraints.
    async fn get_by_search_keys(
        &self,
        builder: &Builder<T>,
        keys: &[String],
    ) -> Result<Vec<T>, SolrError>;

    /// Fetch the models with the given keys as a forward-only stream.
    fn lazy_get_by_search_keys<'a>(
        &'a self,
        builder: &'a Builder<T>,
        keys: &'a [String],
    ) -> BoxStream<'a, Result<T, SolrError>>;
}
