//! Model search query builder.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::interfaces::{SearchCallback, Searchable};
use solr_search_shared::{Filters, SortDirection, SortOrder};

/// A search over the core of model type `T`.
///
/// # Example
///
/// ```ignore
/// let builder = Builder::<Post>::new("rust")
///     .where_eq("status", "published")
///     .where_in("author_id", [2, 3])
///     .take(20);
/// let posts = engine.get(&repository, &builder).await?;
/// ```
pub struct Builder<T> {
    /// Raw query string, used when no filter is given.
    pub query: String,
    pub filters: Filters,
    pub orders: Vec<SortOrder>,
    /// Explicit row limit.
    pub limit: Option<usize>,
    /// Core override. `None` uses `T::searchable_as()`.
    pub index: Option<String>,
    /// Custom execution hook replacing the standard select request.
    pub callback: Option<Arc<dyn SearchCallback>>,
    _model: PhantomData<fn() -> T>,
}

impl<T: Searchable> Builder<T> {
    /// Create a builder for the given query string.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: Filters::default(),
            orders: Vec::new(),
            limit: None,
            index: None,
            callback: None,
            _model: PhantomData,
        }
    }

    /// Add a `key:value` constraint.
    pub fn where_eq(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.wheres.push((key.into(), value.into()));
        self
    }

    /// Add a `key:(v1 OR v2)` constraint.
    pub fn where_in<V: Into<Value>>(
        mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.filters.where_ins.push((key.into(), values));
        self
    }

    /// Add a `-key:(v1 OR v2)` constraint.
    pub fn where_not_in<V: Into<Value>>(
        mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.filters.where_not_ins.push((key.into(), values));
        self
    }

    /// Order results by `field`.
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.orders.push(SortOrder::new(field, direction));
        self
    }

    /// Limit the number of results.
    pub fn take(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Search a different core than the model's own.
    pub fn within(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Replace the standard select request with a custom hook.
    pub fn with_callback(mut self, callback: impl SearchCallback + 'static) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// The core this builder searches.
    pub fn index_name(&self) -> String {
        self.index.clone().unwrap_or_else(T::searchable_as)
    }
}

impl<T> Clone for Builder<T> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            filters: self.filters.clone(),
            orders: self.orders.clone(),
            limit: self.limit,
            index: self.index.clone(),
            callback: self.callback.clone(),
            _model: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("query", &self.query)
            .field("filters", &self.filters)
            .field("orders", &self.orders)
            .field("limit", &self.limit)
            .field("index", &self.index)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solr_search_shared::SolrDocument;

    struct Post;

    impl Searchable for Post {
        fn searchable_as() -> String {
            "posts".to_string()
        }

        fn search_key(&self) -> String {
            String::new()
        }

        fn to_searchable_array(&self) -> SolrDocument {
            SolrDocument::new()
        }
    }

    #[test]
    fn test_builder_collects_constraints() {
        let builder = Builder::<Post>::new("hello")
            .where_eq("foo", 1)
            .where_in("bar", [2, 3])
            .where_not_in("baz", ["x"])
            .take(20);

        assert_eq!(builder.query, "hello");
        assert_eq!(builder.filters.wheres, vec![("foo".to_string(), json!(1))]);
        assert_eq!(
            builder.filters.where_ins,
            vec![("bar".to_string(), vec![json!(2), json!(3)])]
        );
        assert_eq!(
            builder.filters.where_not_ins,
            vec![("baz".to_string(), vec![json!("x")])]
        );
        assert_eq!(builder.limit, Some(20));
    }

    #[test]
    fn test_index_name() {
        let builder = Builder::<Post>::new("");
        assert_eq!(builder.index_name(), "posts");

        let builder = builder.within("posts_archive");
        assert_eq!(builder.index_name(), "posts_archive");
    }

    #[test]
    fn test_order_by() {
        let builder = Builder::<Post>::new("").order_by("created_at", SortDirection::Desc);
        assert_eq!(
            builder.orders,
            vec![SortOrder::new("created_at", SortDirection::Desc)]
        );
    }
}
