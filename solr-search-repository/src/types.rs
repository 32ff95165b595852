//! Request and response types for Solr operations.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use solr_search_shared::SolrDocument;

/// One command in a Solr JSON update request.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateCommand {
    /// Add or replace a document.
    Add(SolrDocument),
    /// Delete documents by unique key.
    DeleteById(Vec<String>),
    /// Delete every document matching a query.
    DeleteByQuery(String),
    /// Make pending changes visible to searchers.
    Commit,
}

impl UpdateCommand {
    fn key(&self) -> &'static str {
        match self {
            UpdateCommand::Add(_) => "add",
            UpdateCommand::DeleteById(_) | UpdateCommand::DeleteByQuery(_) => "delete",
            UpdateCommand::Commit => "commit",
        }
    }

    fn body(&self) -> Value {
        match self {
            UpdateCommand::Add(doc) => json!({ "doc": doc }),
            UpdateCommand::DeleteById(ids) => json!(ids),
            UpdateCommand::DeleteByQuery(query) => json!({ "query": query }),
            UpdateCommand::Commit => json!({}),
        }
    }
}

/// An ordered batch of update commands sent to one core.
///
/// # Example
///
/// ```ignore
/// let request = UpdateRequest::new()
///     .add_documents(documents)
///     .commit();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateRequest {
    pub commands: Vec<UpdateCommand>,
}

impl UpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a batch of documents.
    pub fn add_documents(mut self, documents: impl IntoIterator<Item = SolrDocument>) -> Self {
        self.commands
            .extend(documents.into_iter().map(UpdateCommand::Add));
        self
    }

    /// Delete a batch of documents by unique key.
    pub fn delete_by_ids(mut self, ids: Vec<String>) -> Self {
        self.commands.push(UpdateCommand::DeleteById(ids));
        self
    }

    /// Delete every document matching `query`.
    pub fn delete_by_query(mut self, query: impl Into<String>) -> Self {
        self.commands.push(UpdateCommand::DeleteByQuery(query.into()));
        self
    }

    /// Append a commit directive.
    pub fn commit(mut self) -> Self {
        self.commands.push(UpdateCommand::Commit);
        self
    }

    /// Documents added by this request, in order.
    pub fn documents(&self) -> impl Iterator<Item = &SolrDocument> {
        self.commands.iter().filter_map(|command| match command {
            UpdateCommand::Add(doc) => Some(doc),
            _ => None,
        })
    }

    /// Ids deleted by this request, in order.
    pub fn deleted_ids(&self) -> impl Iterator<Item = &String> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                UpdateCommand::DeleteById(ids) => Some(ids.iter()),
                _ => None,
            })
            .flatten()
    }

    /// Whether the request ends with a commit directive.
    pub fn commits(&self) -> bool {
        matches!(self.commands.last(), Some(UpdateCommand::Commit))
    }

    /// Render the request as a Solr JSON update body.
    ///
    /// Solr's JSON update format repeats keys (`add`, `delete`) once per
    /// command, which a JSON map cannot express, so the object is written
    /// by hand with each command body serialized separately.
    pub fn to_json_body(&self) -> Result<String, serde_json::Error> {
        let mut parts = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            parts.push(format!(
                "\"{}\":{}",
                command.key(),
                serde_json::to_string(&command.body())?
            ));
        }
        Ok(format!("{{{}}}", parts.join(",")))
    }
}

/// A Solr select request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    /// Query text (`q`).
    pub query: String,
    /// Offset of the first row (`start`).
    pub start: usize,
    /// Maximum number of rows (`rows`).
    pub rows: Option<usize>,
    /// Returned field list (`fl`).
    pub fields: Option<String>,
    /// Sort clause (`sort`).
    pub sort: Option<String>,
}

impl SelectQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            start: 0,
            rows: None,
            fields: None,
            sort: None,
        }
    }

    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn with_sort(mut self, sort: Option<String>) -> Self {
        self.sort = sort;
        self
    }

    /// Query-string parameters for the select handler.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", self.query.clone()), ("start", self.start.to_string())];
        if let Some(rows) = self.rows {
            params.push(("rows", rows.to_string()));
        }
        if let Some(ref fields) = self.fields {
            params.push(("fl", fields.clone()));
        }
        if let Some(ref sort) = self.sort {
            params.push(("sort", sort.clone()));
        }
        params.push(("wt", "json".to_string()));
        params
    }
}

/// A core admin action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreAdminAction {
    /// Create a new core from a config set.
    Create {
        name: String,
        config_set: Option<String>,
        /// Extra action parameters. These win over `config_set` on clashes.
        options: BTreeMap<String, String>,
    },
    /// Unload a core, optionally removing its files.
    Unload {
        core: String,
        delete_index: bool,
        delete_data_dir: bool,
        delete_instance_dir: bool,
    },
}

impl CoreAdminAction {
    /// Name of the targeted core.
    pub fn core(&self) -> &str {
        match self {
            CoreAdminAction::Create { name, .. } => name,
            CoreAdminAction::Unload { core, .. } => core,
        }
    }

    /// Query-string parameters for the core admin handler.
    pub fn to_params(&self) -> Vec<(String, String)> {
        match self {
            CoreAdminAction::Create {
                name,
                config_set,
                options,
            } => {
                let mut params: BTreeMap<String, String> = BTreeMap::new();
                if let Some(config_set) = config_set {
                    params.insert("configSet".to_string(), config_set.clone());
                }
                params.extend(options.iter().map(|(k, v)| (k.clone(), v.clone())));

                let mut out = vec![
                    ("action".to_string(), "CREATE".to_string()),
                    ("name".to_string(), name.clone()),
                ];
                out.extend(params.into_iter().filter(|(k, _)| k != "action" && k != "name"));
                out.push(("wt".to_string(), "json".to_string()));
                out
            }
            CoreAdminAction::Unload {
                core,
                delete_index,
                delete_data_dir,
                delete_instance_dir,
            } => vec![
                ("action".to_string(), "UNLOAD".to_string()),
                ("core".to_string(), core.clone()),
                ("deleteIndex".to_string(), delete_index.to_string()),
                ("deleteDataDir".to_string(), delete_data_dir.to_string()),
                ("deleteInstanceDir".to_string(), delete_instance_dir.to_string()),
                ("wt".to_string(), "json".to_string()),
            ],
        }
    }
}

/// One page of hydrated search results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Models on this page, in result order.
    pub items: Vec<T>,
    /// Total number of matches on the server.
    pub total: u64,
    pub per_page: usize,
    /// 1-based page number.
    pub current_page: usize,
}

impl<T> Page<T> {
    /// Number of the last page, at least 1.
    pub fn last_page(&self) -> usize {
        if self.per_page == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(self.per_page as u64) as usize;
        pages.max(1)
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(value: Value) -> SolrDocument {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_update_body_repeats_keys() {
        let request = UpdateRequest::new()
            .add_documents(vec![doc(json!({ "id": "1" })), doc(json!({ "id": "2" }))])
            .commit();

        assert_eq!(
            request.to_json_body().unwrap(),
            r#"{"add":{"doc":{"id":"1"}},"add":{"doc":{"id":"2"}},"commit":{}}"#
        );
        assert!(request.commits());
        assert_eq!(request.documents().count(), 2);
    }

    #[test]
    fn test_delete_body() {
        let request = UpdateRequest::new()
            .delete_by_ids(vec!["3".into(), "1".into()])
            .commit();

        assert_eq!(
            request.to_json_body().unwrap(),
            r#"{"delete":["3","1"],"commit":{}}"#
        );
        assert_eq!(request.deleted_ids().collect::<Vec<_>>(), vec!["3", "1"]);
    }

    #[test]
    fn test_delete_by_query_body() {
        let request = UpdateRequest::new().delete_by_query("*:*").commit();
        assert_eq!(
            request.to_json_body().unwrap(),
            r#"{"delete":{"query":"*:*"},"commit":{}}"#
        );
    }

    #[test]
    fn test_select_params() {
        let query = SelectQuery::new("foo:1 AND bar:2")
            .with_start(30)
            .with_rows(15)
            .with_fields("id,score");

        let params = query.to_params();

        assert!(params.contains(&("q", "foo:1 AND bar:2".to_string())));
        assert!(params.contains(&("start", "30".to_string())));
        assert!(params.contains(&("rows", "15".to_string())));
        assert!(params.contains(&("fl", "id,score".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "sort"));
    }

    #[test]
    fn test_create_params_options_override_config_set() {
        let mut options = BTreeMap::new();
        options.insert("configSet".to_string(), "custom".to_string());
        options.insert("instanceDir".to_string(), "posts_dir".to_string());

        let action = CoreAdminAction::Create {
            name: "posts".into(),
            config_set: Some("_default".into()),
            options,
        };
        let params = action.to_params();

        assert_eq!(params[0], ("action".to_string(), "CREATE".to_string()));
        assert_eq!(params[1], ("name".to_string(), "posts".to_string()));
        assert!(params.contains(&("configSet".to_string(), "custom".to_string())));
        assert!(params.contains(&("instanceDir".to_string(), "posts_dir".to_string())));
        assert!(!params.contains(&("configSet".to_string(), "_default".to_string())));
    }

    #[test]
    fn test_unload_params() {
        let action = CoreAdminAction::Unload {
            core: "posts".into(),
            delete_index: true,
            delete_data_dir: false,
            delete_instance_dir: true,
        };
        let params = action.to_params();

        assert_eq!(action.core(), "posts");
        assert!(params.contains(&("action".to_string(), "UNLOAD".to_string())));
        assert!(params.contains(&("deleteIndex".to_string(), "true".to_string())));
        assert!(params.contains(&("deleteDataDir".to_string(), "false".to_string())));
        assert!(params.contains(&("deleteInstanceDir".to_string(), "true".to_string())));
    }

    #[test]
    fn test_page_last_page() {
        let page: Page<u32> = Page {
            items: vec![],
            total: 41,
            per_page: 20,
            current_page: 1,
        };
        assert_eq!(page.last_page(), 3);
        assert!(page.has_more_pages());

        let empty: Page<u32> = Page {
            items: vec![],
            total: 0,
            per_page: 20,
            current_page: 1,
        };
        assert_eq!(empty.last_page(), 1);
        assert!(!empty.has_more_pages());
    }
}
