//! # Solr Search Shared
//!
//! Plain data types shared by the Solr search driver crates: indexed
//! documents, endpoint descriptors, search options with filter rendering,
//! and the parsed shapes of Solr responses.

pub mod document;
pub mod endpoint;
pub mod query;
pub mod response;

pub use document::{document_id, SolrDocument, ID_FIELD};
pub use endpoint::Endpoint;
pub use query::{escape_query_chars, Filters, SearchOptions, SortDirection, SortOrder};
pub use response::{CoreAdminResult, ResponseHeader, SelectResult, UpdateResult};
