//! Error types for the Solr search repository.

mod solr_error;

pub use solr_error::SolrError;
