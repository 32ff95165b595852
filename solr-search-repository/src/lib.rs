//! # Solr Search Repository
//!
//! This crate lets a model-search abstraction delegate indexing and querying
//! to Apache Solr. It includes definitions for errors, the collaborator
//! interfaces, the query builder, the `SolrEngine` adapter and a concrete
//! HTTP implementation of the Solr client.

pub mod builder;
pub mod config;
pub mod engine;
pub mod errors;
pub mod interfaces;
pub mod solr;
pub mod types;

pub use builder::Builder;
pub use config::{SolrConfig, UnloadConfig};
pub use engine::SolrEngine;
pub use errors::SolrError;
pub use interfaces::{SearchCallback, Searchable, SearchableSource, SolrClient};
pub use solr::HttpSolrClient;
pub use types::{CoreAdminAction, Page, SelectQuery, UpdateCommand, UpdateRequest};
