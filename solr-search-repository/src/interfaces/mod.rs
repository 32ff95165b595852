//! Interface definitions for the Solr engine's collaborators.
//!
//! This module defines the abstract `SolrClient` trait, which allows for
//! dependency injection of the transport, and the traits domain types
//! implement to be indexed and re-hydrated.

mod search_callback;
mod searchable;
mod solr_client;

pub use search_callback::SearchCallback;
pub use searchable::{Searchable, SearchableSource};
pub use solr_client::SolrClient;
