//! HTTP implementation of the Solr client.
//!
//! This module provides a concrete implementation of `SolrClient` that
//! talks to Solr's JSON HTTP API.

mod client;
mod urls;

pub use client::HttpSolrClient;
