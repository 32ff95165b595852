//! Parsed Solr responses.

use serde::Deserialize;
use serde_json::Value;

use crate::document::SolrDocument;

/// The `responseHeader` block common to all Solr responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseHeader {
    /// Solr status code, `0` on success.
    #[serde(default)]
    pub status: i64,
    /// Server-side query time in milliseconds.
    #[serde(rename = "QTime", default)]
    pub q_time: u64,
}

/// Result of a select request.
///
/// Holds the returned documents in Solr's order together with the
/// server-reported total number of matches, which can exceed the number of
/// documents returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectResult {
    pub header: ResponseHeader,
    /// Returned documents, in result order.
    pub documents: Vec<SolrDocument>,
    /// Total number of matching documents on the server.
    pub num_found: u64,
    /// Offset of the first returned document.
    pub start: u64,
    /// Highest score among matches, when scores were requested.
    pub max_score: Option<f64>,
}

#[derive(Deserialize)]
struct RawSelect {
    #[serde(rename = "responseHeader", default)]
    header: ResponseHeader,
    response: RawDocumentList,
}

#[derive(Deserialize)]
struct RawDocumentList {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(default)]
    start: u64,
    #[serde(rename = "maxScore")]
    max_score: Option<f64>,
    #[serde(default)]
    docs: Vec<SolrDocument>,
}

impl SelectResult {
    /// Create a result from documents and a total match count.
    pub fn new(documents: Vec<SolrDocument>, num_found: u64) -> Self {
        Self {
            documents,
            num_found,
            ..Default::default()
        }
    }

    /// A result with no matches.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a Solr select response body.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let raw: RawSelect = serde_json::from_value(value)?;
        Ok(Self {
            header: raw.header,
            documents: raw.response.docs,
            num_found: raw.response.num_found,
            start: raw.response.start,
            max_score: raw.response.max_score,
        })
    }

    /// Number of returned documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Result of an update request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateResult {
    #[serde(rename = "responseHeader", default)]
    pub header: ResponseHeader,
}

impl UpdateResult {
    /// Parse a Solr update response body.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Result of a core admin request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreAdminResult {
    pub header: ResponseHeader,
    /// The full response body, including action-specific fields.
    pub body: Value,
}

impl CoreAdminResult {
    /// Parse a Solr core admin response body.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let header = match value.get("responseHeader") {
            Some(header) => ResponseHeader::deserialize(header)?,
            None => ResponseHeader::default(),
        };
        Ok(Self {
            header,
            body: value,
        })
    }
}
