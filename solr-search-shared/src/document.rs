//! Indexed document representation.

use serde_json::{Map, Value};

/// Name of the field Solr uses as the document's unique key.
pub const ID_FIELD: &str = "id";

/// A flat field name to value mapping, as sent to and returned by Solr.
///
/// This is also the shape of a searchable array produced by domain objects.
pub type SolrDocument = Map<String, Value>;

/// Extract the identifier of a document as a string.
///
/// String ids are returned as-is; numeric and boolean ids are rendered with
/// their JSON text. Returns `None` when the document has no usable id.
pub fn document_id(document: &SolrDocument) -> Option<String> {
    match document.get(ID_FIELD)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        Value::Bool(id) => Some(id.to_string()),
        _ => None,
    }
}
