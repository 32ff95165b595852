//! Search options and filter expression rendering.
//!
//! Filters are rendered into Solr's standard query syntax:
//! - equality: `key:value`
//! - membership: `key:(v1 OR v2)`
//! - exclusion: `-key:(v1 OR v2)`
//!
//! Clauses are joined with ` AND `, equality clauses first, then membership,
//! then exclusion, each group in insertion order.

use serde_json::Value;

/// Clause that matches no document, used for an empty membership list.
const MATCH_NOTHING: &str = "-*:*";

/// Sort direction for a result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A single `field direction` sort clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Equality, membership and exclusion constraints of a search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    /// `key:value` constraints.
    pub wheres: Vec<(String, Value)>,
    /// `key:(v1 OR v2)` constraints.
    pub where_ins: Vec<(String, Vec<Value>)>,
    /// `-key:(v1 OR v2)` constraints.
    pub where_not_ins: Vec<(String, Vec<Value>)>,
}

impl Filters {
    /// Whether no constraint has been added.
    pub fn is_empty(&self) -> bool {
        self.wheres.is_empty() && self.where_ins.is_empty() && self.where_not_ins.is_empty()
    }

    /// Render the constraints into a Solr query expression.
    ///
    /// Returns `None` when there are no constraints.
    pub fn to_expression(&self) -> Option<String> {
        let mut clauses: Vec<String> = Vec::new();

        for (key, value) in &self.wheres {
            clauses.push(format!("{}:{}", key, render_value(value)));
        }

        for (key, values) in &self.where_ins {
            if values.is_empty() {
                clauses.push(MATCH_NOTHING.to_string());
            } else {
                clauses.push(format!("{}:({})", key, render_values(values)));
            }
        }

        for (key, values) in &self.where_not_ins {
            if !values.is_empty() {
                clauses.push(format!("-{}:({})", key, render_values(values)));
            }
        }

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" AND "))
        }
    }
}

/// Options computed for a single search call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Rendered filter expression, if any constraint was given.
    pub filters: Option<String>,
    /// Maximum number of rows to return.
    pub limit: Option<usize>,
    /// Offset of the first row.
    pub offset: usize,
    /// Result ordering. Empty means relevance order.
    pub sort: Vec<SortOrder>,
}

impl SearchOptions {
    /// Render the sort orders as a Solr `sort` parameter value.
    pub fn sort_param(&self) -> Option<String> {
        if self.sort.is_empty() {
            return None;
        }
        Some(
            self.sort
                .iter()
                .map(|order| format!("{} {}", order.field, order.direction.as_str()))
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Escape characters that carry meaning in Solr's standard query syntax.
pub fn escape_query_chars(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(
            c,
            '\\' | '+'
                | '-'
                | '!'
                | '('
                | ')'
                | ':'
                | '^'
                | '['
                | ']'
                | '"'
                | '{'
                | '}'
                | '~'
                | '*'
                | '?'
                | '|'
                | '&'
                | ';'
                | '/'
        ) || c.is_whitespace()
        {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Bare words the query parser reads as boolean operators.
const RESERVED_WORDS: [&str; 3] = ["AND", "OR", "NOT"];

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) if RESERVED_WORDS.contains(&s.as_str()) => format!("\"{}\"", s),
        Value::String(s) => escape_query_chars(s),
        Value::Number(n) => escape_query_chars(&n.to_string()),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => escape_query_chars(&other.to_string()),
    }
}

fn render_values(values: &[Value]) -> String {
    values
        .iter()
        .map(render_value)
        .collect::<Vec<_>>()
        .join(" OR ")
}
