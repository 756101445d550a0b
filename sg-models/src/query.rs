//! Query predicates for document listing.
//!
//! The backend accepts each predicate as a JSON object in a repeated
//! `queries[]` URL parameter, e.g.
//! `{"method":"equal","attribute":"accountId","values":["abc"]}`.

use serde::Serialize;
use serde_json::Value;

/// A single list-documents predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Attribute equals any of the values.
    Equal(String, Vec<Value>),
    /// Full-text search on an indexed attribute.
    Search(String, String),
    /// Sort descending.
    OrderDesc(String),
    /// Sort ascending.
    OrderAsc(String),
    /// Page size.
    Limit(u32),
    /// Skip this many results.
    Offset(u32),
    /// Start after the document with this id.
    CursorAfter(String),
}

#[derive(Serialize)]
struct Wire<'a> {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<Value>>,
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Query::Equal(attribute.into(), vec![value.into()])
    }

    pub fn search(attribute: impl Into<String>, term: impl Into<String>) -> Self {
        Query::Search(attribute.into(), term.into())
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Query::OrderDesc(attribute.into())
    }

    pub fn order_asc(attribute: impl Into<String>) -> Self {
        Query::OrderAsc(attribute.into())
    }

    pub fn limit(limit: u32) -> Self {
        Query::Limit(limit)
    }

    pub fn offset(offset: u32) -> Self {
        Query::Offset(offset)
    }

    pub fn cursor_after(document_id: impl Into<String>) -> Self {
        Query::CursorAfter(document_id.into())
    }

    /// Backend method name for this predicate.
    pub fn method(&self) -> &'static str {
        match self {
            Query::Equal(..) => "equal",
            Query::Search(..) => "search",
            Query::OrderDesc(_) => "orderDesc",
            Query::OrderAsc(_) => "orderAsc",
            Query::Limit(_) => "limit",
            Query::Offset(_) => "offset",
            Query::CursorAfter(_) => "cursorAfter",
        }
    }

    /// Serialize to the backend's JSON query string.
    pub fn to_query_string(&self) -> String {
        let wire = match self {
            Query::Equal(attr, values) => Wire {
                method: self.method(),
                attribute: Some(attr),
                values: Some(values.clone()),
            },
            Query::Search(attr, term) => Wire {
                method: self.method(),
                attribute: Some(attr),
                values: Some(vec![Value::from(term.as_str())]),
            },
            Query::OrderDesc(attr) | Query::OrderAsc(attr) => Wire {
                method: self.method(),
                attribute: Some(attr),
                values: None,
            },
            Query::Limit(n) | Query::Offset(n) => Wire {
                method: self.method(),
                attribute: None,
                values: Some(vec![Value::from(*n)]),
            },
            Query::CursorAfter(id) => Wire {
                method: self.method(),
                attribute: None,
                values: Some(vec![Value::from(id.as_str())]),
            },
        };
        // Serializing a struct of strings and JSON values cannot fail.
        serde_json::to_string(&wire).unwrap_or_default()
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
