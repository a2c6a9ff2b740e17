//! Response-shape normalization.
//!
//! The paper endpoints put their results under different keys depending on
//! the route and API version. Everything downstream only ever sees a
//! [`PapersResponse`].

use serde_json::Value;

use crate::models::{Paper, PapersResponse};

/// Keys that may hold the paper list, highest priority first.
pub const PAPER_LIST_KEYS: &[&str] = &["recommendedPapers", "data", "papers"];

/// Shape an upstream payload into a single paper list.
///
/// Takes the first key from [`PAPER_LIST_KEYS`] holding an array, then falls
/// back to a bare top-level array, then to an empty list. Entries that do not
/// parse as a paper (for example a null or a record without `paperId`) are
/// dropped.
#[must_use]
pub fn normalize_papers(payload: Value) -> PapersResponse {
    match payload {
        Value::Array(items) => PapersResponse::from_papers(parse_papers(items)),
        Value::Object(mut map) => {
            let items = PAPER_LIST_KEYS
                .iter()
                .find_map(|key| match map.remove(*key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
                .unwrap_or_default();

            PapersResponse {
                papers: parse_papers(items),
                total: map.get("total").and_then(Value::as_i64),
                offset: map.get("offset").and_then(Value::as_i64),
                next: map.get("next").and_then(Value::as_i64),
            }
        }
        other => {
            tracing::warn!(kind = json_kind(&other), "Unexpected paper payload shape");
            PapersResponse::default()
        }
    }
}

fn parse_papers(items: Vec<Value>) -> Vec<Paper> {
    let total = items.len();
    let papers: Vec<Paper> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Paper>(item).ok())
        .filter(|p| !p.paper_id.is_empty())
        .collect();

    if papers.len() < total {
        tracing::debug!(dropped = total - papers.len(), "Dropped unparsable paper records");
    }
    papers
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
