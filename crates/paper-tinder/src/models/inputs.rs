//! Request parameters and response envelopes for the gateway routes.

use serde::{Deserialize, Serialize};

use super::{Author, Paper};

/// Query parameters for `GET /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Author name to search for.
    #[serde(default)]
    pub query: Option<String>,

    /// Maximum authors to return.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Query parameters for `GET /papers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PapersQuery {
    /// Author whose papers to list.
    #[serde(default)]
    pub author_id: Option<String>,

    /// Maximum papers to return.
    #[serde(default)]
    pub limit: Option<u32>,

    /// Extra fields as a comma-separated list.
    #[serde(default)]
    pub fields: Option<String>,
}

/// A field list given either as `"a,b,c"` or `["a", "b", "c"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldList {
    /// Comma-separated string.
    Joined(String),
    /// JSON array of names.
    List(Vec<String>),
}

impl FieldList {
    /// Split into individual, trimmed, non-empty field names.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        let parts: Vec<&str> = match self {
            Self::Joined(s) => s.split(',').collect(),
            Self::List(items) => items.iter().map(String::as_str).collect(),
        };
        parts.into_iter().map(str::trim).filter(|f| !f.is_empty()).map(String::from).collect()
    }
}

/// JSON body for `POST /recommendations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsInput {
    /// Paper IDs to use as positive examples.
    #[serde(default)]
    pub positive_paper_ids: Option<Vec<String>>,

    /// Paper IDs to use as negative examples.
    #[serde(default)]
    pub negative_paper_ids: Option<Vec<String>>,

    /// Requested recommendation count (capped by the gateway).
    #[serde(default)]
    pub limit: Option<u32>,

    /// Extra fields to request.
    #[serde(default)]
    pub fields: Option<FieldList>,
}

/// One page of author search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSearchResponse {
    /// Matching authors, defaults filled in.
    pub authors: Vec<Author>,

    /// Total matches upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,

    /// Offset of this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    /// Offset of the next page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<i64>,
}

/// A list of papers with optional pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PapersResponse {
    /// Papers in upstream order.
    pub papers: Vec<Paper>,

    /// Total matches upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,

    /// Offset of this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    /// Offset of the next page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<i64>,
}

impl PapersResponse {
    /// Wrap a bare list.
    #[must_use]
    pub fn from_papers(papers: Vec<Paper>) -> Self {
        Self { papers, ..Self::default() }
    }
}

/// Failure envelope returned by every route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub error: String,
}
