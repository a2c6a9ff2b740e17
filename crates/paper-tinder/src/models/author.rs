//! Author data model matching the Semantic Scholar API schema.

use serde::{Deserialize, Serialize};

use crate::config::api::AUTHOR_PROFILE_BASE;

/// Author search page as returned by the Graph API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthorSearch {
    /// Total matching authors.
    #[serde(default)]
    pub total: Option<i64>,

    /// Offset for pagination.
    #[serde(default)]
    pub offset: Option<i64>,

    /// Next offset if more results.
    #[serde(default)]
    pub next: Option<i64>,

    /// Authors in this page, fields possibly missing.
    #[serde(default)]
    pub data: Option<Vec<RawAuthor>>,
}

/// An author record as the API returns it: any field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuthor {
    /// Semantic Scholar author ID.
    #[serde(default)]
    pub author_id: Option<String>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Profile URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Number of papers.
    #[serde(default)]
    pub paper_count: Option<i64>,

    /// Total citations.
    #[serde(default)]
    pub citation_count: Option<i64>,

    /// h-index.
    #[serde(default)]
    pub h_index: Option<i64>,

    /// Institutional affiliations.
    #[serde(default)]
    pub affiliations: Option<Vec<String>>,
}

/// A researcher profile with every field filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Unique Semantic Scholar author ID.
    pub author_id: String,

    /// Author name (empty when unknown).
    #[serde(default)]
    pub name: String,

    /// Profile page URL.
    #[serde(default)]
    pub url: String,

    /// Total number of papers by this author.
    #[serde(default)]
    pub paper_count: i64,

    /// Total citation count across all papers.
    #[serde(default)]
    pub citation_count: i64,

    /// h-index metric.
    #[serde(default)]
    pub h_index: i64,

    /// Institutional affiliations.
    #[serde(default)]
    pub affiliations: Vec<String>,
}

impl Author {
    /// Fill in defaults for a raw API record.
    ///
    /// Returns `None` when the record has no usable author ID.
    #[must_use]
    pub fn from_raw(raw: RawAuthor) -> Option<Self> {
        let author_id = raw.author_id.filter(|id| !id.trim().is_empty())?;
        let url = raw
            .url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format!("{AUTHOR_PROFILE_BASE}/{author_id}"));

        Some(Self {
            name: raw.name.unwrap_or_default(),
            url,
            paper_count: raw.paper_count.unwrap_or(0),
            citation_count: raw.citation_count.unwrap_or(0),
            h_index: raw.h_index.unwrap_or(0),
            affiliations: raw.affiliations.unwrap_or_default(),
            author_id,
        })
    }

    /// Get the author name, falling back to "Unknown" if blank.
    #[must_use]
    pub fn name_or_default(&self) -> &str {
        if self.name.is_empty() { "Unknown" } else { &self.name }
    }

    /// Get the primary affiliation if available.
    #[must_use]
    pub fn primary_affiliation(&self) -> Option<&str> {
        self.affiliations.first().map(String::as_str)
    }
}

/// Minimal author reference (used in paper author lists).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    /// Author ID.
    #[serde(default)]
    pub author_id: Option<String>,

    /// Author name.
    #[serde(default)]
    pub name: Option<String>,
}
