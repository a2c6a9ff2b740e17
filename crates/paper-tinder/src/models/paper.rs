//! Paper data model matching the Semantic Scholar API schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::AuthorRef;

/// Public paper page prefix, used when the API omits `url`.
const PAPER_PAGE_BASE: &str = "https://www.semanticscholar.org/paper";

/// A research paper from Semantic Scholar.
///
/// Identity is [`Paper::paper_id`]; everything else is display metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Unique Semantic Scholar paper ID.
    pub paper_id: String,

    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,

    /// Paper abstract.
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Number of references in this paper.
    #[serde(default)]
    pub reference_count: Option<i32>,

    /// Number of citations this paper has received.
    #[serde(default)]
    pub citation_count: Option<i32>,

    /// Influential citation count.
    #[serde(default)]
    pub influential_citation_count: Option<i32>,

    /// Whether this paper is open access.
    #[serde(default)]
    pub is_open_access: Option<bool>,

    /// Open access PDF information.
    #[serde(default)]
    pub open_access_pdf: Option<OpenAccessPdf>,

    /// Fields of study (e.g., "Computer Science", "Medicine").
    #[serde(default)]
    pub fields_of_study: Option<Vec<String>>,

    /// Publication venue (journal or conference).
    #[serde(default)]
    pub publication_venue: Option<PublicationVenue>,

    /// List of authors.
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<AuthorRef>,

    /// Canonical Semantic Scholar URL.
    #[serde(default)]
    pub url: Option<String>,

    /// External identifiers keyed by kind (DOI, ArXiv, CorpusId, ...).
    #[serde(default, deserialize_with = "external_ids_as_strings")]
    pub external_ids: Option<BTreeMap<String, String>>,
}

impl Paper {
    /// Create a paper with only an identifier and title.
    #[must_use]
    pub fn new(paper_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { paper_id: paper_id.into(), title: Some(title.into()), ..Self::default() }
    }

    /// Get the paper title, falling back to "Untitled" if not available.
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// Publication year, with a missing year counted as 0.
    #[must_use]
    pub fn year_or_zero(&self) -> i32 {
        self.year.unwrap_or(0)
    }

    /// Canonical page URL, built from the ID when the API left it out.
    #[must_use]
    pub fn link(&self) -> String {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("{PAPER_PAGE_BASE}/{}", self.paper_id),
        }
    }

    /// Get the DOI if available.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        self.external_id("DOI")
    }

    /// Get the ArXiv ID if available.
    #[must_use]
    pub fn arxiv_id(&self) -> Option<&str> {
        self.external_id("ArXiv")
    }

    /// Look up an external identifier by kind.
    #[must_use]
    pub fn external_id(&self, kind: &str) -> Option<&str> {
        self.external_ids.as_ref()?.get(kind).map(String::as_str)
    }

    /// Get the open access PDF URL if available.
    #[must_use]
    pub fn pdf_url(&self) -> Option<&str> {
        self.open_access_pdf.as_ref()?.url.as_deref().filter(|u| !u.is_empty())
    }

    /// Venue name if available.
    #[must_use]
    pub fn venue_name(&self) -> Option<&str> {
        self.publication_venue.as_ref()?.name.as_deref()
    }

    /// Get citation count or 0 if not available.
    #[must_use]
    pub fn citations(&self) -> i32 {
        self.citation_count.unwrap_or(0)
    }

    /// Get author names as a comma-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .filter_map(|a| a.name.as_ref())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Open access PDF information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAccessPdf {
    /// Direct URL to the PDF.
    #[serde(default)]
    pub url: Option<String>,

    /// Status of open access.
    #[serde(default)]
    pub status: Option<String>,
}

/// Journal or conference a paper appeared in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationVenue {
    /// Venue ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Venue name.
    #[serde(default)]
    pub name: Option<String>,

    /// Venue type ("journal", "conference").
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Venue homepage.
    #[serde(default)]
    pub url: Option<String>,

    /// Other names the venue is known by.
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternate_names: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The API mixes string and numeric IDs (`CorpusId` is a number); keep them
/// all as strings and drop nulls.
fn external_ids_as_strings<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|map| {
        map.into_iter()
            .filter_map(|(kind, value)| match value {
                serde_json::Value::String(s) => Some((kind, s)),
                serde_json::Value::Number(n) => Some((kind, n.to_string())),
                _ => None,
            })
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_deserialize_minimal() {
        let json = r#"{"paperId": "abc123"}"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.paper_id, "abc123");
        assert!(paper.title.is_none());
        assert!(paper.authors.is_empty());
        assert_eq!(paper.link(), "https://www.semanticscholar.org/paper/abc123");
    }

    #[test]
    fn test_paper_deserialize_full() {
        let json = r#"{
            "paperId": "abc123",
            "title": "Test Paper",
            "abstract": "This is a test.",
            "year": 2024,
            "citationCount": 42,
            "influentialCitationCount": 3,
            "isOpenAccess": true,
            "openAccessPdf": {"url": "https://example.org/p.pdf", "status": "GREEN"},
            "publicationVenue": {
                "id": "v1",
                "name": "NeurIPS",
                "type": "conference",
                "alternate_names": ["NIPS"]
            },
            "authors": [{"authorId": "auth1", "name": "John Doe"}],
            "url": "https://www.semanticscholar.org/paper/abc123",
            "externalIds": {"DOI": "10.1234/test", "CorpusId": 998877, "MAG": null}
        }"#;

        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.title_or_default(), "Test Paper");
        assert_eq!(paper.year, Some(2024));
        assert_eq!(paper.citations(), 42);
        assert_eq!(paper.doi(), Some("10.1234/test"));
        assert_eq!(paper.external_id("CorpusId"), Some("998877"));
        assert_eq!(paper.external_id("MAG"), None);
        assert_eq!(paper.pdf_url(), Some("https://example.org/p.pdf"));
        assert_eq!(paper.venue_name(), Some("NeurIPS"));
        assert_eq!(
            paper.publication_venue.as_ref().and_then(|v| v.kind.as_deref()),
            Some("conference")
        );
        assert_eq!(paper.author_names(), "John Doe");
    }

    #[test]
    fn test_null_authors_become_empty() {
        let paper: Paper = serde_json::from_str(r#"{"paperId": "p", "authors": null}"#).unwrap();
        assert!(paper.authors.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(Paper::new("p1", "T")).unwrap();
        assert_eq!(value["paperId"], "p1");
        assert!(value.get("paper_id").is_none());
    }
}
