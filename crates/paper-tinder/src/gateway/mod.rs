//! Metadata gateway.
//!
//! The three logical operations the app needs from Semantic Scholar:
//! 1. Validate the caller's input (rejecting before any network call)
//! 2. Apply default limits and field lists
//! 3. Call the API client and normalize the payload

mod normalize;

pub use normalize::{PAPER_LIST_KEYS, normalize_papers};

use std::sync::Arc;

use crate::client::SemanticScholarClient;
use crate::config::{fields, limits};
use crate::error::{GatewayError, GatewayResult};
use crate::models::{Author, AuthorSearchResponse, Paper, PapersResponse};

/// Largest page the Graph API accepts for author search and paper listing.
const API_PAGE_MAX: u32 = 1000;

/// Source of authors, papers and recommendations.
#[async_trait::async_trait]
pub trait MetadataGateway: Send + Sync {
    /// Search authors by name. `limit` defaults to 10.
    async fn search_authors(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> GatewayResult<AuthorSearchResponse>;

    /// List an author's papers. `limit` defaults to 100; `extra_fields` are
    /// merged into the default field set.
    async fn get_author_papers(
        &self,
        author_id: &str,
        limit: Option<u32>,
        extra_fields: &[String],
    ) -> GatewayResult<PapersResponse>;

    /// Recommend papers from example sets. Never returns more than 5.
    async fn get_recommendations(
        &self,
        positive_ids: &[String],
        negative_ids: &[String],
        limit: Option<u32>,
        extra_fields: &[String],
    ) -> GatewayResult<Vec<Paper>>;
}

/// Gateway backed by the live Semantic Scholar API.
#[derive(Debug, Clone)]
pub struct ScholarGateway {
    client: Arc<SemanticScholarClient>,
}

impl ScholarGateway {
    /// Create a gateway over a shared client.
    #[must_use]
    pub fn new(client: Arc<SemanticScholarClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl MetadataGateway for ScholarGateway {
    async fn search_authors(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> GatewayResult<AuthorSearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GatewayError::invalid_argument("query", "Query parameter is required"));
        }
        let limit = clamp_page(limit, limits::SEARCH_DEFAULT);

        tracing::info!(query, limit, "Searching authors");
        let raw = self.client.search_authors(query, limit).await?;

        let authors: Vec<Author> =
            raw.data.unwrap_or_default().into_iter().filter_map(Author::from_raw).collect();

        tracing::info!(found = authors.len(), total = ?raw.total, "Author search complete");
        Ok(AuthorSearchResponse { authors, total: raw.total, offset: raw.offset, next: raw.next })
    }

    async fn get_author_papers(
        &self,
        author_id: &str,
        limit: Option<u32>,
        extra_fields: &[String],
    ) -> GatewayResult<PapersResponse> {
        let author_id = author_id.trim();
        if author_id.is_empty() {
            return Err(GatewayError::invalid_argument(
                "authorId",
                "authorId parameter is required",
            ));
        }
        let limit = clamp_page(limit, limits::PAPERS_DEFAULT);
        let field_list = fields::merge_paper_fields(extra_fields);

        tracing::info!(author_id, limit, "Fetching author papers");
        let payload = self.client.get_author_papers(author_id, limit, &field_list).await?;
        let response = normalize_papers(payload);

        tracing::info!(author_id, papers = response.papers.len(), "Author papers loaded");
        Ok(response)
    }

    async fn get_recommendations(
        &self,
        positive_ids: &[String],
        negative_ids: &[String],
        limit: Option<u32>,
        extra_fields: &[String],
    ) -> GatewayResult<Vec<Paper>> {
        let positive = non_blank(positive_ids);
        if positive.is_empty() {
            return Err(GatewayError::invalid_argument(
                "positivePaperIds",
                "positivePaperIds array is required and must not be empty",
            ));
        }
        let negative = non_blank(negative_ids);
        let limit = recommendation_limit(limit);
        let field_list = fields::merge_paper_fields(extra_fields);

        tracing::info!(
            positive = positive.len(),
            negative = negative.len(),
            limit,
            "Fetching recommendations"
        );
        let payload =
            self.client.get_recommendations(&positive, &negative, limit, &field_list).await?;

        let mut papers = normalize_papers(payload).papers;
        papers.truncate(limits::RECOMMENDATIONS_MAX as usize);

        tracing::info!(recommended = papers.len(), "Recommendations received");
        Ok(papers)
    }
}

/// Effective recommendation count: the request, capped at 5, at least 1.
#[must_use]
pub fn recommendation_limit(requested: Option<u32>) -> u32 {
    requested.unwrap_or(limits::RECOMMENDATIONS_MAX).clamp(1, limits::RECOMMENDATIONS_MAX)
}

fn clamp_page(requested: Option<u32>, default: u32) -> u32 {
    requested.unwrap_or(default).clamp(1, API_PAGE_MAX)
}

fn non_blank(ids: &[String]) -> Vec<String> {
    ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()).map(String::from).collect()
}
