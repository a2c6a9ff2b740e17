//! HTTP routes for the metadata gateway.
//!
//! Every route answers `200` with a JSON envelope on success and a non-200
//! status with `{"error": "..."}` on failure. The API key never leaves the
//! server.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::GatewayError;
use crate::gateway::MetadataGateway;
use crate::models::{
    ErrorResponse, FieldList, PapersQuery, PapersResponse, RecommendationsInput, SearchQuery,
};

/// Shared state for HTTP handlers.
pub struct HttpState {
    /// Gateway the routes forward to.
    pub gateway: Arc<dyn MetadataGateway>,
}

/// Failure returned by a handler.
#[derive(Debug)]
pub enum ApiError {
    /// The gateway rejected the call or the upstream failed.
    Gateway(GatewayError),
    /// The request could not be decoded.
    Rejected {
        /// Status chosen by the extractor.
        status: StatusCode,
        /// Extractor message.
        message: String,
    },
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self::Gateway(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected { status: rejection.status(), message: rejection.body_text() }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected { status: rejection.status(), message: rejection.body_text() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Gateway(err) => {
                let status = if err.is_invalid_argument() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, err.to_user_message())
            }
            Self::Rejected { status, message } => (status, message),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %message, "Request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Create the HTTP router.
///
/// `base_path` is either empty (routes at the root) or a normalized prefix
/// such as `/papertinder`. `/health` is always served at the root.
pub fn create_router(gateway: Arc<dyn MetadataGateway>, base_path: &str) -> Router {
    let state = Arc::new(HttpState { gateway });

    let api = Router::new()
        .route("/search", get(handle_search))
        .route("/papers", get(handle_papers))
        .route("/recommendations", post(handle_recommendations))
        .with_state(state);

    let router = if base_path.is_empty() {
        api
    } else {
        Router::new().nest(base_path, api)
    };

    router
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "paper-tinder",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn handle_search(
    State(state): State<Arc<HttpState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = query?;
    let query = params.query.unwrap_or_default();

    let result = state.gateway.search_authors(&query, params.limit).await?;
    Ok(Json(result).into_response())
}

async fn handle_papers(
    State(state): State<Arc<HttpState>>,
    query: Result<Query<PapersQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = query?;
    let author_id = params.author_id.unwrap_or_default();
    let extra_fields = params.fields.map(|f| FieldList::Joined(f).to_vec()).unwrap_or_default();

    let result = state.gateway.get_author_papers(&author_id, params.limit, &extra_fields).await?;
    Ok(Json(result).into_response())
}

async fn handle_recommendations(
    State(state): State<Arc<HttpState>>,
    body: Result<Json<RecommendationsInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(input) = body?;
    let positive = input.positive_paper_ids.unwrap_or_default();
    let negative = input.negative_paper_ids.unwrap_or_default();
    let extra_fields = input.fields.map(|f| f.to_vec()).unwrap_or_default();

    let papers = state
        .gateway
        .get_recommendations(&positive, &negative, input.limit, &extra_fields)
        .await?;
    Ok(Json(PapersResponse::from_papers(papers)).into_response())
}
