//! HTTP route tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_tinder::client::SemanticScholarClient;
use paper_tinder::config::Config;
use paper_tinder::gateway::{MetadataGateway, ScholarGateway};
use paper_tinder::server::GatewayServer;

fn setup_router(mock_server: &MockServer, base_path: &str) -> axum::Router {
    let config = Config::for_testing(&mock_server.uri());
    let client = SemanticScholarClient::new(config).unwrap();
    let gateway: Arc<dyn MetadataGateway> = Arc::new(ScholarGateway::new(Arc::new(client)));
    GatewayServer::with_gateway(gateway, base_path).router()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

// =============================================================================
// Health and mounting
// =============================================================================

#[tokio::test]
async fn test_health_is_served_at_root() {
    let mock_server = MockServer::start().await;
    let app = setup_router(&mock_server, "/papertinder");

    let response = app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_routes_live_under_base_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    let app = setup_router(&mock_server, "/papertinder");

    let response = app
        .clone()
        .oneshot(Request::get("/papertinder/search?query=ada").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response =
        app.oneshot(Request::get("/search?query=ada").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// /search
// =============================================================================

#[tokio::test]
async fn test_search_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "data": [{"authorId": "7", "name": "Ada Lovelace", "paperCount": 3}]
        })))
        .mount(&mock_server)
        .await;

    let app = setup_router(&mock_server, "");
    let response = app
        .oneshot(Request::get("/search?query=Ada%20Lovelace").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["authors"][0]["authorId"], "7");
    assert_eq!(body["authors"][0]["url"], "https://www.semanticscholar.org/author/7");
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_search_without_query_is_bad_request() {
    let mock_server = MockServer::start().await;
    let app = setup_router(&mock_server, "");

    let response = app.oneshot(Request::get("/search").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "Query parameter is required"}));
}

// =============================================================================
// /papers
// =============================================================================

#[tokio::test]
async fn test_papers_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/7/papers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"paperId": "p1", "title": "First", "year": 2021}]
        })))
        .mount(&mock_server)
        .await;

    let app = setup_router(&mock_server, "");
    let response = app
        .oneshot(Request::get("/papers?authorId=7&fields=tldr").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["papers"][0]["paperId"], "p1");
    assert_eq!(body["papers"][0]["year"], 2021);
}

#[tokio::test]
async fn test_papers_without_author_id_is_bad_request() {
    let mock_server = MockServer::start().await;
    let app = setup_router(&mock_server, "");

    let response = app.oneshot(Request::get("/papers").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "authorId parameter is required");
}

#[tokio::test]
async fn test_upstream_failure_is_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/7/papers"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "Author not found"})),
        )
        .mount(&mock_server)
        .await;

    let app = setup_router(&mock_server, "");
    let response =
        app.oneshot(Request::get("/papers?authorId=7").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Author not found"));
}

// =============================================================================
// /recommendations
// =============================================================================

#[tokio::test]
async fn test_recommendations_envelope_is_capped() {
    let mock_server = MockServer::start().await;

    let papers: Vec<Value> = (0..7).map(|i| json!({"paperId": format!("r{i}")})).collect();
    Mock::given(method("POST"))
        .and(path("/recommendations/v1/papers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"recommendedPapers": papers})),
        )
        .mount(&mock_server)
        .await;

    let app = setup_router(&mock_server, "");
    let response = app
        .oneshot(post_json(
            "/recommendations",
            &json!({"positivePaperIds": ["p1"], "negativePaperIds": [], "limit": 20}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["papers"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_recommendations_empty_positive_is_bad_request() {
    let mock_server = MockServer::start().await;
    let app = setup_router(&mock_server, "");

    let response = app
        .oneshot(post_json("/recommendations", &json!({"positivePaperIds": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "positivePaperIds array is required and must not be empty"
    );
}

#[tokio::test]
async fn test_recommendations_malformed_body_is_rejected() {
    let mock_server = MockServer::start().await;
    let app = setup_router(&mock_server, "");

    let response = app
        .oneshot(
            Request::post("/recommendations")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert!(body_json(response).await["error"].is_string());
}
