//! Gateway tests against a mocked Semantic Scholar API.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paper_tinder::client::SemanticScholarClient;
use paper_tinder::config::Config;
use paper_tinder::error::{GatewayError, UNPARSABLE_ERROR_BODY};
use paper_tinder::gateway::{MetadataGateway, ScholarGateway};

fn setup_gateway(mock_server: &MockServer) -> ScholarGateway {
    let config = Config::for_testing(&mock_server.uri());
    let client = SemanticScholarClient::new(config).unwrap();
    ScholarGateway::new(Arc::new(client))
}

fn sample_paper_json(id: &str, year: i32) -> serde_json::Value {
    json!({
        "paperId": id,
        "title": format!("Paper {id}"),
        "year": year,
        "citationCount": 3,
        "authors": [{"authorId": "1", "name": "Test Author"}],
        "externalIds": {"DOI": format!("10.1234/{id}"), "CorpusId": 42}
    })
}

fn ids(papers: &[paper_tinder::models::Paper]) -> Vec<&str> {
    papers.iter().map(|p| p.paper_id.as_str()).collect()
}

// =============================================================================
// Author search
// =============================================================================

#[tokio::test]
async fn test_search_authors_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/search"))
        .and(query_param("query", "Jane Doe"))
        .and(query_param("limit", "10"))
        .and(query_param("fields", "name,url,paperCount,citationCount,hIndex,affiliations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "offset": 0,
            "data": [
                {"authorId": "123", "name": "Jane Doe", "paperCount": 12, "hIndex": 4,
                 "affiliations": ["MIT"]},
                {"name": "No Id"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let result = gateway.search_authors("  Jane Doe ", None).await.unwrap();

    assert_eq!(result.authors.len(), 1);
    assert_eq!(result.total, Some(2));
    let author = &result.authors[0];
    assert_eq!(author.author_id, "123");
    assert_eq!(author.paper_count, 12);
    assert_eq!(author.url, "https://www.semanticscholar.org/author/123");
    assert_eq!(author.primary_affiliation(), Some("MIT"));
}

#[tokio::test]
async fn test_search_authors_empty_query_makes_no_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let err = gateway.search_authors("   ", None).await.unwrap_err();

    assert!(err.is_invalid_argument());
    assert_eq!(err.to_user_message(), "Query parameter is required");
}

#[tokio::test]
async fn test_search_authors_missing_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0})))
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let result = gateway.search_authors("nobody", Some(3)).await.unwrap();
    assert!(result.authors.is_empty());
}

// =============================================================================
// Author papers
// =============================================================================

#[tokio::test]
async fn test_author_papers_normalizes_data_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/123/papers"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "offset": 0,
            "next": 2,
            "data": [
                sample_paper_json("p1", 2020),
                null,
                {"title": "no id"},
                sample_paper_json("p2", 2021)
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let result = gateway.get_author_papers("123", None, &[]).await.unwrap();

    assert_eq!(ids(&result.papers), vec!["p1", "p2"]);
    assert_eq!(result.next, Some(2));
    assert_eq!(result.papers[0].doi(), Some("10.1234/p1"));
    assert_eq!(result.papers[0].external_id("CorpusId"), Some("42"));
}

#[tokio::test]
async fn test_author_papers_merges_extra_fields() {
    let mock_server = MockServer::start().await;

    let mut expected: Vec<&str> = paper_tinder::config::fields::PAPER_DEFAULT.to_vec();
    expected.push("tldr");

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/9/papers"))
        .and(query_param("fields", expected.join(",").as_str()))
        .and(query_param("limit", "20"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([sample_paper_json("p1", 2020)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let extra = vec!["tldr".to_string(), "title".to_string()];
    let result = gateway.get_author_papers("9", Some(20), &extra).await.unwrap();

    assert_eq!(ids(&result.papers), vec!["p1"]);
}

#[tokio::test]
async fn test_author_papers_missing_id() {
    let mock_server = MockServer::start().await;
    let gateway = setup_gateway(&mock_server);

    let err = gateway.get_author_papers("", None, &[]).await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidArgument { ref field, .. } if field == "authorId"));
    assert_eq!(err.to_user_message(), "authorId parameter is required");
}

#[tokio::test]
async fn test_author_papers_upstream_error_is_propagated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/404/papers"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "Author not found"})),
        )
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let err = gateway.get_author_papers("404", None, &[]).await.unwrap_err();

    match err {
        GatewayError::Upstream { status, message } => {
            assert_eq!(status, Some(404));
            assert!(message.contains("Author not found"), "{message}");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparsable_error_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/1/papers"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let err = gateway.get_author_papers("1", None, &[]).await.unwrap_err();

    assert!(err.to_user_message().contains(UNPARSABLE_ERROR_BODY));
}

// =============================================================================
// Recommendations
// =============================================================================

#[tokio::test]
async fn test_recommendations_are_capped_at_five() {
    let mock_server = MockServer::start().await;

    let papers: Vec<_> = (0..8).map(|i| sample_paper_json(&format!("r{i}"), 2020)).collect();

    Mock::given(method("POST"))
        .and(path("/recommendations/v1/papers"))
        .and(query_param("limit", "5"))
        .and(body_json(json!({"positivePaperIds": ["p1", "p2"], "negativePaperIds": ["n1"]})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"recommendedPapers": papers})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let positive = vec!["p1".to_string(), " ".to_string(), "p2".to_string()];
    let negative = vec!["n1".to_string()];
    let result = gateway.get_recommendations(&positive, &negative, Some(50), &[]).await.unwrap();

    assert_eq!(ids(&result), vec!["r0", "r1", "r2", "r3", "r4"]);
}

#[tokio::test]
async fn test_recommendations_key_priority() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/recommendations/v1/papers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [sample_paper_json("from-data", 2020)],
            "recommendedPapers": [sample_paper_json("from-recs", 2020)]
        })))
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let result = gateway.get_recommendations(&["p1".to_string()], &[], None, &[]).await.unwrap();

    assert_eq!(ids(&result), vec!["from-recs"]);
}

#[tokio::test]
async fn test_recommendations_unknown_shape_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/recommendations/v1/papers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"something": "else"})))
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let result = gateway.get_recommendations(&["p1".to_string()], &[], None, &[]).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_recommendations_require_positive_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let err = gateway
        .get_recommendations(&[" ".to_string()], &["n".to_string()], None, &[])
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert_eq!(err.to_user_message(), "positivePaperIds array is required and must not be empty");
}

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/recommendations/v1/papers"))
        .and(header("x-api-key", "secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"recommendedPapers": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config =
        Config { api_key: Some("secret-key".into()), ..Config::for_testing(&mock_server.uri()) };
    let client = SemanticScholarClient::new(config).unwrap();
    assert!(!format!("{client:?}").contains("secret-key"));

    let gateway = ScholarGateway::new(Arc::new(client));
    gateway.get_recommendations(&["p1".to_string()], &[], None, &[]).await.unwrap();
}

#[tokio::test]
async fn test_rate_limited_keeps_status_and_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/recommendations/v1/papers"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "7")
                .set_body_json(json!({"message": "Too Many Requests: quota exceeded"})),
        )
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let err = gateway.get_recommendations(&["p1".to_string()], &[], None, &[]).await.unwrap_err();

    assert!(matches!(err, GatewayError::Upstream { status: Some(429), .. }));
    let message = err.to_user_message();
    assert!(message.contains("429"), "{message}");
    assert!(message.contains("quota exceeded"), "{message}");
}

#[tokio::test]
async fn test_rate_limited_unparsable_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&mock_server)
        .await;

    let gateway = setup_gateway(&mock_server);
    let err = gateway.search_authors("Ada", None).await.unwrap_err();

    assert!(err.to_user_message().contains(UNPARSABLE_ERROR_BODY));
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_search_is_cached_within_ttl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/author/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [{"authorId": "1", "name": "A"}]})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = Config {
        cache_ttl: std::time::Duration::from_secs(60),
        cache_max_size: 100,
        ..Config::for_testing(&mock_server.uri())
    };
    let gateway = ScholarGateway::new(Arc::new(SemanticScholarClient::new(config).unwrap()));

    gateway.search_authors("A", None).await.unwrap();
    let second = gateway.search_authors("A", None).await.unwrap();
    assert_eq!(second.authors.len(), 1);
}

#[tokio::test]
async fn test_recommendations_are_never_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/recommendations/v1/papers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"recommendedPapers": []})))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = Config {
        cache_ttl: std::time::Duration::from_secs(60),
        cache_max_size: 100,
        ..Config::for_testing(&mock_server.uri())
    };
    let gateway = ScholarGateway::new(Arc::new(SemanticScholarClient::new(config).unwrap()));

    let positive = vec!["p1".to_string()];
    gateway.get_recommendations(&positive, &[], None, &[]).await.unwrap();
    gateway.get_recommendations(&positive, &[], None, &[]).await.unwrap();
}
