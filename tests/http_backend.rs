//! Search sessions against a mocked portal API

use portal_search::config::Settings;
use portal_search::search::{HttpSearchBackend, SearchBackend, SearchRequest, SearchSession};
use portal_search::{ErrorKind, FilterState, SearchError, SearchStatus};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.outgoing.base_url = server.uri();
    settings
}

fn hits(total: u64) -> serde_json::Value {
    json!({
        "results": [
            {
                "id": "doc-1",
                "path": "/sites/projects/Bridge/cost-plan.docx",
                "title": "Bridge cost plan",
                "highlights": ["estimated <em>cost</em>"],
                "sourceIndexId": "sharepoint_documents"
            },
            {
                "id": "doc-2",
                "path": "J:\\Bridge\\benchmarks.xlsx",
                "highlights": [],
                "sourceIndexId": "fileshare_j"
            }
        ],
        "total": total
    })
}

#[tokio::test]
async fn test_search_posts_documented_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search/search"))
        .and(body_json(json!({
            "indexes": ["fileshare_j", "fileshare_y"],
            "query": "cost",
            "field": "content",
            "size": 10,
            "from": 0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(25)))
        .expect(1)
        .mount(&server)
        .await;

    let session = assert_ok!(SearchSession::from_settings(&settings_for(&server)));
    let task = session
        .search("cost", 1, FilterState::subset(["J", "Y"]))
        .expect("request should be sent");
    assert_ok!(task.await);

    let state = session.state();
    assert_eq!(state.status, SearchStatus::Success);
    let page = state.results.as_ref().unwrap();
    assert_eq!(page.total_count, 25);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].display_title(), "benchmarks.xlsx");
    assert_eq!(state.pagination(10).unwrap().total_pages(), 3);
}

#[tokio::test]
async fn test_change_filter_restarts_at_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search/search"))
        .and(body_json(json!({
            "indexes": ["sharepoint_documents", "fileshare_j", "fileshare_y", "fileshare_s"],
            "query": "cost",
            "field": "content",
            "size": 10,
            "from": 0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(40)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search/search"))
        .and(body_json(json!({
            "indexes": ["sharepoint_documents", "fileshare_j", "fileshare_y", "fileshare_s"],
            "query": "cost",
            "field": "content",
            "size": 10,
            "from": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(40)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search/search"))
        .and(body_json(json!({
            "indexes": ["sharepoint_documents"],
            "query": "cost",
            "field": "content",
            "size": 10,
            "from": 0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(2)))
        .expect(1)
        .mount(&server)
        .await;

    let session = assert_ok!(SearchSession::from_settings(&settings_for(&server)));
    assert_ok!(session.submit("cost").unwrap().await);
    assert_ok!(session.change_page(3).unwrap().await);
    assert_eq!(session.state().results.unwrap().page, 3);

    assert_ok!(session
        .change_filter(FilterState::DocumentSystems)
        .unwrap()
        .await);

    let state = session.state();
    assert_eq!(state.results.unwrap().page, 1);
    assert_eq!(state.query.unwrap().page, 1);
}

#[tokio::test]
async fn test_nested_reason_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search/search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "{\"error\":{\"reason\":\"field not found\"}}"
        })))
        .mount(&server)
        .await;

    let session = assert_ok!(SearchSession::from_settings(&settings_for(&server)));
    assert_ok!(session.submit("cost").unwrap().await);

    let state = session.state();
    assert_eq!(state.status, SearchStatus::Failed);
    assert_eq!(
        state.error_message().as_deref(),
        Some("Search failed: field not found")
    );
    assert_eq!(session.metrics().get_failures(ErrorKind::MalformedQuery), 1);
}

#[tokio::test]
async fn test_status_codes_are_classified() {
    let cases = [
        (401, ErrorKind::Unauthorized),
        (403, ErrorKind::Unauthorized),
        (404, ErrorKind::MalformedQuery),
        (429, ErrorKind::RateLimited),
        (500, ErrorKind::ServerFault),
        (503, ErrorKind::ServerFault),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(status).set_body_json(json!({ "message": "nope" })),
            )
            .mount(&server)
            .await;

        let backend = assert_ok!(HttpSearchBackend::from_settings(&settings_for(&server)));
        let request = SearchRequest {
            indexes: vec!["fileshare_j".to_string()],
            query: "cost".to_string(),
            field: "content".to_string(),
            size: 10,
            from: 0,
        };

        let error = assert_err!(backend.search(&request).await);
        assert_eq!(error.kind(), expected, "status {}", status);
        assert!(!error.user_message().starts_with("Search failed:"));
    }
}

#[tokio::test]
async fn test_legacy_array_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "path": "S:\\drawings\\a.pdf", "sourceIndexId": "fileshare_s" },
            { "id": 2, "path": "S:\\drawings\\b.pdf", "sourceIndexId": "fileshare_s" }
        ])))
        .mount(&server)
        .await;

    let session = assert_ok!(SearchSession::from_settings(&settings_for(&server)));
    assert_ok!(session.submit("drawings").unwrap().await);

    let page = session.state().results.unwrap();
    assert_eq!(page.total_count, 2);
    assert_eq!(page.items[0].id, "1");
}

#[tokio::test]
async fn test_malformed_payload_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let session = assert_ok!(SearchSession::from_settings(&settings_for(&server)));
    assert_ok!(session.submit("cost").unwrap().await);

    let state = session.state();
    assert_eq!(state.status, SearchStatus::Failed);
    assert_eq!(state.error.unwrap().kind(), ErrorKind::Unknown);
}

#[tokio::test]
async fn test_unreachable_backend() {
    let mut settings = Settings::default();
    settings.outgoing.base_url = "http://127.0.0.1:1".to_string();

    let session = assert_ok!(SearchSession::from_settings(&settings));
    assert_ok!(session.submit("cost").unwrap().await);

    let error = session.state().error.unwrap();
    assert!(matches!(error, SearchError::Network { .. }));
    assert_eq!(error.kind(), ErrorKind::NetworkUnreachable);
}

#[tokio::test]
async fn test_auth_and_extra_headers_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer s3cret"))
        .and(header("x-portal-client", "search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(2)))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.outgoing.auth_token = Some("s3cret".to_string());
    settings
        .outgoing
        .extra_headers
        .insert("X-Portal-Client".to_string(), "search".to_string());

    let session = assert_ok!(SearchSession::from_settings(&settings));
    assert_ok!(session.submit("cost").unwrap().await);
    assert_eq!(session.state().status, SearchStatus::Success);
}
