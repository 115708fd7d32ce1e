//! Endpoint mappings of the typed client, checked against a mocked
//! Grafana API.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use grafana_provider::{ClientError, GrafanaClient, GrafanaConfig};

fn client_for(server: &MockServer) -> GrafanaClient {
    GrafanaClient::new(GrafanaConfig::with_token(server.uri(), "test-key")).unwrap()
}

#[tokio::test]
async fn non_2xx_surfaces_the_status_line() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/teams/1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.team(1).await.unwrap_err();
    assert_eq!(err.to_string(), "404 Not Found");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn basic_auth_credentials_are_sent() {
    let server = MockServer::start().await;

    // admin:secret
    Mock::given(method("GET"))
        .and(path("/api/users/3"))
        .and(wiremock::matchers::header(
            "authorization",
            "Basic YWRtaW46c2VjcmV0",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 3, "login": "alice"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = GrafanaClient::new(GrafanaConfig::with_basic_auth(
        server.uri(),
        "admin",
        "secret",
    ))
    .unwrap();
    let user = client.user(3).await.unwrap();
    assert_eq!(user.login, "alice");
}

#[tokio::test]
async fn search_lists_dashboards_in_folder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("folderIds", "3"))
        .and(query_param("type", "dash-db"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 9, "uid": "abc123", "title": "Requests",
                "uri": "db/requests", "url": "/d/abc123/requests",
                "type": "dash-db"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let results = client.dashboards_by_folder(3).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].slug(), "requests");
    assert!(!results[0].is_folder());
}

#[tokio::test]
async fn uid_from_id_walks_the_version_history() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboards/id/9/versions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 55, "version": 3},
            {"id": 54, "version": 2}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/dashboards/id/9/versions/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 55,
            "data": {"id": 9, "uid": "abc123", "title": "Requests"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let uid = client.dashboard_uid_by_id(9).await.unwrap();
    assert_eq!(uid, "abc123");
}

#[tokio::test]
async fn uid_from_id_fails_without_version_history() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboards/id/9/versions/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.dashboard_uid_by_id(9).await.unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedBody(_)));
}

#[tokio::test]
async fn id_from_uid_reads_the_model_blob() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"slug": "requests", "folderId": 0},
            "dashboard": {"id": 9, "uid": "abc123", "title": "Requests"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = client.dashboard_id_by_uid("abc123").await.unwrap();
    assert_eq!(id, 9);
}

#[tokio::test]
async fn id_from_uid_fails_when_model_has_no_id() {
    let server = MockServer::start().await;

    // The model blob carries no numeric id: the derivation has nothing
    // typed to fall back on and must fail.
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"slug": "requests"},
            "dashboard": {"uid": "abc123", "title": "Requests"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.dashboard_id_by_uid("abc123").await.unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedBody(_)));
}

#[tokio::test]
async fn home_dashboard_keeps_meta_folder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboards/home"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"slug": "home", "folderId": 2},
            "dashboard": {"title": "Home"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let dashboard = client.home_dashboard().await.unwrap();
    assert_eq!(dashboard.folder, 2);
    assert_eq!(dashboard.model["title"], "Home");
}

#[tokio::test]
async fn team_member_endpoints_map_to_paths() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/teams/7/members"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Member added"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/teams/7/members/4"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Member removed"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.add_team_member(7, 4).await.unwrap();
    client.remove_team_member(7, 4).await.unwrap();
}
