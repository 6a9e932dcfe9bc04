use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{GithubApi, GithubClient, GithubError};
use crate::config::GithubSettings;
use crate::repository::models::{TreeEntry, Visibility};

const TOKEN: &str = "test-token";

fn settings_for(server: &MockServer) -> GithubSettings {
    GithubSettings {
        graphql_url: format!("{}/graphql", server.uri()),
        rest_url: server.uri(),
        ..GithubSettings::default()
    }
}

fn client_for(server: &MockServer) -> GithubClient {
    GithubClient::new(settings_for(server), TOKEN).unwrap()
}

fn repository_node(name: &str, owner: &str, disk_usage: i64) -> serde_json::Value {
    json!({ "name": name, "diskUsage": disk_usage, "owner": { "login": owner } })
}

#[tokio::test]
async fn test_list_repositories_sends_page_size_and_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({ "variables": { "first": 100 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "viewer": {
                    "repositories": {
                        "nodes": [
                            repository_node("alpha", "octocat", 120),
                            repository_node("beta", "octocat", 0)
                        ]
                    }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repos = client_for(&server).list_repositories().await.unwrap();

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].name, "alpha");
    assert_eq!(repos[0].owner, "octocat");
    assert_eq!(repos[0].size, 120);
    assert_eq!(repos[1].name, "beta");
}

#[tokio::test]
async fn test_list_repositories_never_exceeds_page_size() {
    let server = MockServer::start().await;

    let nodes: Vec<_> = (0..5)
        .map(|i| repository_node(&format!("repo-{i}"), "octocat", i))
        .collect();

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "first": 3 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "viewer": { "repositories": { "nodes": nodes } } }
        })))
        .mount(&server)
        .await;

    let settings = GithubSettings {
        page_size: 3,
        ..settings_for(&server)
    };
    let client = GithubClient::new(settings, TOKEN).unwrap();
    let repos = client.list_repositories().await.unwrap();

    let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["repo-0", "repo-1", "repo-2"]);
}

#[tokio::test]
async fn test_list_repositories_keeps_first_hundred_by_default() {
    let server = MockServer::start().await;

    let nodes: Vec<_> = (0..101)
        .map(|i| repository_node(&format!("r{i}"), "octocat", i))
        .collect();

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "first": 100 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "viewer": { "repositories": { "nodes": nodes } } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repos = client_for(&server).list_repositories().await.unwrap();

    assert_eq!(repos.len(), 100);
    assert_eq!(repos[0].name, "r0");
    assert_eq!(repos[99].name, "r99");
}

#[tokio::test]
async fn test_list_repositories_empty_viewer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "viewer": { "repositories": { "nodes": [] } } }
        })))
        .mount(&server)
        .await;

    let repos = client_for(&server).list_repositories().await.unwrap();
    assert!(repos.is_empty());
}

#[tokio::test]
async fn test_fetch_tree_targets_configured_branch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": { "name": "demo", "expression": "main:" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "viewer": {
                    "repository": {
                        "id": "R_kgDO",
                        "name": "demo",
                        "diskUsage": 64,
                        "visibility": "PUBLIC",
                        "owner": { "login": "octocat" },
                        "object": {
                            "entries": [
                                { "name": "index.ts", "type": "blob", "path": "index.ts", "object": {} },
                                {
                                    "name": "lib",
                                    "type": "tree",
                                    "path": "lib",
                                    "object": {
                                        "entries": [
                                            { "name": "util.ts", "type": "blob", "path": "lib/util.ts" }
                                        ]
                                    }
                                }
                            ]
                        }
                    }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tree = client_for(&server).fetch_tree("demo").await.unwrap();

    assert_eq!(tree.id, "R_kgDO");
    assert_eq!(tree.visibility, Visibility::Public);
    assert_eq!(tree.size, 64);
    assert_eq!(
        tree.entries,
        vec![
            TreeEntry::file("index.ts", "index.ts"),
            TreeEntry::directory(
                "lib",
                "lib",
                Some(vec![TreeEntry::file("util.ts", "lib/util.ts")])
            ),
        ]
    );
}

#[tokio::test]
async fn test_fetch_tree_surfaces_graphql_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "viewer": { "repository": null } },
            "errors": [
                { "type": "NOT_FOUND", "message": "Could not resolve to a Repository with the name 'octocat/missing'." }
            ]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_tree("missing").await.unwrap_err();

    match err {
        GithubError::GraphQl { messages } => {
            assert_eq!(messages.len(), 1);
            assert!(messages[0].contains("octocat/missing"));
        }
        other => panic!("expected GraphQL error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_tree_on_missing_branch_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "viewer": {
                    "repository": {
                        "id": "R_1",
                        "name": "legacy",
                        "diskUsage": 3,
                        "visibility": "PRIVATE",
                        "owner": { "login": "octocat" },
                        "object": null
                    }
                }
            }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_tree("legacy").await.unwrap_err();
    assert!(matches!(err, GithubError::MalformedData { .. }));
}

#[tokio::test]
async fn test_fetch_file_content_returns_blob_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": { "name": "demo", "expression": "main:lib/util.ts" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "viewer": {
                    "repository": { "object": { "text": "export const x = 1;\n" } }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let content = client_for(&server)
        .fetch_file_content("demo", "lib/util.ts")
        .await
        .unwrap();

    assert_eq!(content.as_deref(), Some("export const x = 1;\n"));
}

#[tokio::test]
async fn test_fetch_file_content_empty_path_resolves_to_none() {
    let server = MockServer::start().await;

    // `main:` resolves to the root tree, which does not match `... on Blob`.
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": { "name": "demo", "expression": "main:" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "viewer": { "repository": { "object": {} } } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let content = client_for(&server)
        .fetch_file_content("demo", "")
        .await
        .unwrap();

    assert_eq!(content, None);
}

#[tokio::test]
async fn test_fetch_active_webhooks_calls_hooks_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/demo/hooks"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "type": "Repository",
                "name": "web",
                "active": true,
                "events": ["push"],
                "config": { "content_type": "json", "insecure_ssl": "0", "url": "https://example.com/hook" },
                "last_response": { "code": 200, "status": "active", "message": "OK" }
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let hooks = client_for(&server)
        .fetch_active_webhooks("octocat", "demo")
        .await
        .unwrap();

    assert_eq!(hooks.len(), 1);
    assert_eq!(hooks[0].id, 1);
    assert_eq!(hooks[0].active, Some(true));
    assert_eq!(
        hooks[0].config.as_ref().and_then(|c| c.url.as_deref()),
        Some("https://example.com/hook")
    );
    assert_eq!(
        hooks[0].last_response.as_ref().and_then(|r| r.code),
        Some(200)
    );
}

#[tokio::test]
async fn test_fetch_active_webhooks_rejects_non_array_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/demo/hooks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "unexpected" })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_active_webhooks("octocat", "demo")
        .await
        .unwrap_err();

    assert_eq!(err.code(), "MALFORMED_DATA");
}

#[rstest]
#[case(401, "Bad credentials")]
#[case(404, "Not Found")]
#[tokio::test]
async fn test_fetch_active_webhooks_maps_error_status(
    #[case] status: u16,
    #[case] message: &str,
) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/demo/hooks"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "message": message,
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_active_webhooks("octocat", "demo")
        .await
        .unwrap_err();

    match err {
        GithubError::Status {
            status: got,
            message: got_message,
        } => {
            assert_eq!(got.as_u16(), status);
            assert_eq!(got_message, message);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_graphql_server_error_maps_to_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server).list_repositories().await.unwrap_err();

    match err {
        GithubError::Status { status, message } => {
            assert_eq!(status.as_u16(), 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport_error() {
    let settings = GithubSettings {
        graphql_url: "http://127.0.0.1:1/graphql".to_string(),
        rest_url: "http://127.0.0.1:1".to_string(),
        ..GithubSettings::default()
    };
    let client = GithubClient::new(settings, TOKEN).unwrap();

    let err = client.list_repositories().await.unwrap_err();
    assert_eq!(err.code(), "UPSTREAM_TRANSPORT");

    let err = client
        .fetch_active_webhooks("octocat", "demo")
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UPSTREAM_TRANSPORT");
}

#[test]
fn test_client_rejects_invalid_settings() {
    let settings = GithubSettings {
        branch: "main:sub".to_string(),
        ..GithubSettings::default()
    };
    assert!(GithubClient::new(settings, TOKEN).is_err());
}
