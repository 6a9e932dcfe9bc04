//! Runs the schema with the real GitHub client against a mocked GitHub.

use std::sync::Arc;

use anyhow::Result;
use async_graphql::Request;
use serde_json::{Value, json};
use server::config::GithubSettings;
use server::github::GithubClient;
use server::graphql::{AppSchema, build_schema};
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn schema_for(github: &MockServer) -> Result<AppSchema> {
    let settings = GithubSettings {
        graphql_url: format!("{}/graphql", github.uri()),
        rest_url: github.uri(),
        ..GithubSettings::default()
    };
    let client = GithubClient::new(settings, "e2e-token")?;
    Ok(build_schema(Arc::new(client)))
}

async fn mount_tree(github: &MockServer, name: &str) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("RepositoryTree"))
        .and(body_partial_json(json!({ "variables": { "name": name } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "viewer": {
                    "repository": {
                        "id": format!("R_{name}"),
                        "name": name,
                        "diskUsage": 42,
                        "visibility": "PUBLIC",
                        "owner": { "login": "octocat" },
                        "object": {
                            "entries": [
                                { "name": "README.md", "type": "blob", "path": "README.md" },
                                {
                                    "name": "src",
                                    "type": "tree",
                                    "path": "src",
                                    "object": {
                                        "entries": [
                                            { "name": "main.rs", "type": "blob", "path": "src/main.rs" },
                                            { "name": "bin", "type": "tree", "path": "src/bin" }
                                        ]
                                    }
                                }
                            ]
                        }
                    }
                }
            }
        })))
        .mount(github)
        .await;
}

#[tokio::test]
async fn details_flow_through_every_upstream_call() -> Result<()> {
    let github = MockServer::start().await;
    mount_tree(&github, "demo").await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("FileContent"))
        .and(body_partial_json(json!({
            "variables": { "name": "demo", "expression": "main:src/main.rs" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "viewer": { "repository": { "object": { "text": "fn main() {}\n" } } } }
        })))
        .expect(1)
        .mount(&github)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/someone-else/demo/hooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 7,
                "type": "Repository",
                "name": "web",
                "active": false,
                "events": ["push", "pull_request"],
                "config": { "content_type": "form", "insecure_ssl": 1, "url": "https://ci.example.com" }
            }
        ])))
        .expect(1)
        .mount(&github)
        .await;

    let schema = schema_for(&github)?;
    let response = schema
        .execute(Request::new(
            r#"{
                fetchRepositoriesDetails(repoNames: ["demo"], fileType: "rs", owner: "someone-else") {
                    name owner size visibility numberOfFiles fileContent
                    activeWebhooks { id active events config { contentType insecureSsl url } }
                }
            }"#,
        ))
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(
        response.data.into_json()?,
        json!({
            "fetchRepositoriesDetails": [{
                "name": "demo",
                "owner": "octocat",
                "size": 42,
                "visibility": "PUBLIC",
                "numberOfFiles": 2,
                "fileContent": "fn main() {}\n",
                "activeWebhooks": [{
                    "id": 7,
                    "active": false,
                    "events": ["push", "pull_request"],
                    "config": {
                        "contentType": "form",
                        "insecureSsl": "1",
                        "url": "https://ci.example.com"
                    }
                }]
            }]
        })
    );
    Ok(())
}

#[tokio::test]
async fn upstream_status_surfaces_as_response_error() -> Result<()> {
    let github = MockServer::start().await;
    mount_tree(&github, "demo").await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("FileContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "viewer": { "repository": { "object": null } } }
        })))
        .mount(&github)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octocat/demo/hooks"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
        )
        .mount(&github)
        .await;

    let schema = schema_for(&github)?;
    let response = schema
        .execute(Request::new(
            r#"{ fetchRepositoriesDetails(repoNames: ["demo"], fileType: "rs", owner: "octocat") { name } }"#,
        ))
        .await;

    assert_eq!(response.errors.len(), 1);
    let error = serde_json::to_value(&response.errors[0])?;
    assert_eq!(error["extensions"]["code"], "UPSTREAM_RESPONSE");
    assert!(
        error["message"]
            .as_str()
            .is_some_and(|message| message.contains("Not Found"))
    );
    assert_eq!(response.data.into_json()?, Value::Null);
    Ok(())
}
