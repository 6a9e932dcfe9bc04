use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::GithubApi;
use super::error::GithubError;
use super::models::{
    BlobRepositoryNode, GraphQlRequest, GraphQlResponse, RepositoryTreeNode, Viewer,
    ViewerRepositories, ViewerRepository, Webhook,
};
use super::queries;
use crate::config::GithubSettings;
use crate::repository::models::{RepositorySummary, RepositoryTree};

const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub client backed by reqwest.
///
/// One instance is shared by every request; it holds no mutable state.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    settings: GithubSettings,
}

impl GithubClient {
    /// Build a client for the given settings, resolving the token from the
    /// environment variable the settings name.
    pub fn from_settings(settings: &GithubSettings) -> Result<Self> {
        let token = settings.resolve_token().with_context(|| {
            format!(
                "{} environment variable must be set to a GitHub token",
                settings.token_env
            )
        })?;

        Self::new(settings.clone(), &token)
    }

    pub fn new(settings: GithubSettings, token: &str) -> Result<Self> {
        settings
            .validate()
            .map_err(|err| anyhow::anyhow!("invalid GitHub settings: {}", err))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("GitHub token contains characters not allowed in a header")?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_str(&settings.user_agent).context("invalid user agent")?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &GithubSettings {
        &self.settings
    }

    fn expression(&self, path: &str) -> String {
        format!("{}:{}", self.settings.branch, path)
    }

    fn hooks_url(&self, owner: &str, repo_name: &str) -> Result<Url, GithubError> {
        let mut url = Url::parse(&self.settings.rest_url).map_err(|err| {
            GithubError::malformed(format!(
                "rest_url `{}` is not a valid URL: {}",
                self.settings.rest_url, err
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                GithubError::malformed(format!(
                    "rest_url `{}` cannot be used as a base URL",
                    self.settings.rest_url
                ))
            })?
            .pop_if_empty()
            .extend(["repos", owner, repo_name, "hooks"]);

        Ok(url)
    }

    async fn graphql<V, T>(
        &self,
        operation: &'static str,
        query: &str,
        variables: V,
    ) -> Result<T, GithubError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let start = Instant::now();
        let result = self.post_graphql(query, variables).await;
        record_request(operation, start, result.is_ok());
        result
    }

    async fn post_graphql<V, T>(&self, query: &str, variables: V) -> Result<T, GithubError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(&self.settings.graphql_url)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await
            .map_err(GithubError::Transport)?;

        let body: GraphQlResponse<T> = read_json(response).await?;

        if !body.errors.is_empty() {
            return Err(GithubError::GraphQl {
                messages: body.errors.into_iter().map(|e| e.message).collect(),
            });
        }

        body.data
            .ok_or_else(|| GithubError::malformed("GraphQL response carried no data"))
    }

    async fn get_rest<T: DeserializeOwned>(&self, url: Url) -> Result<T, GithubError> {
        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await
            .map_err(GithubError::Transport)?;

        read_json(response).await
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, GithubError> {
        tracing::debug!(page_size = self.settings.page_size, "listing viewer repositories");

        let data: Viewer<ViewerRepositories> = self
            .graphql(
                "list_repositories",
                queries::VIEWER_REPOSITORIES,
                json!({ "first": self.settings.page_size }),
            )
            .await?;

        Ok(data
            .viewer
            .repositories
            .nodes
            .into_iter()
            .flatten()
            .take(self.settings.page_size as usize)
            .map(RepositorySummary::from)
            .collect())
    }

    async fn fetch_tree(&self, repo_name: &str) -> Result<RepositoryTree, GithubError> {
        tracing::debug!(repository = repo_name, "fetching repository tree");

        let data: Viewer<ViewerRepository<RepositoryTreeNode>> = self
            .graphql(
                "fetch_tree",
                queries::REPOSITORY_TREE,
                json!({ "name": repo_name, "expression": self.expression("") }),
            )
            .await?;

        let repository = data.viewer.repository.ok_or_else(|| {
            GithubError::malformed(format!("repository `{}` was not returned", repo_name))
        })?;

        RepositoryTree::try_from(repository)
    }

    async fn fetch_file_content(
        &self,
        repo_name: &str,
        path: &str,
    ) -> Result<Option<String>, GithubError> {
        tracing::debug!(repository = repo_name, path, "fetching file content");

        let data: Viewer<ViewerRepository<BlobRepositoryNode>> = self
            .graphql(
                "fetch_file_content",
                queries::FILE_CONTENT,
                json!({ "name": repo_name, "expression": self.expression(path) }),
            )
            .await?;

        Ok(data
            .viewer
            .repository
            .and_then(|repository| repository.object)
            .and_then(|object| object.text))
    }

    async fn fetch_active_webhooks(
        &self,
        owner: &str,
        repo_name: &str,
    ) -> Result<Vec<Webhook>, GithubError> {
        tracing::debug!(owner, repository = repo_name, "fetching webhooks");

        let url = self.hooks_url(owner, repo_name)?;
        let start = Instant::now();
        let result = self.get_rest(url).await;
        record_request("fetch_active_webhooks", start, result.is_ok());
        result
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GithubError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GithubError::Status {
            status,
            message: error_message(&body),
        });
    }

    let bytes = response.bytes().await.map_err(GithubError::Transport)?;
    serde_json::from_slice(&bytes).map_err(|err| GithubError::malformed(err.to_string()))
}

/// GitHub error bodies are `{"message": ...}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn record_request(operation: &'static str, start: Instant, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!("github.requests", "operation" => operation, "outcome" => outcome).increment(1);
    histogram!("github.request_ms", "operation" => operation)
        .record(start.elapsed().as_millis() as f64);
}
