//! GitHub upstream access
//!
//! Everything that crosses the network lives behind [`GithubApi`]. The
//! aggregation layer only sees this trait, which keeps it testable with an
//! in-memory stub.

pub mod client;
pub mod error;
pub mod models;
pub mod queries;

#[cfg(test)]
mod client_tests;

use async_trait::async_trait;

use crate::repository::models::{RepositorySummary, RepositoryTree};

pub use client::GithubClient;
pub use error::GithubError;
pub use models::{Webhook, WebhookConfig, WebhookLastResponse};

#[async_trait]
pub trait GithubApi: Send + Sync {
    /// First page of repositories owned by the viewer.
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, GithubError>;

    /// Metadata plus the root tree, with directories expanded one level.
    async fn fetch_tree(&self, repo_name: &str) -> Result<RepositoryTree, GithubError>;

    /// Text of the blob at `path`, `None` when it does not resolve to a blob.
    async fn fetch_file_content(
        &self,
        repo_name: &str,
        path: &str,
    ) -> Result<Option<String>, GithubError>;

    async fn fetch_active_webhooks(
        &self,
        owner: &str,
        repo_name: &str,
    ) -> Result<Vec<Webhook>, GithubError>;
}
