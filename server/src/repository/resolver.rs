//! Per-repository aggregation.
//!
//! A details record is assembled from three upstream calls and one local
//! tree walk. Several repositories are assembled concurrently, and their
//! results are harvested two at a time in request order.

use std::sync::Arc;

use futures::future;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};

use super::models::{RepositoryDetails, RepositorySummary};
use super::tree::{count_files, find_first_path_of_type};
use crate::github::{GithubApi, GithubError};

/// Number of spawned chains awaited together.
const HARVEST_WIDTH: usize = 2;

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("failed to fetch details for `{repository}`: {source}")]
    Upstream {
        repository: String,
        #[source]
        source: GithubError,
    },

    #[error("repository details task failed: {0}")]
    Task(#[from] JoinError),
}

impl AggregationError {
    pub fn code(&self) -> &'static str {
        match self {
            AggregationError::Upstream { source, .. } => source.code(),
            AggregationError::Task(_) => "INTERNAL",
        }
    }
}

type DetailsTask = JoinHandle<Result<RepositoryDetails, AggregationError>>;

#[derive(Clone)]
pub struct RepositoryAggregator {
    github: Arc<dyn GithubApi>,
}

impl RepositoryAggregator {
    pub fn new(github: Arc<dyn GithubApi>) -> Self {
        Self { github }
    }

    pub async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, GithubError> {
        self.github.list_repositories().await
    }

    /// Assemble one record. `owner` is only used for the webhooks call; the
    /// owner reported in the record comes from the tree fetch.
    pub async fn repository_details(
        &self,
        repo_name: &str,
        file_type: &str,
        owner: &str,
    ) -> Result<RepositoryDetails, AggregationError> {
        assemble(self.github.as_ref(), repo_name, file_type, owner)
            .await
            .map_err(|source| AggregationError::Upstream {
                repository: repo_name.to_string(),
                source,
            })
    }

    /// Assemble records for every name, preserving input order.
    ///
    /// All chains are started before any is awaited. The first failure in
    /// harvest order fails the whole call; chains already running are left
    /// to finish on their own.
    pub async fn repositories_details(
        &self,
        repo_names: Vec<String>,
        file_type: &str,
        owner: &str,
    ) -> Result<Vec<RepositoryDetails>, AggregationError> {
        if repo_names.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!(
            count = repo_names.len(),
            file_type,
            owner,
            "fetching repository details"
        );

        let tasks: Vec<DetailsTask> = repo_names
            .into_iter()
            .map(|repo_name| {
                let aggregator = self.clone();
                let file_type = file_type.to_string();
                let owner = owner.to_string();
                tokio::spawn(async move {
                    aggregator
                        .repository_details(&repo_name, &file_type, &owner)
                        .await
                })
            })
            .collect();

        let mut details = Vec::with_capacity(tasks.len());
        let mut tasks = tasks.into_iter().peekable();

        while tasks.peek().is_some() {
            let batch: Vec<DetailsTask> = tasks.by_ref().take(HARVEST_WIDTH).collect();
            let harvested = future::try_join_all(batch.into_iter().map(join_task)).await?;
            details.extend(harvested);
        }

        Ok(details)
    }
}

async fn join_task(task: DetailsTask) -> Result<RepositoryDetails, AggregationError> {
    task.await?
}

async fn assemble(
    github: &dyn GithubApi,
    repo_name: &str,
    file_type: &str,
    owner: &str,
) -> Result<RepositoryDetails, GithubError> {
    let tree = github.fetch_tree(repo_name).await?;

    let number_of_files = count_files(&tree.entries);
    // No match still issues the content call, against the branch root.
    let file_path = find_first_path_of_type(&tree.entries, file_type)
        .unwrap_or_default()
        .to_string();

    if tree.owner != owner {
        tracing::debug!(
            repository = repo_name,
            tree_owner = %tree.owner,
            owner,
            "webhooks requested for a different owner than the tree reports"
        );
    }

    let active_webhooks = github.fetch_active_webhooks(owner, repo_name).await?;
    let file_content = github.fetch_file_content(repo_name, &file_path).await?;

    Ok(RepositoryDetails {
        name: tree.name,
        size: tree.size,
        owner: tree.owner,
        visibility: tree.visibility,
        number_of_files,
        file_content,
        active_webhooks,
    })
}
