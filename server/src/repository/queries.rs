use async_graphql::Context;

use super::models::{RepositoryDetails, RepositorySummary};
use super::resolver::RepositoryAggregator;
use crate::graphql::errors::{aggregation_error, bad_user_input, upstream_error};

pub async fn list_repositories(
    ctx: &Context<'_>,
) -> async_graphql::Result<Vec<RepositorySummary>> {
    let aggregator = ctx.data::<RepositoryAggregator>()?;
    aggregator.list_repositories().await.map_err(upstream_error)
}

pub async fn fetch_repositories_details(
    ctx: &Context<'_>,
    repo_names: Vec<String>,
    file_type: String,
    owner: String,
) -> async_graphql::Result<Vec<RepositoryDetails>> {
    if repo_names.is_empty() {
        return Ok(Vec::new());
    }

    if owner.trim().is_empty() {
        return Err(bad_user_input("owner cannot be empty"));
    }

    if repo_names.iter().any(|name| name.trim().is_empty()) {
        return Err(bad_user_input("repository names cannot be empty"));
    }

    let aggregator = ctx.data::<RepositoryAggregator>()?;
    aggregator
        .repositories_details(repo_names, &file_type, &owner)
        .await
        .map_err(aggregation_error)
}
