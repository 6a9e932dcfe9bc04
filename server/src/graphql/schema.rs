use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Schema};

use crate::github::GithubApi;
use crate::repository::{RepositoryAggregator, RepositoryDetails, RepositorySummary};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// First page of repositories owned by the authenticated user.
    async fn list_repositories(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<RepositorySummary>> {
        crate::repository::queries::list_repositories(ctx).await
    }

    /// Details for each named repository, in the order requested.
    ///
    /// `owner` selects whose webhooks are listed; the owner in each result
    /// comes from the repository itself.
    async fn fetch_repositories_details(
        &self,
        ctx: &Context<'_>,
        repo_names: Vec<String>,
        file_type: String,
        owner: String,
    ) -> async_graphql::Result<Vec<RepositoryDetails>> {
        crate::repository::queries::fetch_repositories_details(ctx, repo_names, file_type, owner)
            .await
    }
}

pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(github: Arc<dyn GithubApi>) -> AppSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(RepositoryAggregator::new(github))
        .finish()
}
