use std::sync::Arc;

use anyhow::{Context, Result};
use server::api::run_api;
use server::config::loader;
use server::github::GithubClient;
use server::graphql::build_schema;
use server::supervisor::Supervisor;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = loader::load_with_discovery().context("failed to load configuration")?;
    let config = loader::apply_env_overrides(config)?;

    let github = GithubClient::from_settings(&config.github)?;
    tracing::info!(
        graphql_url = %github.settings().graphql_url,
        branch = %github.settings().branch,
        "GitHub client ready"
    );

    let schema = build_schema(Arc::new(github));
    let port = config.server.port;

    let mut supervisor = Supervisor::new();
    supervisor.spawn("api", move |shutdown| run_api(schema, port, shutdown));
    supervisor.run().await
}
