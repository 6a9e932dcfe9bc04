use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const DEFAULT_GRAPHQL_ENDPOINT: &str = "http://localhost:4000/graphql";

#[derive(Parser)]
#[command(name = "repo-lens")]
#[command(about = "Query a running repo-lens server for GitHub repository details", long_about = None)]
struct Cli {
    /// GraphQL API endpoint URL
    #[arg(long, default_value = DEFAULT_GRAPHQL_ENDPOINT)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List repositories owned by the authenticated GitHub user
    Repos,
    /// Show details for one or more repositories
    Details {
        /// Repository names
        #[arg(required = true)]
        names: Vec<String>,
        /// Extension of the file whose content should be returned (e.g. "ts")
        #[arg(long)]
        file_type: String,
        /// Owner whose webhooks are listed
        #[arg(long)]
        owner: String,
    },
}

#[derive(Serialize)]
struct GraphQLRequest {
    query: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Value>,
}

#[derive(Deserialize, Debug)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct GraphQLResponse<T> {
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

#[derive(Deserialize, Debug)]
struct GraphQLError {
    message: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ListRepositoriesResponse {
    list_repositories: Vec<RepositorySummary>,
}

#[derive(Deserialize, Debug)]
struct RepositorySummary {
    name: String,
    owner: String,
    size: i64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct DetailsResponse {
    fetch_repositories_details: Vec<RepositoryDetails>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RepositoryDetails {
    name: String,
    owner: String,
    size: i64,
    visibility: String,
    number_of_files: u64,
    file_content: Option<String>,
    active_webhooks: Vec<WebhookNode>,
}

#[derive(Deserialize, Debug)]
struct WebhookNode {
    id: u64,
    active: Option<bool>,
    events: Vec<String>,
    config: Option<WebhookConfigNode>,
}

#[derive(Deserialize, Debug)]
struct WebhookConfigNode {
    url: Option<String>,
}

const LIST_REPOSITORIES: &str = r#"
    query ListRepositories {
        listRepositories {
            name
            owner
            size
        }
    }
"#;

const FETCH_DETAILS: &str = r#"
    query FetchRepositoriesDetails($repoNames: [String!]!, $fileType: String!, $owner: String!) {
        fetchRepositoriesDetails(repoNames: $repoNames, fileType: $fileType, owner: $owner) {
            name
            owner
            size
            visibility
            numberOfFiles
            fileContent
            activeWebhooks {
                id
                active
                events
                config {
                    url
                }
            }
        }
    }
"#;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Repos => list_repositories(&cli.api_url).await?,
        Commands::Details {
            names,
            file_type,
            owner,
        } => fetch_details(&cli.api_url, names, file_type, owner).await?,
    }

    Ok(())
}

async fn list_repositories(api_url: &str) -> Result<()> {
    let data: ListRepositoriesResponse = execute(
        api_url,
        GraphQLRequest {
            query: LIST_REPOSITORIES,
            variables: None,
        },
    )
    .await?;

    if data.list_repositories.is_empty() {
        println!("No repositories found.");
        return Ok(());
    }

    for repo in data.list_repositories {
        println!("{}/{}  ({} KB)", repo.owner, repo.name, repo.size);
    }

    Ok(())
}

async fn fetch_details(
    api_url: &str,
    repo_names: Vec<String>,
    file_type: String,
    owner: String,
) -> Result<()> {
    let data: DetailsResponse =
        execute(api_url, details_request(repo_names, file_type, owner)).await?;

    for repo in data.fetch_repositories_details {
        println!("{}/{}", repo.owner, repo.name);
        println!("  Visibility: {}", repo.visibility);
        println!("  Size:       {} KB", repo.size);
        println!("  Files:      {}", repo.number_of_files);
        println!("  Webhooks:   {}", repo.active_webhooks.len());
        for hook in &repo.active_webhooks {
            let url = hook
                .config
                .as_ref()
                .and_then(|config| config.url.as_deref())
                .unwrap_or("-");
            let state = if hook.active.unwrap_or(false) {
                "active"
            } else {
                "inactive"
            };
            println!(
                "    #{} {} [{}] {}",
                hook.id,
                url,
                state,
                hook.events.join(",")
            );
        }
        match repo.file_content {
            Some(content) => {
                println!("  Content:");
                for line in content.lines() {
                    println!("    {}", line);
                }
            }
            None => println!("  Content:    (none)"),
        }
    }

    Ok(())
}

fn details_request(repo_names: Vec<String>, file_type: String, owner: String) -> GraphQLRequest {
    GraphQLRequest {
        query: FETCH_DETAILS,
        variables: Some(json!({
            "repoNames": repo_names,
            "fileType": file_type,
            "owner": owner,
        })),
    }
}

async fn execute<T: DeserializeOwned>(api_url: &str, request: GraphQLRequest) -> Result<T> {
    let client = reqwest::Client::new();
    let response = client
        .post(api_url)
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await
        .context("Failed to send request to GraphQL API")?;

    if !response.status().is_success() {
        return Err(anyhow::anyhow!(
            "GraphQL request failed with status: {}",
            response.status()
        ));
    }

    let graphql_response: GraphQLResponse<T> = response
        .json()
        .await
        .context("Failed to parse GraphQL response")?;

    if !graphql_response.errors.is_empty() {
        let error_messages: Vec<String> = graphql_response
            .errors
            .iter()
            .map(|e| e.message.clone())
            .collect();
        return Err(anyhow::anyhow!(
            "GraphQL errors: {}",
            error_messages.join(", ")
        ));
    }

    graphql_response
        .data
        .context("No data returned from GraphQL")
}
