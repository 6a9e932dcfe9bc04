//! Configuration management for repo-lens
//!
//! Configuration is stored in RON format and covers the HTTP listener and the
//! GitHub endpoints the aggregation layer talks to. The bearer token itself is
//! never stored in the file; the file names the environment variable that
//! holds it.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration for repo-lens
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub github: GithubSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Port the GraphQL API listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Upstream GitHub settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GithubSettings {
    /// GraphQL endpoint used for repository, tree and blob queries
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,

    /// REST base URL used for the hooks listing
    #[serde(default = "default_rest_url")]
    pub rest_url: String,

    /// Environment variable name containing the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Branch every tree and blob expression is evaluated against
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Number of repositories requested by `listRepositories`
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout applied by the HTTP client
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            graphql_url: default_graphql_url(),
            rest_url: default_rest_url(),
            token_env: default_token_env(),
            branch: default_branch(),
            page_size: default_page_size(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GithubSettings {
    /// Resolve the bearer token from the configured environment variable
    pub fn resolve_token(&self) -> Option<String> {
        let raw = std::env::var(&self.token_env).ok();
        normalize_token(raw.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the settings for values the client cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.branch.is_empty() || self.branch.contains(':') {
            return Err(format!(
                "branch '{}' must be a non-empty ref name without ':'",
                self.branch
            ));
        }

        if self.page_size == 0 || self.page_size > 100 {
            return Err(format!(
                "page_size {} must be between 1 and 100",
                self.page_size
            ));
        }

        if self.token_env.is_empty() {
            return Err("token_env cannot be empty".to_string());
        }

        Ok(())
    }
}

fn normalize_token(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn default_port() -> u16 {
    4000
}

fn default_graphql_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_rest_url() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_user_agent() -> String {
    concat!("repo-lens/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
