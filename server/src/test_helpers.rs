//! In-memory GitHub stand-in for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::github::{GithubApi, GithubError, Webhook};
use crate::repository::models::{
    RepositorySummary, RepositoryTree, TreeEntry, Visibility,
};

/// One upstream call observed by [`StubGithub`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubCall {
    ListRepositories,
    FetchTree(String),
    FetchFileContent { repo: String, path: String },
    FetchActiveWebhooks { owner: String, repo: String },
}

/// Serves canned responses and records every call it receives.
#[derive(Default)]
pub struct StubGithub {
    repositories: Vec<RepositorySummary>,
    trees: HashMap<String, RepositoryTree>,
    files: HashMap<(String, String), String>,
    webhooks: HashMap<(String, String), Vec<Webhook>>,
    failing_trees: HashSet<String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<StubCall>>,
}

impl StubGithub {
    pub fn with_repository(mut self, name: &str, owner: &str, size: i64) -> Self {
        self.repositories.push(RepositorySummary {
            name: name.to_string(),
            owner: owner.to_string(),
            size,
        });
        self
    }

    pub fn with_tree(mut self, tree: RepositoryTree) -> Self {
        self.trees.insert(tree.name.clone(), tree);
        self
    }

    pub fn with_file(mut self, repo: &str, path: &str, content: &str) -> Self {
        self.files
            .insert((repo.to_string(), path.to_string()), content.to_string());
        self
    }

    pub fn with_webhooks(mut self, owner: &str, repo: &str, hooks: Vec<Webhook>) -> Self {
        self.webhooks
            .insert((owner.to_string(), repo.to_string()), hooks);
        self
    }

    /// Make the tree fetch for `repo` fail like GitHub does for an unknown name.
    pub fn failing_tree(mut self, repo: &str) -> Self {
        self.failing_trees.insert(repo.to_string());
        self
    }

    /// Delay the tree fetch for `repo`.
    pub fn with_delay(mut self, repo: &str, delay: Duration) -> Self {
        self.delays.insert(repo.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<StubCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, call: StubCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }
}

#[async_trait]
impl GithubApi for StubGithub {
    async fn list_repositories(&self) -> Result<Vec<RepositorySummary>, GithubError> {
        self.record(StubCall::ListRepositories);
        Ok(self.repositories.clone())
    }

    async fn fetch_tree(&self, repo_name: &str) -> Result<RepositoryTree, GithubError> {
        self.record(StubCall::FetchTree(repo_name.to_string()));

        if let Some(delay) = self.delays.get(repo_name) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing_trees.contains(repo_name) {
            return Err(GithubError::GraphQl {
                messages: vec![format!(
                    "Could not resolve to a Repository with the name '{}'.",
                    repo_name
                )],
            });
        }

        self.trees.get(repo_name).cloned().ok_or_else(|| {
            GithubError::malformed(format!("repository `{}` was not returned", repo_name))
        })
    }

    async fn fetch_file_content(
        &self,
        repo_name: &str,
        path: &str,
    ) -> Result<Option<String>, GithubError> {
        self.record(StubCall::FetchFileContent {
            repo: repo_name.to_string(),
            path: path.to_string(),
        });

        Ok(self
            .files
            .get(&(repo_name.to_string(), path.to_string()))
            .cloned())
    }

    async fn fetch_active_webhooks(
        &self,
        owner: &str,
        repo_name: &str,
    ) -> Result<Vec<Webhook>, GithubError> {
        self.record(StubCall::FetchActiveWebhooks {
            owner: owner.to_string(),
            repo: repo_name.to_string(),
        });

        Ok(self
            .webhooks
            .get(&(owner.to_string(), repo_name.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// A private repository with four visible files; the first `ts` file is
/// `src/index.ts`.
pub fn sample_tree(name: &str, owner: &str) -> RepositoryTree {
    RepositoryTree {
        id: format!("R_{}", name),
        name: name.to_string(),
        owner: owner.to_string(),
        size: 128,
        visibility: Visibility::Private,
        entries: vec![
            TreeEntry::file("package.json", "package.json"),
            TreeEntry::directory(
                "src",
                "src",
                Some(vec![
                    TreeEntry::file("index.ts", "src/index.ts"),
                    TreeEntry::file("app.ts", "src/app.ts"),
                    TreeEntry::directory("components", "src/components", None),
                ]),
            ),
            TreeEntry::file("tsconfig.json", "tsconfig.json"),
        ],
    }
}

pub fn webhook(id: u64, target: &str) -> Webhook {
    Webhook {
        id,
        kind: Some("Repository".to_string()),
        name: Some("web".to_string()),
        active: Some(true),
        events: vec!["push".to_string()],
        config: Some(crate::github::WebhookConfig {
            content_type: Some("json".to_string()),
            insecure_ssl: Some("0".to_string()),
            url: Some(target.to_string()),
        }),
        created_at: None,
        updated_at: None,
        url: None,
        test_url: None,
        ping_url: None,
        deliveries_url: None,
        last_response: None,
    }
}
