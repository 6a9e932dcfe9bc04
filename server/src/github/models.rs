use async_graphql::SimpleObject;
use serde::{Deserialize, Deserializer, Serialize};

use crate::repository::models::{
    RepositorySummary, RepositoryTree, TreeEntry, TreeEntryKind, Visibility,
};

use super::error::GithubError;

/// Repository webhook as listed by `GET /repos/{owner}/{repo}/hooks`.
///
/// Only `id` is required. Entries without it are rejected rather than passed
/// through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct Webhook {
    pub id: u64,
    #[serde(rename = "type", default)]
    #[graphql(name = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub config: Option<WebhookConfig>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub test_url: Option<String>,
    #[serde(default)]
    pub ping_url: Option<String>,
    #[serde(default)]
    pub deliveries_url: Option<String>,
    #[serde(default)]
    pub last_response: Option<WebhookLastResponse>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct WebhookConfig {
    #[serde(default)]
    pub content_type: Option<String>,
    // GitHub documents a string ("0"/"1") but older hooks report a number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub insecure_ssl: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, SimpleObject)]
pub struct WebhookLastResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

#[derive(Serialize)]
pub(crate) struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorMessage>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GraphQlErrorMessage {
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Viewer<T> {
    pub viewer: T,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ViewerRepository<T> {
    pub repository: Option<T>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ViewerRepositories {
    pub repositories: RepositoryConnection,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RepositoryConnection {
    #[serde(default)]
    pub nodes: Vec<Option<RepositoryNode>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepositoryNode {
    pub name: String,
    #[serde(default)]
    pub disk_usage: Option<i64>,
    pub owner: Owner,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Owner {
    pub login: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepositoryTreeNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub disk_usage: Option<i64>,
    pub visibility: Visibility,
    pub owner: Owner,
    pub object: Option<TreeObject>,
}

/// A git object; `entries` is only present when it resolved to a tree.
#[derive(Deserialize, Debug)]
pub(crate) struct TreeObject {
    #[serde(default)]
    pub entries: Option<Vec<TreeEntryNode>>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct TreeEntryNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub object: Option<TreeObject>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct BlobRepositoryNode {
    pub object: Option<BlobObject>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct BlobObject {
    #[serde(default)]
    pub text: Option<String>,
}

impl From<RepositoryNode> for RepositorySummary {
    fn from(node: RepositoryNode) -> Self {
        RepositorySummary {
            name: node.name,
            owner: node.owner.login,
            size: node.disk_usage.unwrap_or_default(),
        }
    }
}

impl TreeEntryNode {
    fn into_entry(self, parent: Option<&str>) -> TreeEntry {
        let path = self.path.unwrap_or_else(|| match parent {
            Some(parent) => format!("{}/{}", parent, self.name),
            None => self.name.clone(),
        });

        let children = match self.kind {
            TreeEntryKind::Directory => self
                .object
                .and_then(|object| object.entries)
                .map(|entries| {
                    entries
                        .into_iter()
                        .map(|entry| entry.into_entry(Some(&path)))
                        .collect()
                }),
            TreeEntryKind::File => None,
        };

        TreeEntry {
            name: self.name,
            kind: self.kind,
            path,
            children,
        }
    }
}

impl TryFrom<RepositoryTreeNode> for RepositoryTree {
    type Error = GithubError;

    fn try_from(node: RepositoryTreeNode) -> Result<Self, Self::Error> {
        let object = node.object.ok_or_else(|| {
            GithubError::malformed(format!(
                "repository `{}` has no tree on the configured branch",
                node.name
            ))
        })?;

        let entries = object
            .entries
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.into_entry(None))
            .collect();

        Ok(RepositoryTree {
            id: node.id,
            name: node.name,
            owner: node.owner.login,
            size: node.disk_usage.unwrap_or_default(),
            visibility: node.visibility,
            entries,
        })
    }
}
