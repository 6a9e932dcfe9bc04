use async_graphql::{Enum, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::github::Webhook;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
pub struct RepositorySummary {
    pub name: String,
    pub owner: String,
    /// Disk usage in kilobytes as reported by GitHub.
    pub size: i64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Enum, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    Private,
    Internal,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TreeEntryKind {
    #[serde(rename = "blob")]
    File,
    // Submodules (`commit`) are listed like directories that were never expanded.
    #[serde(rename = "tree", alias = "commit")]
    Directory,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub name: String,
    pub kind: TreeEntryKind,
    pub path: String,
    /// Only set for directories GitHub expanded in the same response.
    pub children: Option<Vec<TreeEntry>>,
}

impl TreeEntry {
    pub fn file(name: &str, path: &str) -> Self {
        TreeEntry {
            name: name.to_string(),
            kind: TreeEntryKind::File,
            path: path.to_string(),
            children: None,
        }
    }

    pub fn directory(name: &str, path: &str, children: Option<Vec<TreeEntry>>) -> Self {
        TreeEntry {
            name: name.to_string(),
            kind: TreeEntryKind::Directory,
            path: path.to_string(),
            children,
        }
    }
}

/// Metadata and shallow root tree of one repository on the configured branch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RepositoryTree {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub size: i64,
    pub visibility: Visibility,
    pub entries: Vec<TreeEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, SimpleObject)]
pub struct RepositoryDetails {
    pub name: String,
    pub size: i64,
    pub owner: String,
    pub visibility: Visibility,
    pub number_of_files: usize,
    pub file_content: Option<String>,
    pub active_webhooks: Vec<Webhook>,
}
