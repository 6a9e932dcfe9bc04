pub mod models;
pub mod queries;
pub mod resolver;
pub mod tree;

pub use models::{
    RepositoryDetails, RepositorySummary, RepositoryTree, TreeEntry, TreeEntryKind, Visibility,
};
pub use resolver::{AggregationError, RepositoryAggregator};
