//! repo-lens GraphQL Server Library

pub mod api;
pub mod config;
pub mod github;
pub mod graphql;
pub mod repository;
pub mod supervisor;

pub mod test_helpers;
