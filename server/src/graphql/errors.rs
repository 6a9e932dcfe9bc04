use async_graphql::{Error, ErrorExtensions};

use crate::github::GithubError;
use crate::repository::AggregationError;

pub fn bad_user_input(message: impl Into<String>) -> Error {
    Error::new(message.into()).extend_with(|_, e| e.set("code", "BAD_USER_INPUT"))
}

pub fn upstream_error(err: GithubError) -> Error {
    tracing::warn!(code = err.code(), "GitHub request failed: {}", err);
    coded(err.to_string(), err.code())
}

pub fn aggregation_error(err: AggregationError) -> Error {
    tracing::warn!(code = err.code(), "repository details failed: {}", err);
    coded(err.to_string(), err.code())
}

fn coded(message: String, code: &'static str) -> Error {
    Error::new(message).extend_with(|_, e| e.set("code", code))
}
