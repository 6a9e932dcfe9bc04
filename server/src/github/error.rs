//! Errors surfaced while talking to GitHub.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GithubError {
    /// The request never produced a response (DNS, TLS, connect, timeout).
    #[error("network error talking to GitHub: {0}")]
    Transport(#[source] reqwest::Error),

    /// GitHub answered with a non-success status.
    #[error("GitHub returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// The GraphQL endpoint answered 200 but carried an `errors` payload.
    #[error("GitHub GraphQL errors: {}", messages.join(", "))]
    GraphQl { messages: Vec<String> },

    /// The body did not have the shape we expect.
    #[error("malformed GitHub response: {message}")]
    MalformedData { message: String },
}

impl GithubError {
    pub fn malformed(message: impl Into<String>) -> Self {
        GithubError::MalformedData {
            message: message.into(),
        }
    }

    /// Stable code exposed to API callers in GraphQL error extensions.
    pub fn code(&self) -> &'static str {
        match self {
            GithubError::Transport(_) => "UPSTREAM_TRANSPORT",
            GithubError::Status { .. } | GithubError::GraphQl { .. } => "UPSTREAM_RESPONSE",
            GithubError::MalformedData { .. } => "MALFORMED_DATA",
        }
    }
}
