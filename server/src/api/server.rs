use std::net::SocketAddr;

use anyhow::{Context, Result};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use super::playground::graphql_playground;
use crate::graphql::AppSchema;

pub async fn graphql_handler(
    State(schema): State<AppSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

pub async fn graphql_options() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn health() -> &'static str {
    "ok"
}

pub fn build_api_router(schema: AppSchema) -> Router {
    Router::new()
        .route("/", get(graphql_playground))
        .route("/health", get(health))
        .route("/graphql", post(graphql_handler).options(graphql_options))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([Method::POST, Method::OPTIONS]),
        )
        .with_state(schema)
}

pub async fn run_api(schema: AppSchema, port: u16, shutdown: CancellationToken) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", addr))?;

    tracing::info!("GraphQL API listening on http://{}", addr);

    axum::serve(listener, build_api_router(schema))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    Ok(())
}
