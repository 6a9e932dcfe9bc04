use async_graphql::http::GraphiQLSource;
use axum::response::Html;

pub async fn graphql_playground() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").title("repo-lens").finish())
}
