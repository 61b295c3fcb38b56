use async_graphql::http::GraphiQLSource;
use axum::extract::State;
use axum::response::{Html, Json};
use axum::routing::{get, post};
use axum::Router;

use crate::paths;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::GRAPHQL, post(execute))
        .route(paths::GRAPHQL_PLAYGROUND, get(playground))
}

/// Anyone may query; the schema has no mutations and never exposes drafts.
async fn execute(
    State(state): State<AppState>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let request = request.data(state.db.clone());
    let response = state.graphql_schema.execute(request).await;
    if response.is_err() {
        tracing::debug!(errors = ?response.errors, "GraphQL query failed");
    }
    Json(response)
}

async fn playground() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(paths::GRAPHQL).finish())
}
