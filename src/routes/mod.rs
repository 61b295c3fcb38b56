pub mod assets;
pub mod auth;
pub mod graphql;
pub mod home;
pub mod posts;
pub mod profiles;
pub mod views;

use askama::Template;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::gate::{self, Decision, ViewAccess};
use crate::paths;
use crate::routes::home::Html;
use crate::routes::views::Nav;
use crate::session::Session;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/pending.html")]
pub struct PendingTemplate {
    pub nav: Nav,
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(paths::HOME, get(home::index))
        .route(paths::ASSET_ROUTE, get(assets::serve))
        .merge(auth::router())
        .merge(posts::router())
        .merge(profiles::router())
        .merge(graphql::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the access gate for a view. `Err` carries the response to send
/// instead of rendering.
pub fn admit(session: &Session, view: &ViewAccess) -> Result<(), Response> {
    match gate::decide(session, view) {
        Decision::Render => Ok(()),
        Decision::RedirectTo(path) => {
            tracing::debug!(path, "Access gate redirect");
            Err(Redirect::to(path).into_response())
        }
        Decision::Pending => Err(pending_response()),
    }
}

fn pending_response() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        [(header::RETRY_AFTER, "1")],
        Html(PendingTemplate {
            nav: Nav::default(),
        }),
    )
        .into_response()
}
