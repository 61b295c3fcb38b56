use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::db::posts::list_published;
use crate::error::AppResult;
use crate::gate::PUBLIC;
use crate::routes::admit;
use crate::routes::views::{Nav, PostCard};
use crate::session::Session;
use crate::state::AppState;

const FEED_LIMIT: u32 = 50;

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub posts: Vec<PostCard>,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// Feed of the latest published stories.
pub async fn index(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    if let Err(nav) = admit(&session, &PUBLIC) {
        return Ok(nav);
    }

    let posts = {
        let conn = state.db.get()?;
        list_published(&conn, FEED_LIMIT)?
    };

    Ok(Html(HomeTemplate {
        nav: Nav::from_session(&session),
        posts: posts.into_iter().map(PostCard::new).collect(),
    })
    .into_response())
}
