use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use chrono::Utc;

use crate::db::models::PostStatus;
use crate::db::posts::{find_post, increment_likes, increment_views, insert_post};
use crate::error::{AppError, AppResult};
use crate::gate::{PUBLIC, SIGNED_IN, WRITE_VIEW};
use crate::paths;
use crate::posts::PostForm;
use crate::routes::admit;
use crate::routes::home::Html;
use crate::routes::views::{Nav, PostView};
use crate::session::Session;
use crate::state::AppState;

// --- Templates ---

#[derive(Template)]
#[template(path = "pages/post.html")]
pub struct PostTemplate {
    pub nav: Nav,
    pub post: PostView,
    pub can_like: bool,
}

#[derive(Template)]
#[template(path = "pages/write.html")]
pub struct WriteTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: String,
}

// --- Router ---

pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::POST_ROUTE, get(show_post))
        .route(paths::POST_LIKE_ROUTE, post(like_post))
        .route(paths::WRITE, get(write_page).post(submit_post))
}

// --- Handlers ---

async fn show_post(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    if let Err(nav) = admit(&session, &PUBLIC) {
        return Ok(nav);
    }

    let viewer_id = session.user().map(|u| u.id.as_str());

    let entry = {
        let conn = state.db.get()?;
        let mut entry = find_post(&conn, &id)?.ok_or(AppError::NotFound)?;

        // Drafts exist only for their author.
        if !entry.post.is_published() && viewer_id != Some(entry.post.author_id.as_str()) {
            return Err(AppError::NotFound);
        }

        if entry.post.is_published() {
            increment_views(&conn, &id)?;
            entry.post.views += 1;
        }
        entry
    };

    let can_like = session.is_authenticated && entry.post.is_published();

    Ok(Html(PostTemplate {
        nav: Nav::from_session(&session),
        post: PostView::new(entry),
        can_like,
    })
    .into_response())
}

async fn like_post(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    if let Err(nav) = admit(&session, &SIGNED_IN) {
        return Ok(nav);
    }

    let likes = {
        let conn = state.db.get()?;
        increment_likes(&conn, &id)?
    };
    tracing::debug!(post_id = %id, likes, "Post liked");

    Ok(Redirect::to(&paths::post_detail(&id)).into_response())
}

async fn write_page(session: Session) -> AppResult<Response> {
    if let Err(nav) = admit(&session, &WRITE_VIEW) {
        return Ok(nav);
    }

    Ok(Html(WriteTemplate {
        nav: Nav::from_session(&session),
        error: None,
        title: String::new(),
        content: String::new(),
        category: String::new(),
        tags: String::new(),
    })
    .into_response())
}

async fn submit_post(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    if let Err(nav) = admit(&session, &WRITE_VIEW) {
        return Ok(nav);
    }
    let author = session
        .user()
        .ok_or_else(|| AppError::Internal("Writer view admitted without a user".into()))?;

    // Keep the raw input around so a rejected form can be shown again.
    let echo = WriteTemplate {
        nav: Nav::from_session(&session),
        error: None,
        title: form.title.clone(),
        content: form.content.clone(),
        category: form.category.clone(),
        tags: form.tags.clone(),
    };

    let rejection = |message: String| {
        let page = WriteTemplate {
            error: Some(message),
            ..echo
        };
        (StatusCode::BAD_REQUEST, Html(page)).into_response()
    };

    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(e @ (AppError::EmptySubmission(_) | AppError::BadRequest(_))) => {
            return Ok(rejection(e.to_string()))
        }
        Err(e) => return Err(e),
    };

    let post = submission.into_post(author, Utc::now());
    {
        let conn = state.db.get()?;
        insert_post(&conn, &post)?;
    }
    tracing::info!(
        post_id = %post.id,
        author_id = %post.author_id,
        status = post.status.as_str(),
        "Post submitted"
    );

    let destination = match post.status {
        PostStatus::Published => paths::post_detail(&post.id),
        PostStatus::Draft => paths::DASHBOARD.to_string(),
    };
    Ok(Redirect::to(&destination).into_response())
}
