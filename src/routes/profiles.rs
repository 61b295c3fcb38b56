use askama::Template;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::db::posts::{list_by_author, list_published_by_author};
use crate::db::users::find_by_username;
use crate::error::{AppError, AppResult};
use crate::format::{format_number, get_initials};
use crate::gate::{DASHBOARD_VIEW, PUBLIC};
use crate::paths;
use crate::routes::admit;
use crate::routes::home::Html;
use crate::routes::views::{Nav, PostCard};
use crate::session::Session;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/profile.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub username: String,
    pub display_name: String,
    pub initials: String,
    pub role: &'static str,
    pub bio: Option<String>,
    pub posts: Vec<PostCard>,
}

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub nav: Nav,
    pub posts: Vec<PostCard>,
    pub published_count: usize,
    pub draft_count: usize,
    pub total_views: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::PROFILE_ROUTE, get(profile))
        .route(paths::DASHBOARD, get(dashboard))
}

async fn profile(
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
) -> AppResult<Response> {
    if let Err(nav) = admit(&session, &PUBLIC) {
        return Ok(nav);
    }

    let (user, posts) = {
        let conn = state.db.get()?;
        let user = find_by_username(&conn, &username)?.ok_or(AppError::NotFound)?;
        let posts = list_published_by_author(&conn, &user.id)?;
        (user, posts)
    };

    Ok(Html(ProfileTemplate {
        nav: Nav::from_session(&session),
        initials: get_initials(&user.display_name),
        role: user.role.as_str(),
        username: user.username,
        display_name: user.display_name,
        bio: user.bio,
        posts: posts.into_iter().map(PostCard::new).collect(),
    })
    .into_response())
}

/// The signed-in writer's own stories, drafts included.
async fn dashboard(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    if let Err(nav) = admit(&session, &DASHBOARD_VIEW) {
        return Ok(nav);
    }
    let user = session
        .user()
        .ok_or_else(|| AppError::Internal("Writer view admitted without a user".into()))?;

    let posts = {
        let conn = state.db.get()?;
        list_by_author(&conn, &user.id)?
    };

    let published_count = posts.iter().filter(|p| p.post.is_published()).count();
    let draft_count = posts.len() - published_count;
    let total_views = posts.iter().map(|p| p.post.views).sum();

    Ok(Html(DashboardTemplate {
        nav: Nav::from_session(&session),
        posts: posts.into_iter().map(PostCard::new).collect(),
        published_count,
        draft_count,
        total_views: format_number(total_views),
    })
    .into_response())
}
