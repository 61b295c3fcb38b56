use axum::routing::{get, post};
use axum::Router;

use crate::auth::handlers;
use crate::paths;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(paths::SIGN_IN, get(handlers::signin_page).post(handlers::signin))
        .route(paths::LOGIN, get(handlers::login_page).post(handlers::login))
        .route(paths::SIGN_UP, get(handlers::signup_page).post(handlers::signup))
        .route(paths::SIGN_OUT, post(handlers::signout))
}
