use askama::Template;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::auth::session;
use crate::config::AuthConfig;
use crate::db::models::{Role, User};
use crate::db::users::{find_credentials, insert_user, username_key, NewUser};
use crate::error::{AppError, AppResult};
use crate::extractors::session_token;
use crate::paths;
use crate::routes::home::Html;
use crate::routes::views::Nav;
use crate::session::Session;
use crate::state::AppState;

// -- Templates --

#[derive(Template)]
#[template(path = "pages/signin.html")]
pub struct SignInTemplate {
    pub nav: Nav,
    pub action: &'static str,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
    pub username: String,
}

#[derive(Template)]
#[template(path = "pages/signup.html")]
pub struct SignUpTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub wants_writer: bool,
}

const WRITER_REQUIRED: &str = "That page is for writers. Sign in with a writer account to continue.";

// -- Request types --

#[derive(Deserialize)]
pub struct SignInForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignUpForm {
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    pub password: String,
    #[serde(default)]
    pub role: String,
}

// -- Cookie helpers --

fn session_cookie(auth: &AuthConfig, token: &str) -> String {
    let max_age_secs = auth.session_hours.saturating_mul(3600);
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        auth.cookie_name, token, max_age_secs
    )
}

fn clear_session_cookie(auth: &AuthConfig) -> String {
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        auth.cookie_name
    )
}

/// Issue a session for `user` and send them on to their landing page.
fn start_session(state: &AppState, user: &User) -> AppResult<Response> {
    let token = session::create_session(&state.db, &user.id, state.config.auth.session_hours)?;
    let landing = if user.is_writer() {
        paths::DASHBOARD
    } else {
        paths::HOME
    };

    Ok((
        AppendHeaders([(header::SET_COOKIE, session_cookie(&state.config.auth, &token))]),
        Redirect::to(landing),
    )
        .into_response())
}

fn sign_in_form(
    nav: Nav,
    action: &'static str,
    notice: Option<&'static str>,
    error: Option<String>,
    username: String,
) -> SignInTemplate {
    SignInTemplate {
        nav,
        action,
        notice,
        error,
        username,
    }
}

// -- Sign in --

/// GET /signin. Already signed-in users go home.
pub async fn signin_page(session: Session) -> AppResult<Response> {
    if session.is_authenticated {
        return Ok(Redirect::to(paths::HOME).into_response());
    }
    let page = sign_in_form(Nav::default(), paths::SIGN_IN, None, None, String::new());
    Ok(Html(page).into_response())
}

/// GET /login: where readers land after trying a writer-only view.
pub async fn login_page(session: Session) -> AppResult<Response> {
    Ok(Html(sign_in_form(
        Nav::from_session(&session),
        paths::LOGIN,
        Some(WRITER_REQUIRED),
        None,
        String::new(),
    ))
    .into_response())
}

/// POST /signin
pub async fn signin(
    State(state): State<AppState>,
    Form(form): Form<SignInForm>,
) -> AppResult<Response> {
    authenticate(&state, form, paths::SIGN_IN, None).await
}

/// POST /login. A failed attempt keeps the writer notice on the form.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<SignInForm>,
) -> AppResult<Response> {
    authenticate(&state, form, paths::LOGIN, Some(WRITER_REQUIRED)).await
}

/// Check the credentials and start a session, or re-render the form that
/// was posted with a 401.
async fn authenticate(
    state: &AppState,
    form: SignInForm,
    action: &'static str,
    notice: Option<&'static str>,
) -> AppResult<Response> {
    let username = username_key(&form.username);

    let credentials = {
        let conn = state.db.get()?;
        find_credentials(&conn, &username)?
    };

    let verified = match credentials {
        Some((user, hash)) => {
            let password = form.password;
            let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            matches.then_some(user)
        }
        None => None,
    };

    match verified {
        Some(user) => {
            tracing::info!(user_id = %user.id, "User signed in");
            start_session(state, &user)
        }
        None => {
            tracing::info!(username = %username, action, "Rejected sign-in attempt");
            let page = sign_in_form(
                Nav::default(),
                action,
                notice,
                Some("Unknown username or wrong password".into()),
                username,
            );
            Ok((StatusCode::UNAUTHORIZED, Html(page)).into_response())
        }
    }
}

// -- Sign up --

pub async fn signup_page(session: Session) -> AppResult<Response> {
    if session.is_authenticated {
        return Ok(Redirect::to(paths::HOME).into_response());
    }
    Ok(Html(SignUpTemplate {
        nav: Nav::default(),
        error: None,
        username: String::new(),
        display_name: String::new(),
        bio: String::new(),
        wants_writer: false,
    })
    .into_response())
}

/// Usernames are lowercase ASCII letters, digits, `_` and `-`.
pub fn normalize_username(raw: &str) -> AppResult<String> {
    let username = username_key(raw);
    if username.is_empty() {
        return Err(AppError::EmptySubmission("Username"));
    }
    if !(3..=32).contains(&username.len()) {
        return Err(AppError::BadRequest(
            "Username must be between 3 and 32 characters".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(AppError::BadRequest(
            "Username may only contain letters, digits, '_' and '-'".into(),
        ));
    }
    Ok(username)
}

pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignUpForm>,
) -> AppResult<Response> {
    let wants_writer = form.role == Role::Writer.as_str();
    let rejection = |message: String| -> AppResult<Response> {
        let page = SignUpTemplate {
            nav: Nav::default(),
            error: Some(message),
            username: form.username.clone(),
            display_name: form.display_name.clone(),
            bio: form.bio.clone(),
            wants_writer,
        };
        Ok((StatusCode::BAD_REQUEST, Html(page)).into_response())
    };

    let username = match normalize_username(&form.username) {
        Ok(username) => username,
        Err(e @ (AppError::EmptySubmission(_) | AppError::BadRequest(_))) => {
            return rejection(e.to_string())
        }
        Err(e) => return Err(e),
    };
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return rejection(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    let role = match form.role.as_str() {
        "" => Role::Reader,
        other => match Role::parse(other) {
            Some(role) => role,
            None => return rejection("Role must be reader or writer".into()),
        },
    };

    let display_name = match form.display_name.trim() {
        "" => username.clone(),
        name => name.to_string(),
    };
    let bio = Some(form.bio.trim()).filter(|b| !b.is_empty());

    let cost = state.config.auth.bcrypt_cost;
    let password = form.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let inserted = {
        let conn = state.db.get()?;
        insert_user(
            &conn,
            &NewUser {
                username: &username,
                display_name: &display_name,
                bio,
                role,
                password_hash: &password_hash,
            },
        )
    };

    match inserted {
        Ok(user) => start_session(&state, &user),
        Err(AppError::BadRequest(message)) => rejection(message),
        Err(e) => Err(e),
    }
}

// -- Sign out --

/// POST /signout: drop the session row and clear the cookie.
pub async fn signout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if let Some(token) = session_token(&headers, &state.config.auth.cookie_name) {
        session::delete_session(&state.db, token)?;
        tracing::info!("User signed out");
    }

    Ok((
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie(&state.config.auth))]),
        Redirect::to(paths::HOME),
    )
        .into_response())
}
