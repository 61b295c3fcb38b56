use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};

use crate::session::Session;
use crate::state::AppState;

/// Resolves the request's session cookie. Never rejects: a missing or
/// unknown cookie yields an anonymous session, a slow lookup a pending one.
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers, &state.config.auth.cookie_name) else {
            return Ok(Session::anonymous());
        };

        Ok(Session::resolve(
            state.db.clone(),
            token.to_string(),
            state.config.auth.resolve_timeout(),
        )
        .await)
    }
}

/// The session cookie, when present and non-empty.
pub fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == cookie_name && !val.is_empty() {
                Some(val)
            } else {
                None
            }
        })
}
