//! Per-request session context

use crate::api::AppState;
use crate::auth::{SessionState, SessionStore};
use crate::config::SessionConfig;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Response},
};
use std::convert::Infallible;

/// The caller's session, loaded from the session cookie or freshly created.
///
/// Handlers mutate `state` and hand the context back through
/// [`SessionContext::commit`] so the change is stored and the cookie set.
#[derive(Debug)]
pub struct SessionContext {
    pub id: String,
    pub state: SessionState,
    is_new: bool,
}

impl SessionContext {
    fn fresh() -> Self {
        Self {
            id: SessionStore::new_session_id(),
            state: SessionState::new(),
            is_new: true,
        }
    }

    /// Move the session to a fresh id, dropping the old one.
    ///
    /// The old id no longer resolves afterwards. The new cookie is sent on
    /// [`commit`](Self::commit).
    pub async fn rotate(&mut self, app: &AppState) {
        app.sessions.remove(&self.id).await;
        self.id = SessionStore::new_session_id();
        self.is_new = true;
    }

    /// Persist the session and attach the cookie if this is a new session
    pub async fn commit(self, app: &AppState, response: impl IntoResponse) -> Response {
        app.sessions.save(&self.id, self.state).await;

        let mut response = response.into_response();
        if self.is_new {
            let cookie = session_cookie(&app.session_config, &self.id, None);
            append_cookie(response.headers_mut(), &cookie);
        }
        response
    }

    /// Discard the session server-side and expire the cookie
    pub async fn end(self, app: &AppState, response: impl IntoResponse) -> Response {
        app.sessions.remove(&self.id).await;

        let mut response = response.into_response();
        let cookie = session_cookie(&app.session_config, "", Some(0));
        append_cookie(response.headers_mut(), &cookie);
        response
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, app: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(id) = read_cookie(&parts.headers, &app.session_config.cookie_name) {
            if let Some(state) = app.sessions.get(&id).await {
                return Ok(Self {
                    id,
                    state,
                    is_new: false,
                });
            }
            tracing::debug!("Unknown or expired session cookie, starting a new session");
        }

        Ok(Self::fresh())
    }
}

/// Value of cookie `name` from the request headers
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn session_cookie(config: &SessionConfig, value: &str, max_age: Option<u64>) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        config.cookie_name, value
    );
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age));
    }
    if config.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

fn append_cookie(headers: &mut HeaderMap, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            headers.append(SET_COOKIE, value);
        }
        Err(e) => tracing::warn!(error = %e, "Session cookie is not a valid header value"),
    }
}
