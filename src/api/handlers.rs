use crate::api::views::{self, ResultPanel, SearchView};
use crate::api::{AppState, SessionContext};
use crate::auth::LoginOutcome;
use crate::error::AppError;
use crate::metrics::gather_metrics;
use crate::models::SearchField;
use crate::search::{format_for_display, SearchOutcome};
use axum::{
    extract::{Form, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Banner shown when the record store cannot be reached
pub const STORE_UNAVAILABLE_MESSAGE: &str =
    "The record store is unavailable right now. Please try again.";

/// Render whichever screen the session is entitled to
pub async fn index(State(app): State<AppState>, session: SessionContext) -> Response {
    let html = match session.state.username() {
        Some(username) => views::search_page(&SearchView {
            username,
            field: session.state.last_search_field,
            value: &session.state.last_search_value,
            result: ResultPanel::Empty,
        }),
        None => views::login_page(None, ""),
    };

    session.commit(&app, Html(html)).await
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Check submitted credentials; on success continue to the search screen
pub async fn login(
    State(app): State<AppState>,
    mut session: SessionContext,
    Form(form): Form<LoginForm>,
) -> Response {
    match app
        .gate
        .login(&mut session.state, &form.username, &form.password)
        .await
    {
        Ok(LoginOutcome::Authenticated) => {
            session.rotate(&app).await;
            session.commit(&app, Redirect::to("/")).await
        }
        Ok(LoginOutcome::Rejected) => {
            let html = views::login_page(Some(LoginOutcome::REJECTED_MESSAGE), &form.username);
            session
                .commit(&app, (StatusCode::UNAUTHORIZED, Html(html)))
                .await
        }
        Err(e) => {
            let html = views::login_page(Some(STORE_UNAVAILABLE_MESSAGE), &form.username);
            session.commit(&app, (e.status_code(), Html(html))).await
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// Run a lookup and re-render the search screen with its result
pub async fn search(
    State(app): State<AppState>,
    mut session: SessionContext,
    Form(form): Form<SearchForm>,
) -> Response {
    if !session.state.logged_in() {
        return session.commit(&app, Redirect::to("/")).await;
    }

    let field = match SearchField::parse_key(&form.field) {
        Ok(field) => field,
        Err(e) => {
            tracing::warn!(field = %form.field, "Rejected search on unknown field");
            let html = views::search_page(&SearchView {
                username: session.state.username().unwrap_or_default(),
                field: session.state.last_search_field,
                value: &form.value,
                result: error_panel(&e),
            });
            return session.commit(&app, (e.status_code(), Html(html))).await;
        }
    };

    session.state.remember_search(field, form.value.clone());

    let (status, result) = match app.search.search(field, &form.value).await {
        Ok(SearchOutcome::Skipped) => (StatusCode::OK, ResultPanel::Empty),
        Ok(SearchOutcome::Found(record)) => {
            (StatusCode::OK, ResultPanel::Table(format_for_display(record)))
        }
        Ok(SearchOutcome::NotFound) => (StatusCode::OK, ResultPanel::NotFound),
        Err(e) => (e.status_code(), error_panel(&e)),
    };

    let html = views::search_page(&SearchView {
        username: session.state.username().unwrap_or_default(),
        field,
        value: &form.value,
        result,
    });

    session.commit(&app, (status, Html(html))).await
}

fn error_panel(error: &AppError) -> ResultPanel {
    match error {
        AppError::Database(_) => ResultPanel::Error(STORE_UNAVAILABLE_MESSAGE.to_string()),
        other if other.is_recoverable() => ResultPanel::Error(other.to_string()),
        other => {
            tracing::error!(error = %other, "Search failed");
            ResultPanel::Error("Search failed. Please contact an administrator.".to_string())
        }
    }
}

/// Drop the session and return to the login screen
pub async fn logout(State(app): State<AppState>, session: SessionContext) -> Response {
    if let Some(username) = session.state.username() {
        tracing::info!(username, "Logged out");
    }
    session.end(&app, Redirect::to("/")).await
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub store: String,
    pub active_sessions: u64,
}

/// Health check endpoint
pub async fn health_check(State(app): State<AppState>) -> Json<HealthResponse> {
    let status = match app.store.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            tracing::warn!(error = %e, "Store ping failed during health check");
            "degraded"
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (Utc::now() - app.started_at).num_seconds().max(0) as u64,
        store: app.store.backend_name().to_string(),
        active_sessions: app.sessions.live_sessions(),
    })
}

/// Prometheus exposition endpoint
pub async fn metrics(State(app): State<AppState>) -> Response {
    if !app.metrics_enabled {
        return AppError::NotFound("metrics are disabled".to_string()).into_response();
    }

    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
        .into_response()
}
