use crate::api::{handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};

/// Build the main router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Screens
        .route("/", get(handlers::index))
        .route("/login", post(handlers::login))
        .route("/search", post(handlers::search))
        .route("/logout", post(handlers::logout))
        // Operations
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        // Add state
        .with_state(state)
        // Request/response headers carry the session cookie; keep them out of spans
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
}
