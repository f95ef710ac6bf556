pub mod handlers;
pub mod routes;
pub mod session;
pub mod views;

pub use routes::*;
pub use session::SessionContext;

use crate::auth::{SessionGate, SessionStore};
use crate::config::{Config, SessionConfig};
use crate::search::RecordSearch;
use crate::state::DocumentStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<SessionGate>,
    pub search: Arc<RecordSearch>,
    pub sessions: SessionStore,
    pub store: Arc<dyn DocumentStore>,
    pub session_config: Arc<SessionConfig>,
    pub metrics_enabled: bool,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wire the gate and search components to one shared store handle
    pub fn new(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        let gate = SessionGate::new(
            store.clone(),
            config.store.users_collection.clone(),
            config.auth.password_scheme,
        );
        let search = RecordSearch::new(store.clone(), config.store.records_collection.clone());

        Self {
            gate: Arc::new(gate),
            search: Arc::new(search),
            sessions: SessionStore::new(&config.session),
            store,
            session_config: Arc::new(config.session.clone()),
            metrics_enabled: config.observability.prometheus_enabled,
            started_at: Utc::now(),
        }
    }
}
