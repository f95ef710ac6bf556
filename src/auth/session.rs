use crate::config::SessionConfig;
use crate::models::SearchField;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use std::time::Duration;
use uuid::Uuid;

/// Authentication state of one session
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    #[default]
    LoggedOut,
    LoggedIn {
        username: String,
        since: DateTime<Utc>,
    },
}

/// Per-session state carried between requests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub auth: AuthState,
    pub last_search_field: SearchField,
    pub last_search_value: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in(&self) -> bool {
        matches!(self.auth, AuthState::LoggedIn { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match &self.auth {
            AuthState::LoggedIn { username, .. } => Some(username),
            AuthState::LoggedOut => None,
        }
    }

    pub(crate) fn log_in(&mut self, username: impl Into<String>) {
        self.auth = AuthState::LoggedIn {
            username: username.into(),
            since: Utc::now(),
        };
    }

    /// Remember the selector and input so the search screen re-renders them
    pub fn remember_search(&mut self, field: SearchField, value: impl Into<String>) {
        self.last_search_field = field;
        self.last_search_value = value.into();
    }
}

/// Server-side session storage keyed by an opaque cookie value
///
/// Sessions idle past the configured timeout are evicted.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, SessionState>,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_sessions)
            .time_to_idle(Duration::from_secs(config.idle_timeout_secs))
            .build();

        Self { cache }
    }

    /// Fresh opaque session id
    pub fn new_session_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    pub async fn get(&self, id: &str) -> Option<SessionState> {
        self.cache.get(id).await
    }

    pub async fn save(&self, id: &str, state: SessionState) {
        self.cache.insert(id.to_string(), state).await;
    }

    pub async fn remove(&self, id: &str) {
        self.cache.invalidate(id).await;
    }

    pub fn live_sessions(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_logged_out() {
        let state = SessionState::new();
        assert!(!state.logged_in());
        assert!(state.username().is_none());
        assert_eq!(state.last_search_field, SearchField::Address);
        assert!(state.last_search_value.is_empty());
    }

    #[test]
    fn test_log_in_sets_username() {
        let mut state = SessionState::new();
        state.log_in("admin");
        assert!(state.logged_in());
        assert_eq!(state.username(), Some("admin"));
    }

    #[tokio::test]
    async fn test_store_round_trip_and_remove() {
        let store = SessionStore::new(&SessionConfig::default());
        let id = SessionStore::new_session_id();

        let mut state = SessionState::new();
        state.remember_search(SearchField::Lease, "L-1");
        store.save(&id, state.clone()).await;
        assert_eq!(store.get(&id).await, Some(state));

        store.remove(&id).await;
        assert!(store.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let config = SessionConfig {
            idle_timeout_secs: 1,
            ..Default::default()
        };
        let store = SessionStore::new(&config);
        store.save("s1", SessionState::new()).await;
        assert!(store.get("s1").await.is_some());

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert!(store.get("s1").await.is_none());
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionStore::new_session_id(), SessionStore::new_session_id());
    }
}
