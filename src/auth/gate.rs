use crate::auth::SessionState;
use crate::error::Result;
use crate::metrics::{LOGINS_TOTAL, STORE_QUERY_DURATION_SECONDS};
use crate::models::PasswordScheme;
use crate::state::{DocumentFilter, DocumentStore};
use std::sync::Arc;
use std::time::Instant;

/// Result of a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated,
    /// No matching credential; the session is unchanged
    Rejected,
}

impl LoginOutcome {
    /// Inline message shown on the login screen after a rejection
    pub const REJECTED_MESSAGE: &'static str = "Invalid username or password";
}

/// Authenticates operators against the user collection
pub struct SessionGate {
    store: Arc<dyn DocumentStore>,
    collection: String,
    scheme: PasswordScheme,
}

impl SessionGate {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        scheme: PasswordScheme,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            scheme,
        }
    }

    /// True iff a credential with exactly this username and (encoded)
    /// password exists.
    pub async fn check_credentials(&self, username: &str, password: &str) -> Result<bool> {
        let filter = DocumentFilter::new()
            .eq("username", username)
            .eq("password", self.scheme.encode(password));

        let started = Instant::now();
        let found = self.store.find_one(&self.collection, &filter).await;
        STORE_QUERY_DURATION_SECONDS
            .with_label_values(&[self.collection.as_str()])
            .observe(started.elapsed().as_secs_f64());

        Ok(found?.is_some())
    }

    /// Attempt to sign `session` in. The session is only modified on success.
    pub async fn login(
        &self,
        session: &mut SessionState,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome> {
        let accepted = match self.check_credentials(username, password).await {
            Ok(accepted) => accepted,
            Err(e) => {
                LOGINS_TOTAL.with_label_values(&["error"]).inc();
                tracing::error!(username, error = %e, "Credential lookup failed");
                return Err(e);
            }
        };

        if accepted {
            session.log_in(username);
            LOGINS_TOTAL.with_label_values(&["accepted"]).inc();
            tracing::info!(username, "Login accepted");
            Ok(LoginOutcome::Authenticated)
        } else {
            LOGINS_TOTAL.with_label_values(&["rejected"]).inc();
            tracing::warn!(username, "Login rejected");
            Ok(LoginOutcome::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserCredential;
    use crate::state::create_in_memory_store;

    async fn gate(scheme: PasswordScheme) -> SessionGate {
        let store = create_in_memory_store();
        store
            .insert_one("users", UserCredential::new("admin", "correct", scheme).into_document())
            .await
            .unwrap();
        SessionGate::new(store, "users", scheme)
    }

    #[tokio::test]
    async fn test_check_credentials() {
        let gate = gate(PasswordScheme::Plaintext).await;
        assert!(gate.check_credentials("admin", "correct").await.unwrap());
        assert!(!gate.check_credentials("admin", "wrong").await.unwrap());
        assert!(!gate.check_credentials("ADMIN", "correct").await.unwrap());
        assert!(!gate.check_credentials("admin", "Correct").await.unwrap());
        assert!(!gate.check_credentials("", "").await.unwrap());
    }

    #[tokio::test]
    async fn test_login_success_transitions_session() {
        let gate = gate(PasswordScheme::Plaintext).await;
        let mut session = SessionState::new();

        let outcome = gate.login(&mut session, "admin", "correct").await.unwrap();
        assert_eq!(outcome, LoginOutcome::Authenticated);
        assert!(session.logged_in());
        assert_eq!(session.username(), Some("admin"));
    }

    #[tokio::test]
    async fn test_login_failure_leaves_session_unchanged() {
        let gate = gate(PasswordScheme::Plaintext).await;
        let mut session = SessionState::new();
        let before = session.clone();

        let outcome = gate.login(&mut session, "admin", "wrong").await.unwrap();
        assert_eq!(outcome, LoginOutcome::Rejected);
        assert_eq!(session, before);
    }

    #[tokio::test]
    async fn test_sha256_scheme_compares_digests() {
        let gate = gate(PasswordScheme::Sha256).await;
        assert!(gate.check_credentials("admin", "correct").await.unwrap());

        // A plaintext entry would not match a hashed deployment
        let digest = PasswordScheme::Sha256.encode("correct");
        assert!(!gate.check_credentials("admin", &digest).await.unwrap());
    }
}
