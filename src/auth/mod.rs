//! Session gate: who is signed in, and which screen they get.
//!
//! A session starts [`AuthState::LoggedOut`] and moves to
//! [`AuthState::LoggedIn`] only after [`SessionGate::login`] finds a matching
//! credential. Logging out discards the session entirely.
//!
//! Credentials are compared exactly as stored unless the deployment selects
//! [`PasswordScheme::Sha256`](crate::models::PasswordScheme). There is no
//! attempt limiting or lockout.

mod gate;
mod session;

pub use gate::{LoginOutcome, SessionGate};
pub use session::{AuthState, SessionState, SessionStore};
