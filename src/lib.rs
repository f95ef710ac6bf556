//! Occupancy lookup service
//!
//! An authenticated, single-field lookup over address/occupancy records
//! held in a document store. See [`api::build_router`] for the HTTP surface,
//! [`auth::SessionGate`] for sign-in and [`search::RecordSearch`] for the
//! lookup itself.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod search;
pub mod shutdown;
pub mod state;

pub use error::{AppError, Result};
