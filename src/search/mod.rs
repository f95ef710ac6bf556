//! Single-field record lookup
//!
//! An operator picks one [`SearchField`](crate::models::SearchField) and types
//! a value. The value is normalized (trimmed, internal whitespace collapsed)
//! and turned into an anchored, case-insensitive pattern in which each space
//! tolerates any run of whitespace in the stored value:
//!
//! ```text
//! "  12   Main  St. "  ->  "12 Main St."  ->  ^12\s*Main\s*St\.$   (case-insensitive)
//! ```
//!
//! The first record matching that pattern, in store order, is returned.
//!
//! # Example
//!
//! ```no_run
//! use occupancy_lookup::models::SearchField;
//! use occupancy_lookup::search::{RecordSearch, SearchOutcome};
//! use occupancy_lookup::state::create_in_memory_store;
//!
//! # async fn run() -> occupancy_lookup::Result<()> {
//! let search = RecordSearch::new(create_in_memory_store(), "details");
//! match search.search(SearchField::Name, "john   DOE").await? {
//!     SearchOutcome::Found(record) => println!("{:?}", record),
//!     SearchOutcome::NotFound => println!("not found"),
//!     SearchOutcome::Skipped => {}
//! }
//! # Ok(())
//! # }
//! ```

mod query;
mod service;

pub use query::{anchored_pattern, build_filter, normalize, RecordQuery};
pub use service::{format_for_display, RecordSearch, SearchOutcome};
