//! Record lookup service

use crate::error::Result;
use crate::metrics::{SEARCHES_TOTAL, STORE_QUERY_DURATION_SECONDS};
use crate::models::{DisplayRow, Document, SearchField};
use crate::search::query::RecordQuery;
use crate::state::DocumentStore;
use std::sync::Arc;
use std::time::Instant;

/// Result of a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Input was blank after normalization; nothing was queried
    Skipped,
    /// First matching record in store order
    Found(Document),
    NotFound,
}

impl SearchOutcome {
    fn label(&self) -> &'static str {
        match self {
            SearchOutcome::Skipped => "skipped",
            SearchOutcome::Found(_) => "found",
            SearchOutcome::NotFound => "not_found",
        }
    }
}

/// Looks up address/occupancy records by a single field
pub struct RecordSearch {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl RecordSearch {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Find the first record whose `field` matches the normalized input.
    pub async fn search(&self, field: SearchField, raw: &str) -> Result<SearchOutcome> {
        let Some(query) = RecordQuery::build(field, raw)? else {
            tracing::debug!(field = %field, "Blank search input, no query issued");
            return Ok(SearchOutcome::Skipped);
        };

        tracing::debug!(filter = %query.to_json(), collection = %self.collection, "Running record lookup");

        let started = Instant::now();
        let found = self
            .store
            .find_one(&self.collection, &query.to_filter())
            .await;
        STORE_QUERY_DURATION_SECONDS
            .with_label_values(&[self.collection.as_str()])
            .observe(started.elapsed().as_secs_f64());

        let outcome = match found {
            Ok(Some(record)) => SearchOutcome::Found(record),
            Ok(None) => SearchOutcome::NotFound,
            Err(e) => {
                SEARCHES_TOTAL.with_label_values(&[field.key(), "error"]).inc();
                tracing::error!(field = %field, error = %e, "Record lookup failed");
                return Err(e);
            }
        };

        SEARCHES_TOTAL
            .with_label_values(&[field.key(), outcome.label()])
            .inc();
        tracing::info!(field = %field, outcome = outcome.label(), "Record lookup complete");

        Ok(outcome)
    }
}

/// Prepare a record for display: drop the internal id and apply column names.
pub fn format_for_display(record: Document) -> DisplayRow {
    DisplayRow::from_record(record)
}
