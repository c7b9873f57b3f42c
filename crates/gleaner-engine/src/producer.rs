//! Page production.
//!
//! Given a cursor, query the record store for the next bounded, ordered
//! slice of matching records and compute either a successor cursor or a
//! terminal "harvest complete" outcome. The producer consumes and produces
//! only [`Cursor`] values; whether a cursor came from the normalizer or
//! the token codec is invisible here, so first and subsequent pages behave
//! identically.

use chrono::{DateTime, Utc};
use tokio::time::timeout;
use tracing::{debug, instrument};

use gleaner_core::{
    Cursor, DeletionPolicy, Error, HarvestedRecord, RangeQuery, RecordStore, Result,
};

use crate::config::HarvestConfig;

/// The outcome of producing one page.
#[derive(Debug)]
pub struct ProducedPage {
    /// The ordered records of this page. May be empty on a trailing page
    /// when every remaining record disappeared between requests.
    pub records: Vec<HarvestedRecord>,

    /// The successor cursor; `None` when the harvest is complete.
    pub next: Option<Cursor>,
}

/// Produces bounded pages over a record store.
#[derive(Debug)]
pub struct PageProducer<S> {
    store: S,
    config: HarvestConfig,
}

impl<S: RecordStore> PageProducer<S> {
    /// Create a producer over the given store.
    pub fn new(store: S, config: HarvestConfig) -> Self {
        Self { store, config }
    }

    /// Produce the page the cursor points at.
    ///
    /// # Errors
    ///
    /// - [`Error::BadResumptionToken`] when the cursor has expired; the
    ///   store is never touched in that case.
    /// - [`Error::NoRecordsMatch`] when the very first page of a harvest
    ///   matches nothing.
    /// - [`Error::StoreUnavailable`] when the range query fails or exceeds
    ///   the configured timeout; retryable by resubmitting the same token.
    #[instrument(skip(self, cursor), fields(prefix = %cursor.metadata_prefix()))]
    pub async fn next_page(&self, cursor: &Cursor, now: DateTime<Utc>) -> Result<ProducedPage> {
        // Refuse expired cursors regardless of how valid the rest looks.
        if cursor.is_expired(now) {
            return Err(Error::BadResumptionToken);
        }

        let page_size = cursor.page_size() as usize;
        let query = RangeQuery {
            prefix: cursor.metadata_prefix().clone(),
            set: cursor.set().cloned(),
            from: cursor.from(),
            until: cursor.until(),
            after: cursor.watermark().cloned(),
            include_deleted: self.store.deletion_policy() != DeletionPolicy::NoTracking,
            // One extra row detects whether more pages remain without a
            // separate count query.
            limit: page_size + 1,
        };

        let rows = match timeout(self.config.store_timeout, self.store.page_after(&query)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::StoreUnavailable {
                    message: format!(
                        "range query exceeded {}ms",
                        self.config.store_timeout.as_millis()
                    ),
                });
            }
        };

        if rows.is_empty() {
            return if cursor.watermark().is_none() {
                Err(Error::NoRecordsMatch)
            } else {
                // A trailing page with nothing left: complete, not an error.
                debug!("Harvest complete on empty continuation page");
                Ok(ProducedPage {
                    records: Vec::new(),
                    next: None,
                })
            };
        }

        let has_more = rows.len() > page_size;
        let emitted: Vec<_> = rows.into_iter().take(page_size).collect();

        let next = if has_more {
            emitted
                .last()
                .map(|last| cursor.derive_successor(last.watermark(), now))
        } else {
            None
        };

        debug!(
            emitted = emitted.len(),
            complete = next.is_none(),
            "Produced page"
        );

        Ok(ProducedPage {
            records: emitted.into_iter().map(HarvestedRecord::from).collect(),
            next,
        })
    }
}
