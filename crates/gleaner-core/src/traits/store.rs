//! Record store trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;
use crate::cursor::Watermark;
use crate::record::{DeletionPolicy, StoredRecord};
use crate::types::{MetadataPrefix, SetSpec};

/// The predicate and bounds of one range query.
///
/// Built by the page producer from a cursor; the store never sees raw
/// request parameters or the token encoding.
#[derive(Debug, Clone)]
pub struct RangeQuery {
    /// Records must be able to disseminate this format to be eligible
    /// (tombstones are exempt: they have no metadata in any format).
    pub prefix: MetadataPrefix,

    /// When present, only records in this set or a descendant of it.
    pub set: Option<SetSpec>,

    /// Inclusive lower bound on `last_modified`.
    pub from: Option<DateTime<Utc>>,

    /// Inclusive upper bound on `last_modified`.
    pub until: Option<DateTime<Utc>>,

    /// Return only records strictly after this position in the total order.
    pub after: Option<Watermark>,

    /// Whether tombstones are eligible at all.
    pub include_deleted: bool,

    /// Maximum number of rows to return.
    pub limit: usize,
}

/// An ordered record store.
///
/// The engine's single suspension point is [`RecordStore::page_after`];
/// implementations are expected to be read-only and idempotent for a given
/// query, which is what makes replaying the same resumption token safe.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The repository's global deletion policy.
    fn deletion_policy(&self) -> DeletionPolicy;

    /// Return up to `query.limit` matching records ordered ascending by
    /// `(last_modified, id)`, starting strictly after `query.after` when
    /// present.
    ///
    /// # Errors
    ///
    /// Implementations map infrastructure failures to
    /// [`Error::StoreUnavailable`](crate::Error::StoreUnavailable) so the
    /// harvester knows the request is retryable.
    async fn page_after(&self, query: &RangeQuery) -> Result<Vec<StoredRecord>>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for std::sync::Arc<S> {
    fn deletion_policy(&self) -> DeletionPolicy {
        (**self).deletion_policy()
    }

    async fn page_after(&self, query: &RangeQuery) -> Result<Vec<StoredRecord>> {
        (**self).page_after(query).await
    }
}
