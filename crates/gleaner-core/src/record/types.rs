//! Stored and harvested record shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cursor::Watermark;
use crate::types::{RecordId, SetSpec};

use super::MetadataDoc;

/// The repository's global policy for reporting deleted records.
///
/// This is external configuration decided by the repository operator, not
/// by the engine; the page producer only consults it to decide whether
/// tombstones are eligible for a page at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionPolicy {
    /// Deletions leave no trace; tombstones never appear in pages.
    NoTracking,
    /// Tombstones are reported for a limited time.
    Transient,
    /// Tombstones are reported indefinitely.
    Persistent,
}

/// A record as returned by the record store's range query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// The record's stable, unique identifier.
    pub id: RecordId,

    /// When the record was last created, updated, or deleted.
    pub last_modified: DateTime<Utc>,

    /// Whether the record is a tombstone.
    pub deleted: bool,

    /// The sets this record belongs to.
    pub sets: Vec<SetSpec>,

    /// The metadata rendered in the requested format.
    ///
    /// Absent for tombstones; deleted records carry only identity,
    /// datestamp, and deletion status.
    pub metadata: Option<MetadataDoc>,
}

impl StoredRecord {
    /// This record's position in the harvest total order.
    pub fn watermark(&self) -> Watermark {
        Watermark::new(self.last_modified, self.id.clone())
    }
}

/// The identity portion of a harvested record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordHeader {
    /// The record's identifier.
    pub id: RecordId,

    /// The record's datestamp.
    pub datestamp: DateTime<Utc>,

    /// The sets this record belongs to.
    pub sets: Vec<SetSpec>,

    /// Whether this entry is a tombstone.
    pub deleted: bool,
}

/// One record of a harvest page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestedRecord {
    /// Identity, datestamp, set memberships, deletion status.
    pub header: RecordHeader,

    /// The disseminated metadata; always absent for tombstones.
    pub metadata: Option<MetadataDoc>,
}

impl From<StoredRecord> for HarvestedRecord {
    fn from(record: StoredRecord) -> Self {
        let metadata = if record.deleted {
            None
        } else {
            record.metadata
        };
        Self {
            header: RecordHeader {
                id: record.id,
                datestamp: record.last_modified,
                sets: record.sets,
                deleted: record.deleted,
            },
            metadata,
        }
    }
}

/// One page of a harvest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// The ordered record batch.
    pub records: Vec<HarvestedRecord>,

    /// Opaque continuation token; absent when the harvest is complete.
    pub resumption_token: Option<String>,
}
