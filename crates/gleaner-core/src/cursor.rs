//! Harvest cursor and watermark types.
//!
//! A [`Cursor`] is the complete state needed to resume a harvest. It is
//! never stored server-side; its only persistence is inside the opaque
//! resumption token handed back to the harvester.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Granularity, MetadataPrefix, RecordId, SetSpec};

/// The position of the last record already emitted in a harvest.
///
/// Records are totally ordered by `(last_modified, record_id)` ascending;
/// the derived [`Ord`] relies on that field order. A watermark, not a
/// numeric offset, is the resumption position: offsets shift under
/// concurrent inserts and deletes, watermarks do not.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Watermark {
    /// Last-modified datestamp of the last emitted record.
    pub last_modified: DateTime<Utc>,
    /// Identifier of the last emitted record; breaks ties between records
    /// sharing a datestamp.
    pub record_id: RecordId,
}

impl Watermark {
    /// Create a watermark from its components.
    pub fn new(last_modified: DateTime<Utc>, record_id: RecordId) -> Self {
        Self {
            last_modified,
            record_id,
        }
    }
}

/// The complete, serializable state of one harvest position.
///
/// A cursor is immutable once constructed; advancing a harvest derives a
/// new cursor via [`Cursor::derive_successor`]. The filters, granularity,
/// and page size are fixed for the harvest's lifetime, so a harvester
/// cannot change them mid-harvest by crafting a new token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    metadata_prefix: MetadataPrefix,
    set: Option<SetSpec>,
    from: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    granularity: Granularity,
    watermark: Option<Watermark>,
    page_size: u32,
    issued_at: DateTime<Utc>,
    expires_after_secs: i64,
}

impl Cursor {
    /// Create the cursor for the first page of a harvest.
    ///
    /// `from` and `until` are already-widened inclusive bounds; the
    /// normalizer guarantees `from <= until` when both are present.
    #[allow(clippy::too_many_arguments)]
    pub fn first_page(
        metadata_prefix: MetadataPrefix,
        set: Option<SetSpec>,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        granularity: Granularity,
        page_size: u32,
        issued_at: DateTime<Utc>,
        expires_after: Duration,
    ) -> Self {
        debug_assert!(from.zip(until).is_none_or(|(f, u)| f <= u));
        Self {
            metadata_prefix,
            set,
            from,
            until,
            granularity,
            watermark: None,
            page_size: page_size.max(1),
            issued_at,
            expires_after_secs: expires_after.num_seconds(),
        }
    }

    /// Derive the successor cursor after emitting a page ending at
    /// `last_emitted`.
    ///
    /// All filters, the granularity, and the page size are preserved; the
    /// watermark advances and `issued_at` is refreshed so the expiry clock
    /// restarts with each page.
    pub fn derive_successor(&self, last_emitted: Watermark, now: DateTime<Utc>) -> Self {
        debug_assert!(
            self.watermark
                .as_ref()
                .is_none_or(|prev| *prev < last_emitted),
            "successor watermark must advance"
        );
        Self {
            watermark: Some(last_emitted),
            issued_at: now,
            ..self.clone()
        }
    }

    /// Whether this cursor has outlived its expiry deadline.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.issued_at + Duration::seconds(self.expires_after_secs)
    }

    /// The requested metadata format.
    pub fn metadata_prefix(&self) -> &MetadataPrefix {
        &self.metadata_prefix
    }

    /// The optional set filter.
    pub fn set(&self) -> Option<&SetSpec> {
        self.set.as_ref()
    }

    /// The inclusive lower datestamp bound, if any.
    pub fn from(&self) -> Option<DateTime<Utc>> {
        self.from
    }

    /// The inclusive upper datestamp bound, if any.
    pub fn until(&self) -> Option<DateTime<Utc>> {
        self.until
    }

    /// The granularity fixed for this harvest.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// The position of the last emitted record; `None` on the first page.
    pub fn watermark(&self) -> Option<&Watermark> {
        self.watermark.as_ref()
    }

    /// The page size fixed for this harvest.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// When this cursor was minted.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// The TTL captured when this cursor was minted.
    pub fn expires_after(&self) -> Duration {
        Duration::seconds(self.expires_after_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn sample_cursor() -> Cursor {
        Cursor::first_page(
            MetadataPrefix::new("oai_dc").unwrap(),
            None,
            None,
            None,
            Granularity::Second,
            10,
            ts("2024-06-01T00:00:00Z"),
            Duration::hours(24),
        )
    }

    #[test]
    fn watermark_orders_by_datestamp_then_id() {
        let early = Watermark::new(
            ts("2024-01-01T00:00:00Z"),
            RecordId::new("zzz").unwrap(),
        );
        let late = Watermark::new(
            ts("2024-01-02T00:00:00Z"),
            RecordId::new("aaa").unwrap(),
        );
        assert!(early < late);

        let tie_a = Watermark::new(ts("2024-01-01T00:00:00Z"), RecordId::new("a").unwrap());
        let tie_b = Watermark::new(ts("2024-01-01T00:00:00Z"), RecordId::new("b").unwrap());
        assert!(tie_a < tie_b);
    }

    #[test]
    fn successor_preserves_filters_and_advances_watermark() {
        let cursor = sample_cursor();
        let wm = Watermark::new(ts("2024-05-01T00:00:00Z"), RecordId::new("r1").unwrap());
        let next = cursor.derive_successor(wm.clone(), ts("2024-06-01T01:00:00Z"));

        assert_eq!(next.metadata_prefix(), cursor.metadata_prefix());
        assert_eq!(next.page_size(), cursor.page_size());
        assert_eq!(next.watermark(), Some(&wm));
        assert_eq!(next.issued_at(), ts("2024-06-01T01:00:00Z"));
        // The original is untouched.
        assert_eq!(cursor.watermark(), None);
    }

    #[test]
    fn expiry_is_a_hard_deadline() {
        let cursor = sample_cursor();
        assert!(!cursor.is_expired(ts("2024-06-01T23:59:59Z")));
        assert!(!cursor.is_expired(ts("2024-06-02T00:00:00Z")));
        assert!(cursor.is_expired(ts("2024-06-02T00:00:01Z")));
    }

    #[test]
    fn page_size_is_clamped_to_at_least_one() {
        let cursor = Cursor::first_page(
            MetadataPrefix::new("oai_dc").unwrap(),
            None,
            None,
            None,
            Granularity::Day,
            0,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Duration::hours(1),
        );
        assert_eq!(cursor.page_size(), 1);
    }

    #[test]
    fn serde_round_trip() {
        let cursor = sample_cursor();
        let json = serde_json::to_string(&cursor).unwrap();
        let back: Cursor = serde_json::from_str(&json).unwrap();
        assert_eq!(cursor, back);
    }
}
