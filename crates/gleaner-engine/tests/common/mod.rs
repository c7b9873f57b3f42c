//! Shared test fixtures: an in-memory record store, a manual clock, and a
//! static format registry.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use gleaner_core::{
    DeletionPolicy, Error, FormatRegistry, HierarchicalSets, MetadataDoc, MetadataPrefix,
    RangeQuery, RecordId, RecordStore, Result, SetResolver, SetSpec, StoredRecord,
};
use gleaner_engine::{SigningKey, SigningKeys};

pub fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

pub fn test_keys() -> SigningKeys {
    SigningKeys::new(SigningKey::new(b"integration test key".to_vec()))
}

/// A record as held by the in-memory store: metadata per format prefix.
#[derive(Debug, Clone)]
pub struct MemRecord {
    pub id: String,
    pub last_modified: DateTime<Utc>,
    pub deleted: bool,
    pub sets: Vec<String>,
    pub formats: BTreeMap<String, serde_json::Value>,
}

impl MemRecord {
    /// A live oai_dc record with a title derived from its id.
    pub fn dc(id: &str, last_modified: &str) -> Self {
        Self {
            id: id.to_string(),
            last_modified: ts(last_modified),
            deleted: false,
            sets: Vec::new(),
            formats: BTreeMap::from([("oai_dc".to_string(), json!({ "title": id }))]),
        }
    }

    pub fn in_sets(mut self, sets: &[&str]) -> Self {
        self.sets = sets.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn tombstone(mut self) -> Self {
        self.deleted = true;
        self.formats.clear();
        self
    }

    pub fn without_formats(mut self) -> Self {
        self.formats.clear();
        self
    }
}

/// In-memory record store honoring the full range-query contract.
pub struct MemoryStore {
    records: Mutex<Vec<MemRecord>>,
    policy: DeletionPolicy,
    resolver: HierarchicalSets,
    pub queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new(records: Vec<MemRecord>) -> Self {
        Self::with_policy(records, DeletionPolicy::Persistent)
    }

    pub fn with_policy(records: Vec<MemRecord>, policy: DeletionPolicy) -> Self {
        Self {
            records: Mutex::new(records),
            policy,
            resolver: HierarchicalSets,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, record: MemRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn deletion_policy(&self) -> DeletionPolicy {
        self.policy
    }

    async fn page_after(&self, query: &RangeQuery) -> Result<Vec<StoredRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let records = self.records.lock().unwrap();
        let mut eligible: Vec<StoredRecord> = records
            .iter()
            .filter(|r| {
                if r.deleted && !query.include_deleted {
                    return false;
                }
                if !r.deleted && !r.formats.contains_key(query.prefix.as_str()) {
                    return false;
                }
                if let Some(from) = query.from
                    && r.last_modified < from
                {
                    return false;
                }
                if let Some(until) = query.until
                    && r.last_modified > until
                {
                    return false;
                }
                if let Some(filter) = &query.set {
                    let memberships: Vec<SetSpec> = r
                        .sets
                        .iter()
                        .map(|s| SetSpec::new(s.as_str()).unwrap())
                        .collect();
                    if !self.resolver.matches(filter, &memberships) {
                        return false;
                    }
                }
                true
            })
            .map(|r| StoredRecord {
                id: RecordId::new(r.id.as_str()).unwrap(),
                last_modified: r.last_modified,
                deleted: r.deleted,
                sets: r
                    .sets
                    .iter()
                    .map(|s| SetSpec::new(s.as_str()).unwrap())
                    .collect(),
                metadata: r
                    .formats
                    .get(query.prefix.as_str())
                    .map(|v| MetadataDoc::new(v.clone()).unwrap()),
            })
            .collect();

        eligible.sort_by(|a, b| a.watermark().cmp(&b.watermark()));

        let after = query.after.clone();
        let mut page: Vec<StoredRecord> = eligible
            .into_iter()
            .skip_while(|r| after.as_ref().is_some_and(|wm| r.watermark() <= *wm))
            .collect();
        page.truncate(query.limit);
        Ok(page)
    }
}

/// A store whose every query fails, for transient-error tests.
pub struct FailingStore;

#[async_trait]
impl RecordStore for FailingStore {
    fn deletion_policy(&self) -> DeletionPolicy {
        DeletionPolicy::Persistent
    }

    async fn page_after(&self, _query: &RangeQuery) -> Result<Vec<StoredRecord>> {
        Err(Error::StoreUnavailable {
            message: "connection refused".to_string(),
        })
    }
}

/// A store that never answers within any reasonable timeout.
pub struct SlowStore;

#[async_trait]
impl RecordStore for SlowStore {
    fn deletion_policy(&self) -> DeletionPolicy {
        DeletionPolicy::Persistent
    }

    async fn page_after(&self, _query: &RangeQuery) -> Result<Vec<StoredRecord>> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

/// Registry backed by a fixed prefix list.
pub struct StaticRegistry(HashSet<String>);

impl StaticRegistry {
    pub fn with(prefixes: &[&str]) -> Self {
        Self(prefixes.iter().map(|p| p.to_string()).collect())
    }
}

impl FormatRegistry for StaticRegistry {
    fn exists(&self, prefix: &MetadataPrefix) -> bool {
        self.0.contains(prefix.as_str())
    }
}

/// A settable clock shared between the test and the harvester.
#[derive(Clone)]
pub struct ManualClock(std::sync::Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    pub fn at(start: &str) -> Self {
        Self(std::sync::Arc::new(Mutex::new(ts(start))))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl gleaner_core::Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}
