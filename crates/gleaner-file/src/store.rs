//! Filesystem storage for records.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use gleaner_core::{
    DeletionPolicy, Error, HierarchicalSets, InvalidInputError, MetadataDoc, MetadataPrefix,
    RangeQuery, RecordId, RecordStore, Result, SetResolver, SetSpec, StoredRecord,
};

fn map_io(err: std::io::Error) -> Error {
    Error::StoreUnavailable {
        message: format!("IO error: {}", err),
    }
}

/// On-disk shape of one record: metadata held per format prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordFile {
    id: String,
    last_modified: DateTime<Utc>,
    deleted: bool,
    sets: Vec<String>,
    metadata: BTreeMap<String, serde_json::Value>,
}

/// Filesystem-backed record store.
///
/// Each record lives in its own JSON file under `store/records/`; mutations
/// take an advisory lock and write atomically via tmp + rename.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    policy: DeletionPolicy,
    resolver: HierarchicalSets,
}

impl FileStore {
    /// Create a store at the given root directory with the default
    /// `Persistent` deletion policy.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_policy(root, DeletionPolicy::Persistent)
    }

    /// Create a store with an explicit deletion policy.
    pub fn with_policy(root: impl AsRef<Path>, policy: DeletionPolicy) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            policy,
            resolver: HierarchicalSets,
        }
    }

    /// Get the root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the store data directory.
    pub fn store_dir(&self) -> PathBuf {
        self.root.join("store")
    }

    fn records_dir(&self) -> PathBuf {
        self.store_dir().join("records")
    }

    fn lock_path(&self) -> PathBuf {
        self.store_dir().join("records.lock")
    }

    /// Convert an identifier into a filesystem-safe file name.
    ///
    /// Sanitization alone is not injective (`oai:a` and `oai_a` would share
    /// a stem), so a digest suffix of the canonical identifier keeps each
    /// record in its own file.
    fn file_stem_for(id: &RecordId) -> String {
        let sanitized: String = id
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || "._-".contains(c) {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let digest = Sha256::digest(id.as_str().as_bytes());
        format!("{}-{}", sanitized, hex::encode(&digest[..8]))
    }

    fn record_path(&self, id: &RecordId) -> PathBuf {
        self.records_dir()
            .join(format!("{}.json", Self::file_stem_for(id)))
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        fs::create_dir_all(self.store_dir()).map_err(map_io)?;
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(map_io)?;
        lock_file.lock_exclusive().map_err(map_io)?;
        let result = f();
        lock_file.unlock().map_err(map_io)?;
        result
    }

    fn write_record(&self, record: &RecordFile) -> Result<()> {
        let id = RecordId::new(record.id.as_str())?;
        let path = self.record_path(&id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }

        let content = serde_json::to_string_pretty(record).map_err(|e| {
            Error::InvalidInput(InvalidInputError::Other {
                message: e.to_string(),
            })
        })?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content).map_err(map_io)?;
        fs::rename(&temp_path, &path).map_err(map_io)?;
        Ok(())
    }

    fn load_record(&self, path: &Path) -> Result<RecordFile> {
        let content = fs::read_to_string(path).map_err(map_io)?;
        serde_json::from_str(&content).map_err(|e| Error::StoreUnavailable {
            message: format!("corrupt record file {}: {}", path.display(), e),
        })
    }

    /// Create or replace a record.
    #[instrument(skip(self, metadata))]
    pub fn put_record(
        &self,
        id: &RecordId,
        sets: &[SetSpec],
        metadata: BTreeMap<MetadataPrefix, MetadataDoc>,
        last_modified: DateTime<Utc>,
    ) -> Result<()> {
        let record = RecordFile {
            id: id.as_str().to_string(),
            last_modified,
            deleted: false,
            sets: sets.iter().map(|s| s.as_str().to_string()).collect(),
            metadata: metadata
                .into_iter()
                .map(|(prefix, doc)| (prefix.as_str().to_string(), doc.into_value()))
                .collect(),
        };

        self.with_lock(|| self.write_record(&record))?;
        debug!(id = %id, "Stored record");
        Ok(())
    }

    /// Tombstone a record, or remove it outright under `NoTracking`.
    #[instrument(skip(self))]
    pub fn tombstone(&self, id: &RecordId, at: DateTime<Utc>) -> Result<()> {
        let path = self.record_path(id);

        self.with_lock(|| {
            if !path.exists() {
                return Err(Error::InvalidInput(InvalidInputError::Other {
                    message: format!("record {} not found", id),
                }));
            }

            if self.policy == DeletionPolicy::NoTracking {
                fs::remove_file(&path).map_err(map_io)?;
                return Ok(());
            }

            let mut record = self.load_record(&path)?;
            record.deleted = true;
            record.metadata.clear();
            record.last_modified = at;
            self.write_record(&record)
        })?;

        debug!(id = %id, "Deleted record");
        Ok(())
    }

    fn to_stored(&self, record: RecordFile, prefix: &MetadataPrefix) -> Result<StoredRecord> {
        let corrupt = |e: Error| Error::StoreUnavailable {
            message: format!("corrupt record '{}': {}", record.id, e),
        };
        let metadata = record
            .metadata
            .get(prefix.as_str())
            .cloned()
            .map(MetadataDoc::new)
            .transpose()
            .map_err(corrupt)?;
        Ok(StoredRecord {
            id: RecordId::new(record.id.as_str()).map_err(corrupt)?,
            last_modified: record.last_modified,
            deleted: record.deleted,
            sets: record
                .sets
                .iter()
                .map(|s| SetSpec::new(s.as_str()))
                .collect::<Result<_>>()
                .map_err(corrupt)?,
            metadata,
        })
    }

    fn matches(&self, record: &RecordFile, query: &RangeQuery) -> bool {
        if record.deleted && !query.include_deleted {
            return false;
        }
        if !record.deleted && !record.metadata.contains_key(query.prefix.as_str()) {
            return false;
        }
        if let Some(from) = query.from
            && record.last_modified < from
        {
            return false;
        }
        if let Some(until) = query.until
            && record.last_modified > until
        {
            return false;
        }
        if let Some(filter) = &query.set {
            let memberships: Vec<SetSpec> = record
                .sets
                .iter()
                .filter_map(|s| SetSpec::new(s.as_str()).ok())
                .collect();
            if !self.resolver.matches(filter, &memberships) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl RecordStore for FileStore {
    fn deletion_policy(&self) -> DeletionPolicy {
        self.policy
    }

    #[instrument(skip(self, query), fields(prefix = %query.prefix))]
    async fn page_after(&self, query: &RangeQuery) -> Result<Vec<StoredRecord>> {
        let dir = self.records_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut matching = Vec::new();
        for entry in fs::read_dir(&dir).map_err(map_io)? {
            let entry = entry.map_err(map_io)?;
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let record = self.load_record(&path)?;
            if self.matches(&record, query) {
                matching.push(self.to_stored(record, &query.prefix)?);
            }
        }

        matching.sort_by(|a, b| a.watermark().cmp(&b.watermark()));

        let mut page: Vec<StoredRecord> = matching
            .into_iter()
            .skip_while(|r| {
                query
                    .after
                    .as_ref()
                    .is_some_and(|wm| r.watermark() <= *wm)
            })
            .collect();
        page.truncate(query.limit);

        debug!(returned = page.len(), "Ran range query");
        Ok(page)
    }
}
