//! File-backed format registry.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use gleaner_core::{Error, FormatRegistry, MetadataPrefix, Result};

fn map_io(err: std::io::Error) -> Error {
    Error::StoreUnavailable {
        message: format!("IO error: {}", err),
    }
}

/// Format registry read from `store/formats.json` (a JSON array of
/// prefix strings).
///
/// The prefix list is loaded once at construction; [`add`](Self::add)
/// extends both the in-memory set and the file.
#[derive(Debug, Clone)]
pub struct FileFormatRegistry {
    path: PathBuf,
    prefixes: HashSet<MetadataPrefix>,
}

impl FileFormatRegistry {
    /// Load the registry under the given store root. A missing file means
    /// an empty registry.
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let path = root.as_ref().join("store").join("formats.json");

        let prefixes = if path.exists() {
            let content = fs::read_to_string(&path).map_err(map_io)?;
            let raw: Vec<String> =
                serde_json::from_str(&content).map_err(|e| Error::StoreUnavailable {
                    message: format!("corrupt formats file {}: {}", path.display(), e),
                })?;
            raw.into_iter()
                .map(MetadataPrefix::new)
                .collect::<Result<_>>()?
        } else {
            HashSet::new()
        };

        debug!(formats = prefixes.len(), "Loaded format registry");
        Ok(Self { path, prefixes })
    }

    /// Register a new disseminable format.
    pub fn add(&mut self, prefix: MetadataPrefix) -> Result<()> {
        self.prefixes.insert(prefix);
        let mut raw: Vec<&str> = self.prefixes.iter().map(MetadataPrefix::as_str).collect();
        raw.sort_unstable();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(map_io)?;
        }
        let content = serde_json::to_string_pretty(&raw).map_err(|e| Error::StoreUnavailable {
            message: e.to_string(),
        })?;
        fs::write(&self.path, content).map_err(map_io)?;
        Ok(())
    }

    /// The registered prefixes, in sorted order.
    pub fn list(&self) -> Vec<&MetadataPrefix> {
        let mut prefixes: Vec<&MetadataPrefix> = self.prefixes.iter().collect();
        prefixes.sort_unstable_by_key(|p| p.as_str());
        prefixes
    }
}

impl FormatRegistry for FileFormatRegistry {
    fn exists(&self, prefix: &MetadataPrefix) -> bool {
        self.prefixes.contains(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_an_empty_registry() {
        let dir = TempDir::new().unwrap();
        let registry = FileFormatRegistry::load(dir.path()).unwrap();
        assert!(!registry.exists(&MetadataPrefix::new("oai_dc").unwrap()));
        assert!(registry.list().is_empty());
    }

    #[test]
    fn added_formats_survive_a_reload() {
        let dir = TempDir::new().unwrap();
        let mut registry = FileFormatRegistry::load(dir.path()).unwrap();
        registry.add(MetadataPrefix::new("oai_dc").unwrap()).unwrap();
        registry.add(MetadataPrefix::new("marc21").unwrap()).unwrap();

        let reloaded = FileFormatRegistry::load(dir.path()).unwrap();
        assert!(reloaded.exists(&MetadataPrefix::new("oai_dc").unwrap()));
        assert!(reloaded.exists(&MetadataPrefix::new("marc21").unwrap()));
        assert!(!reloaded.exists(&MetadataPrefix::new("mods").unwrap()));
    }
}
