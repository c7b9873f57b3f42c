//! Format registry trait.

use crate::types::MetadataPrefix;

/// The repository's registry of disseminable metadata formats.
///
/// The query normalizer only existence-checks prefixes here; rendering a
/// record into a format is the record store's concern.
pub trait FormatRegistry: Send + Sync {
    /// Whether the repository can disseminate this format at all.
    fn exists(&self, prefix: &MetadataPrefix) -> bool;
}

impl<R: FormatRegistry + ?Sized> FormatRegistry for std::sync::Arc<R> {
    fn exists(&self, prefix: &MetadataPrefix) -> bool {
        (**self).exists(prefix)
    }
}
