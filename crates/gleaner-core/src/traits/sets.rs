//! Set hierarchy resolution.

use crate::types::SetSpec;

/// Decides whether a record's set memberships satisfy a set filter.
pub trait SetResolver: Send + Sync {
    /// Whether a record with the given memberships matches `filter`.
    fn matches(&self, filter: &SetSpec, memberships: &[SetSpec]) -> bool;
}

/// The standard resolver for colon-separated hierarchical sets.
///
/// A filter matches a record that belongs to the filtered set itself or to
/// any descendant of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchicalSets;

impl SetResolver for HierarchicalSets {
    fn matches(&self, filter: &SetSpec, memberships: &[SetSpec]) -> bool {
        memberships.iter().any(|m| filter.encloses(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(s: &str) -> SetSpec {
        SetSpec::new(s).unwrap()
    }

    #[test]
    fn matches_exact_and_descendant_memberships() {
        let resolver = HierarchicalSets;
        let filter = spec("inst:college");

        assert!(resolver.matches(&filter, &[spec("inst:college")]));
        assert!(resolver.matches(&filter, &[spec("other"), spec("inst:college:dept")]));
        assert!(!resolver.matches(&filter, &[spec("inst")]));
        assert!(!resolver.matches(&filter, &[]));
    }
}
