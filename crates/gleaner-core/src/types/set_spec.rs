//! Set specifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated hierarchical set specifier.
///
/// Set specifiers are colon-separated paths; a record belonging to
/// `institution:college:dept` also belongs, transitively, to every set
/// above it in the hierarchy.
///
/// # Example
///
/// ```
/// use gleaner_core::SetSpec;
///
/// let parent = SetSpec::new("institution:college").unwrap();
/// let child = SetSpec::new("institution:college:dept").unwrap();
/// assert!(parent.encloses(&child));
/// assert!(!child.encloses(&parent));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SetSpec(String);

impl SetSpec {
    /// Create a new set spec from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, has an empty segment, or a
    /// segment contains characters outside the set-spec alphabet.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the full set spec string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path segments of the spec.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(':')
    }

    /// Whether `other` is this set or a descendant of it.
    pub fn encloses(&self, other: &SetSpec) -> bool {
        let mut mine = self.segments();
        let mut theirs = other.segments();
        loop {
            match (mine.next(), theirs.next()) {
                (Some(a), Some(b)) if a == b => continue,
                (Some(_), _) => return false,
                (None, _) => return true,
            }
        }
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::SetSpec {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        for (i, segment) in s.split(':').enumerate() {
            if segment.is_empty() {
                return Err(InvalidInputError::SetSpec {
                    value: s.to_string(),
                    reason: format!("segment {} is empty", i + 1),
                }
                .into());
            }

            for c in segment.chars() {
                if !c.is_ascii_alphanumeric() && !"-_.!~*'()".contains(c) {
                    return Err(InvalidInputError::SetSpec {
                        value: s.to_string(),
                        reason: format!("segment '{}' contains invalid character '{}'", segment, c),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for SetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SetSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SetSpec {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<SetSpec> for String {
    fn from(spec: SetSpec) -> Self {
        spec.0
    }
}

impl AsRef<str> for SetSpec {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_flat_set() {
        let spec = SetSpec::new("history").unwrap();
        assert_eq!(spec.segments().count(), 1);
    }

    #[test]
    fn valid_hierarchical_set() {
        let spec = SetSpec::new("institution:college:dept").unwrap();
        assert_eq!(spec.segments().count(), 3);
    }

    #[test]
    fn invalid_empty() {
        assert!(SetSpec::new("").is_err());
    }

    #[test]
    fn invalid_empty_segment() {
        assert!(SetSpec::new("a::b").is_err());
        assert!(SetSpec::new(":a").is_err());
        assert!(SetSpec::new("a:").is_err());
    }

    #[test]
    fn encloses_self_and_descendants() {
        let a = SetSpec::new("x:y").unwrap();
        let b = SetSpec::new("x:y:z").unwrap();
        assert!(a.encloses(&a));
        assert!(a.encloses(&b));
        assert!(!b.encloses(&a));
    }

    #[test]
    fn encloses_requires_segment_boundary() {
        // "x:yz" is not a descendant of "x:y" even though it is a string prefix.
        let a = SetSpec::new("x:y").unwrap();
        let b = SetSpec::new("x:yz").unwrap();
        assert!(!a.encloses(&b));
    }
}
