//! Metadata prefix type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated metadata format prefix.
///
/// Prefixes name the disseminated format of a harvest (for example
/// `oai_dc`). Whether a prefix is actually supported by the repository is
/// a separate question answered by the
/// [`FormatRegistry`](crate::traits::FormatRegistry).
///
/// # Example
///
/// ```
/// use gleaner_core::MetadataPrefix;
///
/// let prefix = MetadataPrefix::new("oai_dc").unwrap();
/// assert_eq!(prefix.as_str(), "oai_dc");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MetadataPrefix(String);

impl MetadataPrefix {
    /// Create a new metadata prefix from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty or contains characters
    /// outside the protocol's prefix alphabet.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the prefix string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::MetadataPrefix {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        // Alphabet per the protocol: alphanumerics plus -_.!~*'()
        for c in s.chars() {
            if !c.is_ascii_alphanumeric() && !"-_.!~*'()".contains(c) {
                return Err(InvalidInputError::MetadataPrefix {
                    value: s.to_string(),
                    reason: format!("contains invalid character '{}'", c),
                }
                .into());
            }
        }

        Ok(())
    }
}

impl fmt::Display for MetadataPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MetadataPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for MetadataPrefix {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<MetadataPrefix> for String {
    fn from(prefix: MetadataPrefix) -> Self {
        prefix.0
    }
}

impl AsRef<str> for MetadataPrefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_prefix() {
        let prefix = MetadataPrefix::new("oai_dc").unwrap();
        assert_eq!(prefix.as_str(), "oai_dc");
    }

    #[test]
    fn valid_prefix_with_punctuation() {
        assert!(MetadataPrefix::new("marc21.full~draft").is_ok());
    }

    #[test]
    fn invalid_empty() {
        assert!(MetadataPrefix::new("").is_err());
    }

    #[test]
    fn invalid_whitespace() {
        assert!(MetadataPrefix::new("oai dc").is_err());
    }

    #[test]
    fn invalid_slash() {
        assert!(MetadataPrefix::new("oai/dc").is_err());
    }

    #[test]
    fn usable_as_an_ordered_map_key() {
        use std::collections::BTreeMap;

        let map = BTreeMap::from([
            (MetadataPrefix::new("oai_dc").unwrap(), 1),
            (MetadataPrefix::new("marc21").unwrap(), 2),
        ]);
        let keys: Vec<&str> = map.keys().map(MetadataPrefix::as_str).collect();
        assert_eq!(keys, vec!["marc21", "oai_dc"]);
    }
}
