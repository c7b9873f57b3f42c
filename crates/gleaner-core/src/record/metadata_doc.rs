//! Validated metadata document type.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, InvalidInputError};

/// A validated, format-rendered metadata payload.
///
/// This type guarantees the payload is a JSON object; it is otherwise
/// schema-agnostic, and interpretation is left to the serialization layer.
/// The invariant is enforced at construction and deserialization time,
/// making it impossible to hold an invalid document.
///
/// # Example
///
/// ```
/// use gleaner_core::MetadataDoc;
/// use serde_json::json;
///
/// let doc = MetadataDoc::new(json!({
///     "title": "On the Origin of Species",
///     "creator": "Darwin, Charles",
/// })).unwrap();
///
/// assert!(doc.as_value().get("title").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDoc(Value);

impl MetadataDoc {
    /// Create a new metadata document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object.
    pub fn new(value: Value) -> Result<Self, Error> {
        if !value.is_object() {
            return Err(Error::InvalidInput(InvalidInputError::MetadataDoc {
                reason: "metadata must be a JSON object".to_string(),
            }));
        }
        Ok(Self(value))
    }

    /// Returns the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the document and returns the underlying JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Serialize for MetadataDoc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MetadataDoc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        MetadataDoc::new(value).map_err(serde::de::Error::custom)
    }
}
