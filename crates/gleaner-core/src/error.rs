//! Error types for the gleaner harvesting engine.
//!
//! This module provides a unified error type with explicit variants for
//! client input errors, token errors, data errors, and transient
//! infrastructure errors, plus the mapping onto wire-visible protocol codes.

use thiserror::Error;

/// The unified error type for harvesting operations.
///
/// Variants are grouped by recovery semantics: client input errors and token
/// errors are never retried, `NoRecordsMatch` is a valid terminal outcome,
/// and `StoreUnavailable` is the only class a harvester may retry by
/// resubmitting the identical request.
#[derive(Debug, Error)]
pub enum Error {
    /// Input validation errors (malformed prefix, set, identifier, datestamp).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    /// Protocol violations in the request shape.
    #[error("bad argument: {message}")]
    BadArgument {
        /// Description of the violated rule.
        message: String,
    },

    /// Unparsable, mixed-granularity, or inverted date range.
    #[error("invalid date range: {reason}")]
    InvalidDateRange { reason: String },

    /// The metadata prefix is syntactically valid but unknown to the registry.
    #[error("cannot disseminate format '{prefix}'")]
    CannotDisseminateFormat { prefix: String },

    /// Malformed, forged, or expired resumption token.
    ///
    /// The three causes are deliberately indistinguishable; the variant
    /// carries no detail so no oracle exists between "expired" and "forged".
    #[error("bad resumption token")]
    BadResumptionToken,

    /// The filters match no records. A valid, terminal outcome.
    #[error("no records match the given criteria")]
    NoRecordsMatch,

    /// The record store could not be reached or timed out.
    #[error("record store unavailable: {message}")]
    StoreUnavailable { message: String },
}

impl Error {
    /// The wire-visible protocol code for this error, if any.
    ///
    /// `StoreUnavailable` has no protocol code; the surrounding transport
    /// maps it to a retryable server error instead.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Error::InvalidInput(_) | Error::BadArgument { .. } | Error::InvalidDateRange { .. } => {
                Some(ErrorCode::BadArgument)
            }
            Error::CannotDisseminateFormat { .. } => Some(ErrorCode::CannotDisseminateFormat),
            Error::BadResumptionToken => Some(ErrorCode::BadResumptionToken),
            Error::NoRecordsMatch => Some(ErrorCode::NoRecordsMatch),
            Error::StoreUnavailable { .. } => None,
        }
    }

    /// Whether the harvester may retry by resubmitting the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StoreUnavailable { .. })
    }
}

/// Wire-visible protocol error codes.
///
/// The surrounding HTTP/XML layer maps these one-to-one onto the protocol's
/// error envelope; this crate never formats error responses itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Missing, malformed, or mutually exclusive request arguments.
    BadArgument,
    /// The resumption token was rejected.
    BadResumptionToken,
    /// The selective-harvesting filters match nothing.
    NoRecordsMatch,
    /// The requested metadata format cannot be disseminated.
    CannotDisseminateFormat,
}

impl ErrorCode {
    /// The protocol spelling of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadArgument => "badArgument",
            ErrorCode::BadResumptionToken => "badResumptionToken",
            ErrorCode::NoRecordsMatch => "noRecordsMatch",
            ErrorCode::CannotDisseminateFormat => "cannotDisseminateFormat",
        }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid metadata prefix format.
    #[error("invalid metadata prefix '{value}': {reason}")]
    MetadataPrefix { value: String, reason: String },

    /// Invalid set specifier format.
    #[error("invalid set spec '{value}': {reason}")]
    SetSpec { value: String, reason: String },

    /// Invalid record identifier format.
    #[error("invalid record identifier '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Invalid datestamp format.
    #[error("invalid datestamp '{value}': {reason}")]
    Datestamp { value: String, reason: String },

    /// Invalid metadata document.
    #[error("invalid metadata document: {reason}")]
    MetadataDoc { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
