//! Datestamp parsing and granularity.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// The precision at which datestamps are written and compared.
///
/// Granularity is fixed for the life of one harvest: `from` and `until`
/// must agree, and every page of the harvest uses the granularity chosen
/// on the first request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Date-only precision, `YYYY-MM-DD`.
    Day,
    /// Date-time precision with seconds, `YYYY-MM-DDThh:mm:ssZ`.
    Second,
}

impl Granularity {
    /// The protocol spelling of this granularity's format pattern.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "YYYY-MM-DD",
            Granularity::Second => "YYYY-MM-DDThh:mm:ssZ",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed harvester-supplied datestamp.
///
/// Carries both the UTC instant and the granularity it was written at, so
/// the normalizer can reject mixed-granularity ranges and widen inclusive
/// bounds correctly.
///
/// # Example
///
/// ```
/// use gleaner_core::{Datestamp, Granularity};
///
/// let day = Datestamp::parse("2024-01-01").unwrap();
/// assert_eq!(day.granularity(), Granularity::Day);
///
/// let second = Datestamp::parse("2024-01-01T12:30:00Z").unwrap();
/// assert_eq!(second.granularity(), Granularity::Second);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datestamp {
    instant: DateTime<Utc>,
    granularity: Granularity,
}

impl Datestamp {
    /// Parse a datestamp string in either supported granularity.
    ///
    /// # Errors
    ///
    /// Returns an error if the string matches neither `YYYY-MM-DD` nor
    /// `YYYY-MM-DDThh:mm:ssZ`.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self {
                instant: NaiveDateTime::new(date, NaiveTime::MIN).and_utc(),
                granularity: Granularity::Day,
            });
        }

        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ") {
            return Ok(Self {
                instant: dt.and_utc(),
                granularity: Granularity::Second,
            });
        }

        Err(InvalidInputError::Datestamp {
            value: s.to_string(),
            reason: "expected YYYY-MM-DD or YYYY-MM-DDThh:mm:ssZ".to_string(),
        }
        .into())
    }

    /// The parsed UTC instant (start of day for day granularity).
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// The granularity the datestamp was written at.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// The inclusive lower bound this datestamp denotes as a `from` value.
    pub fn lower_bound(&self) -> DateTime<Utc> {
        self.instant
    }

    /// The inclusive upper bound this datestamp denotes as an `until` value.
    ///
    /// A day-granularity `until` covers the whole day, up to its final
    /// representable second.
    pub fn upper_bound(&self) -> DateTime<Utc> {
        match self.granularity {
            Granularity::Day => self.instant + Duration::days(1) - Duration::seconds(1),
            Granularity::Second => self.instant,
        }
    }
}

impl fmt::Display for Datestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.granularity {
            Granularity::Day => write!(f, "{}", self.instant.format("%Y-%m-%d")),
            Granularity::Second => write!(f, "{}", self.instant.format("%Y-%m-%dT%H:%M:%SZ")),
        }
    }
}

impl FromStr for Datestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
