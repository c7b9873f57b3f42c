//! Query normalization.
//!
//! Converts raw, harvester-supplied selective-harvesting parameters into
//! the initial [`Cursor`] of a harvest, or fails with a typed error. This
//! is the only place request strings are parsed; every later page flows in
//! through the token codec instead and the page producer cannot tell the
//! difference.

use chrono::{DateTime, Utc};
use tracing::debug;

use gleaner_core::{
    Cursor, Datestamp, Error, FormatRegistry, Granularity, MetadataPrefix, Result, SetSpec,
};

use crate::config::HarvestConfig;
use crate::harvest::HarvestRequest;

/// Validate and canonicalize fresh harvest parameters into a first-page
/// cursor.
///
/// Emptiness of the result set is not checked here; it is only
/// discoverable by running the first page.
///
/// # Errors
///
/// - [`Error::BadArgument`] when `metadata_prefix` is missing.
/// - [`Error::InvalidInput`] when the prefix or set fails syntactic
///   validation.
/// - [`Error::CannotDisseminateFormat`] when the prefix is unknown to the
///   registry.
/// - [`Error::InvalidDateRange`] for unparsable dates, mixed granularity,
///   or `from > until`.
pub fn normalize<R: FormatRegistry>(
    request: &HarvestRequest,
    registry: &R,
    config: &HarvestConfig,
    now: DateTime<Utc>,
) -> Result<Cursor> {
    let prefix_raw = request
        .metadata_prefix
        .as_deref()
        .ok_or_else(|| Error::BadArgument {
            message: "metadataPrefix is required".to_string(),
        })?;
    let prefix = MetadataPrefix::new(prefix_raw)?;

    if !registry.exists(&prefix) {
        return Err(Error::CannotDisseminateFormat {
            prefix: prefix.as_str().to_string(),
        });
    }

    let set = request.set.as_deref().map(SetSpec::new).transpose()?;

    let from = parse_bound(request.from.as_deref(), "from")?;
    let until = parse_bound(request.until.as_deref(), "until")?;

    // One consistent granularity for the life of the harvest.
    let granularity = match (from, until) {
        (Some(f), Some(u)) if f.granularity() != u.granularity() => {
            return Err(Error::InvalidDateRange {
                reason: format!(
                    "from has granularity {} but until has {}",
                    f.granularity(),
                    u.granularity()
                ),
            });
        }
        (Some(d), _) | (None, Some(d)) => d.granularity(),
        (None, None) => Granularity::Second,
    };

    let from_bound = from.map(|d| d.lower_bound());
    let until_bound = until.map(|d| d.upper_bound());
    if let (Some(f), Some(u)) = (from_bound, until_bound)
        && f > u
    {
        return Err(Error::InvalidDateRange {
            reason: "from is later than until".to_string(),
        });
    }

    debug!(prefix = %prefix, ?set, ?from_bound, ?until_bound, "Normalized harvest request");

    Ok(Cursor::first_page(
        prefix,
        set,
        from_bound,
        until_bound,
        granularity,
        config.default_page_size,
        now,
        config.token_ttl,
    ))
}

fn parse_bound(raw: Option<&str>, name: &str) -> Result<Option<Datestamp>> {
    raw.map(|s| {
        Datestamp::parse(s).map_err(|_| Error::InvalidDateRange {
            reason: format!("{} '{}' is not a valid datestamp", name, s),
        })
    })
    .transpose()
}
