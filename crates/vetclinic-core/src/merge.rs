//! Partial-update merge policy.
//!
//! Updates never re-run validation and never clear a stored value:
//! an absent or empty incoming field keeps what is stored. Values that
//! need parsing (decimals, dates, specialties, references) follow the
//! *ignore unparsable updates* policy: when they fail to parse the
//! field is left unchanged and nothing is reported to the caller.

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::models::vet::Specialty;
use crate::validation::{parse_date, parse_decimal, parse_reference};

/// Non-empty incoming text, or `None` to keep the stored value.
pub fn text(raw: Option<String>) -> Option<String> {
    raw.filter(|v| !v.is_empty())
}

/// Parse `raw` with `parse`; unparsable input keeps the stored value.
pub fn ignore_unparsable<T>(
    field: &str,
    raw: Option<String>,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    let raw = text(raw)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        debug!(field, value = %raw, "Ignoring unparsable update value");
    }
    parsed
}

pub fn decimal(field: &str, raw: Option<String>) -> Option<f64> {
    ignore_unparsable(field, raw, parse_decimal)
}

pub fn date(field: &str, raw: Option<String>) -> Option<NaiveDate> {
    ignore_unparsable(field, raw, parse_date)
}

pub fn specialty(field: &str, raw: Option<String>) -> Option<Specialty> {
    ignore_unparsable(field, raw, |v| v.parse().ok())
}

pub fn reference(field: &str, raw: Option<String>) -> Option<Uuid> {
    ignore_unparsable(field, raw, parse_reference)
}
