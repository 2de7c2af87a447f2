use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Timestamps as the Graph security API emits them: UTC, fractional
/// seconds, literal `Z`. e.g. `2022-07-19T17:48:25.018305Z`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Strict parse against the single expected pattern. No fallback formats:
/// offset forms, missing `Z`, or free text are errors.
pub fn utc_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| anyhow!("invalid timestamp '{}': {}", raw, e))
}
