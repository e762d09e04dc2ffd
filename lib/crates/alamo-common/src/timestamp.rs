//! Timestamp fields that never fail the enclosing document.
//!
//! Keystone v2.0 and older Nova releases emit timestamps without a UTC
//! offset (`2012-02-05T00:00:00`) or with a space separator. Those are read as
//! UTC. Anything unparseable becomes `None`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Text(String),
    Other(IgnoredAny),
}

/// Parse `text` as RFC 3339, falling back to offset-less forms read as UTC.
#[must_use]
pub fn parse(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t.with_timezone(&Utc));
    }
    let text = text.strip_suffix('Z').unwrap_or(text);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// `deserialize_with` adapter for `Option<DateTime<Utc>>` fields.
///
/// # Errors
///
/// Never fails on the value itself; only propagates deserializer errors.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => parse(&text),
        Some(Raw::Other(_)) | None => None,
    })
}
