//! Backend datetimes.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Naive layouts the backend emits for `created_at` columns.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// UTC instant exchanged with the backend.
///
/// The backend serializes timezone-less datetimes, so deserialization accepts
/// RFC 3339 as well as naive ISO 8601 values (taken as UTC).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    /// Parses a backend datetime string.
    ///
    /// # Errors
    /// Returns [`chrono::ParseError`] when the value matches none of the
    /// accepted layouts.
    pub fn parse(value: &str) -> Result<Self, chrono::ParseError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }

        let [iso, spaced] = NAIVE_FORMATS;
        NaiveDateTime::parse_from_str(value, iso)
            .or_else(|_| NaiveDateTime::parse_from_str(value, spaced))
            .map(|naive| Self(naive.and_utc()))
    }

    /// Current instant.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
