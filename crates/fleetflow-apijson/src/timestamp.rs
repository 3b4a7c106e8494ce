//! RFC 3339 date-time attribute
//!
//! A declared date-time attribute is in one of three states: not set, not yet
//! known (computed during planning), or a concrete instant. Instants are
//! normalized to UTC on the way in.
//!
//! Two renderings exist:
//!
//! - the serde encoding used by the structural marshaler, which is
//!   whole-second (`2024-12-31T23:59:59Z`)
//! - [`Rfc3339::to_rfc3339_nano`], which keeps every fractional digit the
//!   value carries (`2024-12-31T23:59:59.123456Z`)

use crate::error::{ApiJsonError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Date-time attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rfc3339 {
    /// Not set in configuration
    #[default]
    Null,
    /// Set, but only known after apply
    Unknown,
    /// Concrete instant (UTC)
    Known(DateTime<Utc>),
}

impl Rfc3339 {
    pub fn known(value: DateTime<Utc>) -> Self {
        Rfc3339::Known(value)
    }

    /// Parse any RFC 3339 timestamp, normalizing its offset to UTC
    pub fn parse(input: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(input.trim())
            .map(|dt| Rfc3339::Known(dt.with_timezone(&Utc)))
            .map_err(|e| ApiJsonError::InvalidTimestamp(format!("{}: {}", input, e)))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Rfc3339::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Rfc3339::Unknown)
    }

    /// True when there is no concrete instant to render
    pub fn is_unset(&self) -> bool {
        self.value().is_none()
    }

    pub fn value(&self) -> Option<DateTime<Utc>> {
        match self {
            Rfc3339::Known(dt) => Some(*dt),
            Rfc3339::Null | Rfc3339::Unknown => None,
        }
    }

    /// Full-precision rendering; `None` when the value is unset
    pub fn to_rfc3339_nano(&self) -> Option<String> {
        self.value().map(|dt| format_rfc3339_nano(&dt))
    }

    /// Whole-second rendering, as produced by the structural marshaler
    pub fn to_rfc3339_secs(&self) -> Option<String> {
        self.value()
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Render an instant with all significant fractional digits and a `Z` suffix.
///
/// Trailing zeros in the fraction are dropped, and the fraction disappears
/// entirely for whole seconds.
pub fn format_rfc3339_nano(value: &DateTime<Utc>) -> String {
    let full = value.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let body = full
        .trim_end_matches('Z')
        .trim_end_matches('0')
        .trim_end_matches('.');
    format!("{}Z", body)
}

impl From<DateTime<Utc>> for Rfc3339 {
    fn from(value: DateTime<Utc>) -> Self {
        Rfc3339::Known(value)
    }
}

impl FromStr for Rfc3339 {
    type Err = ApiJsonError;

    fn from_str(s: &str) -> Result<Self> {
        Rfc3339::parse(s)
    }
}

impl fmt::Display for Rfc3339 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rfc3339::Null => write!(f, "<null>"),
            Rfc3339::Unknown => write!(f, "<unknown>"),
            Rfc3339::Known(dt) => write!(f, "{}", format_rfc3339_nano(dt)),
        }
    }
}

impl Serialize for Rfc3339 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.to_rfc3339_secs() {
            Some(s) => serializer.serialize_str(&s),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Rfc3339 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Rfc3339::Null),
            Some(s) => Rfc3339::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}
