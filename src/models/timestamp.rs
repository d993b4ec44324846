//! Instant representation: signed 64-bit nanoseconds since the Unix epoch
//! at rest, ISO-8601 strings at the HTTP boundary.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

pub const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Rendering used when a stored instant cannot be decoded or displayed.
pub const UNREPRESENTABLE: &str = "unrepresentable";

/// An instant in time, stored as nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Sentinel for instants that could not be decoded from storage.
    pub const SENTINEL: Timestamp = Timestamp(i64::MIN);

    pub fn from_nanos(nanos: i64) -> Self {
        Timestamp(nanos)
    }

    pub fn as_nanos(self) -> i64 {
        self.0
    }

    /// Current instant from the system clock.
    pub fn now() -> Self {
        let now = Utc::now();
        let nanos = now
            .timestamp()
            .saturating_mul(NANOS_PER_SEC)
            .saturating_add(i64::from(now.timestamp_subsec_nanos()));
        Timestamp(nanos)
    }

    pub fn is_sentinel(self) -> bool {
        self.0 == i64::MIN
    }

    /// Whole days between `self` and `other` (positive when `self` is later).
    pub fn days_since(self, other: Timestamp) -> i64 {
        self.0.saturating_sub(other.0) / (NANOS_PER_SEC * 86_400)
    }

    pub fn minus_days(self, days: i64) -> Timestamp {
        Timestamp(self.0.saturating_sub(days.saturating_mul(NANOS_PER_SEC * 86_400)))
    }

    pub fn plus_days(self, days: i64) -> Timestamp {
        Timestamp(self.0.saturating_add(days.saturating_mul(NANOS_PER_SEC * 86_400)))
    }

    /// Render as an ISO-8601 string for the HTTP boundary.
    ///
    /// The sentinel (and any instant chrono cannot represent) renders as
    /// [`UNREPRESENTABLE`] rather than failing the whole response.
    pub fn to_iso8601(self) -> String {
        if self.is_sentinel() {
            return UNREPRESENTABLE.to_string();
        }
        let secs = self.0.div_euclid(NANOS_PER_SEC);
        let nanos = self.0.rem_euclid(NANOS_PER_SEC) as u32;
        match DateTime::<Utc>::from_timestamp(secs, nanos) {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => UNREPRESENTABLE.to_string(),
        }
    }

    /// Parse an ISO-8601 / RFC 3339 string from the HTTP boundary.
    pub fn parse_iso8601(s: &str) -> Option<Timestamp> {
        let dt = DateTime::parse_from_rfc3339(s).ok()?;
        let nanos = dt
            .timestamp()
            .checked_mul(NANOS_PER_SEC)?
            .checked_add(i64::from(dt.timestamp_subsec_nanos()))?;
        Some(Timestamp(nanos))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    /// Lenient: a malformed stored instant decodes to the sentinel instead of
    /// failing the record it sits in.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_i64().map(Timestamp).unwrap_or(Timestamp::SENTINEL))
    }
}
