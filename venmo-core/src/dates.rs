//! Timestamp parsing for feed stories.
//!
//! Stories carry either a full RFC 3339 timestamp or a bare local
//! `YYYY-MM-DDTHH:MM:SS`. Bare timestamps are read in the same reference
//! zone as the cutoff date so both sides of the comparison agree on where a
//! day starts.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::RecordError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `2024-10-04T13:28:52Z`, `2024-10-04T13:28:52-05:00`
    Rfc3339,
    /// `2024-10-04T13:28:52`, read in the reference zone
    NaiveLocal,
}

impl TimestampFormat {
    /// Tried in this order; the first success wins.
    pub const CANDIDATES: [TimestampFormat; 2] =
        [TimestampFormat::Rfc3339, TimestampFormat::NaiveLocal];

    pub fn name(&self) -> &'static str {
        match self {
            TimestampFormat::Rfc3339 => "rfc3339",
            TimestampFormat::NaiveLocal => "%Y-%m-%dT%H:%M:%S",
        }
    }

    fn parse(&self, raw: &str, zone: Tz) -> Option<DateTime<Utc>> {
        match self {
            TimestampFormat::Rfc3339 => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            TimestampFormat::NaiveLocal => {
                let ndt = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
                // DST fold: earlier instant. DST gap: no such local time.
                zone.from_local_datetime(&ndt)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
            }
        }
    }
}

/// Parses story timestamps against a fixed reference zone.
#[derive(Debug, Clone, Copy)]
pub struct TimestampParser {
    zone: Tz,
}

impl TimestampParser {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn parse(&self, raw: &str) -> Result<DateTime<Utc>, RecordError> {
        TimestampFormat::CANDIDATES
            .iter()
            .find_map(|format| format.parse(raw, self.zone))
            .ok_or_else(|| RecordError::Date {
                raw: raw.to_string(),
                tried: TimestampFormat::CANDIDATES.iter().map(|f| f.name()).collect(),
            })
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}
