//! When to stop reading the feed.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::types::{Cursor, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Emit,
    /// Older than the cutoff: end the whole export.
    Stop,
}

/// Start of the cutoff day in the reference zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff {
    date: NaiveDate,
    instant: DateTime<Utc>,
}

impl Cutoff {
    /// Parse a `YYYY-MM-DD` cutoff in `zone`.
    pub fn parse(raw: &str, zone: Tz) -> Result<Self> {
        let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid cutoff date '{raw}' (expected YYYY-MM-DD)"))?;
        Self::at_start_of(date, zone)
    }

    pub fn at_start_of(date: NaiveDate, zone: Tz) -> Result<Self> {
        let midnight = date.and_hms_opt(0, 0, 0).context("midnight out of range")?;
        let local = zone
            .from_local_datetime(&midnight)
            .earliest()
            .ok_or_else(|| anyhow::anyhow!("start of {date} does not exist in {zone}"))?;

        Ok(Self {
            date,
            instant: local.with_timezone(&Utc),
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Strictly earlier than the cutoff stops; the cutoff instant itself is kept.
    pub fn verdict(&self, at: DateTime<Utc>) -> Verdict {
        if at < self.instant {
            Verdict::Stop
        } else {
            Verdict::Emit
        }
    }
}

/// Where to read next after finishing `page`; `None` once the feed is exhausted.
pub fn continuation(page: &Page) -> Option<Cursor> {
    Cursor::from_next_id(&page.next_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_boundary_is_emitted() {
        let cutoff = Cutoff::parse("2024-10-01", Tz::UTC).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap();

        assert_eq!(cutoff.instant(), start);
        assert_eq!(cutoff.verdict(start), Verdict::Emit);
        assert_eq!(cutoff.verdict(start + Duration::hours(5)), Verdict::Emit);
        assert_eq!(cutoff.verdict(start - Duration::seconds(1)), Verdict::Stop);
    }

    #[test]
    fn test_cutoff_in_reference_zone() {
        let cutoff = Cutoff::parse("2024-10-01", chrono_tz::America::Chicago).unwrap();
        assert_eq!(cutoff.instant().to_rfc3339(), "2024-10-01T05:00:00+00:00");
        assert_eq!(cutoff.date(), NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
    }

    #[test]
    fn test_continuation_follows_next_id() {
        let mut page = Page::default();
        assert_eq!(continuation(&page), None);

        page.next_id = "c2".to_string();
        assert_eq!(continuation(&page).unwrap().token(), Some("c2"));
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(Cutoff::parse("10/01/2024", Tz::UTC).is_err());
        assert!(Cutoff::parse("2024-13-01", Tz::UTC).is_err());
        assert!(Cutoff::parse("", Tz::UTC).is_err());
    }
}
