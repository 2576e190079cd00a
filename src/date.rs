use anyhow::{anyhow, bail, Result};
use time::{Date, Month};

/// Parse a zero-padded "YYYY-MM-DD" calendar day.
pub fn parse_day(s: &str) -> Result<Date> {
    let parts: Vec<_> = s.trim().split('-').collect();
    if parts.len() != 3 {
        bail!("expected YYYY-MM-DD, got {:?}", s);
    }
    let year: i32 = parts[0].parse().map_err(|_| anyhow!("invalid year in {:?}", s))?;
    let month: u8 = parts[1].parse().map_err(|_| anyhow!("invalid month in {:?}", s))?;
    let day: u8 = parts[2].parse().map_err(|_| anyhow!("invalid day in {:?}", s))?;
    let month = Month::try_from(month).map_err(|_| anyhow!("month must be 01..12 in {:?}", s))?;
    Date::from_calendar_date(year, month, day).map_err(|e| anyhow!("invalid day {:?}: {}", s, e))
}

/// Inclusive publish-date window applied to every search request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublishWindow {
    pub after: Date,  // inclusive
    pub before: Date, // inclusive
}

impl PublishWindow {
    pub fn new(after: Date, before: Date) -> Self {
        assert!(after <= before, "publish window start must not exceed its end");
        Self { after, before }
    }

    /// RFC3339 midnight timestamp for the `publishedAfter` request parameter.
    pub fn published_after(&self) -> String {
        midnight_utc(self.after)
    }

    /// RFC3339 midnight timestamp for the `publishedBefore` request parameter.
    pub fn published_before(&self) -> String {
        midnight_utc(self.before)
    }
}

fn midnight_utc(d: Date) -> String {
    format!("{:04}-{:02}-{:02}T00:00:00Z", d.year(), u8::from(d.month()), d.day())
}

/// Date component of an RFC3339 timestamp ("2021-05-04T07:00:00Z" → "2021-05-04").
/// Endpoint timestamps are zero-padded, so the extracted strings sort
/// chronologically under plain lexicographic comparison.
pub fn day_of(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}
