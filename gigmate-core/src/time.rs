//! Time utilities: clock seam and timezone-aware hour-of-day.

use anyhow::Result;
use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

/// Source of "now" for scoring. Swapped for a fixed instant in tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parse an IANA tz like "Asia/Kolkata".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Local hour (0-23) of a UTC instant in `tz`.
pub fn local_hour(now: DateTime<Utc>, tz: Tz) -> u32 {
    now.with_timezone(&tz).hour()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kolkata_hour() {
        // IST is UTC+5:30
        let utc = Utc.with_ymd_and_hms(2026, 2, 19, 14, 30, 0).unwrap();
        let tz = parse_timezone("Asia/Kolkata").unwrap();
        assert_eq!(local_hour(utc, tz), 20);
    }

    #[test]
    fn test_invalid_timezone() {
        assert!(parse_timezone("Mars/Olympus").is_err());
    }
}
