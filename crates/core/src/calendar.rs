//! Calendar helpers.
//!
//! Dates in the bundled datasets arrive in several textual shapes (ISO dates,
//! ISO timestamps, the day-first `DD-MM-YYYY` export format). Everything is
//! reduced to a [`NaiveDate`]; calculators never read the system clock.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Parse a calendar date from any of the accepted textual forms.
///
/// Accepted: `YYYY-MM-DD`, `DD-MM-YYYY`, `YYYY/MM/DD`, RFC 3339 timestamps and
/// naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps. Returns `None` otherwise.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.date_naive());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ts.date());
        }
    }

    None
}

/// Add the whole-day part of a (possibly fractional) day count to a date.
///
/// Returns `None` for non-finite or out-of-range offsets.
pub fn add_whole_days(date: NaiveDate, days: f64) -> Option<NaiveDate> {
    if !days.is_finite() {
        return None;
    }
    let whole = days.trunc();
    if whole.abs() > 1_000_000.0 {
        return None;
    }
    date.checked_add_signed(Duration::days(whole as i64))
}

/// Inclusive calendar window `[start, end]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Build a window from `(year, month, day)` triples; `None` for invalid dates.
    pub fn from_ymd(start: (i32, u32, u32), end: (i32, u32, u32)) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2)?,
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days used to average a window: `end - start`, at least 1.
    pub fn averaging_days(&self) -> i64 {
        (self.end - self.start).num_days().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_calendar_date("2024-03-15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_calendar_date("15-03-2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_calendar_date("2024/03/15"), Some(date(2024, 3, 15)));
        assert_eq!(
            parse_calendar_date("2024-03-15T21:00:00.000Z"),
            Some(date(2024, 3, 15))
        );
        assert_eq!(
            parse_calendar_date("2024-03-15T08:30:00"),
            Some(date(2024, 3, 15))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("not a date"), None);
        assert_eq!(parse_calendar_date("31-02-2024"), None);
    }

    #[test]
    fn add_whole_days_truncates_fractions() {
        assert_eq!(add_whole_days(date(2024, 1, 30), 2.9), Some(date(2024, 2, 1)));
        assert_eq!(add_whole_days(date(2024, 1, 30), 0.4), Some(date(2024, 1, 30)));
        assert_eq!(add_whole_days(date(2024, 1, 30), f64::NAN), None);
    }

    #[test]
    fn window_is_inclusive_and_averages_over_at_least_one_day() {
        let w = DateWindow::from_ymd((2024, 3, 1), (2024, 3, 11)).unwrap();
        assert!(w.contains(date(2024, 3, 1)));
        assert!(w.contains(date(2024, 3, 11)));
        assert!(!w.contains(date(2024, 3, 12)));
        assert_eq!(w.averaging_days(), 10);

        let single = DateWindow::new(date(2024, 3, 1), date(2024, 3, 1));
        assert_eq!(single.averaging_days(), 1);
    }
}
