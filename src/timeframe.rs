//! Timeframe selection and the date range handed to search sessions.
//!
//! A run always covers a window ending today. The four selectable windows
//! are fixed offsets:
//!
//! | Timeframe | Label | Days back |
//! |-----------|-------|-----------|
//! | `week` | 1 Week | 7 |
//! | `month` | 1 Month | 30 |
//! | `three-months` | 3 Months | 90 |
//! | `six-months` | 6 Months | 180 |

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use std::error::Error;
use std::fmt;

/// Format used by the search services for both ends of a range.
pub const RANGE_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Timeframe {
    Week,
    Month,
    ThreeMonths,
    SixMonths,
}

impl Timeframe {
    pub fn days(self) -> i64 {
        match self {
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::ThreeMonths => 90,
            Timeframe::SixMonths => 180,
        }
    }

    /// Human-facing label, e.g. `"3 Months"`.
    pub fn label(self) -> &'static str {
        match self {
            Timeframe::Week => "1 Week",
            Timeframe::Month => "1 Month",
            Timeframe::ThreeMonths => "3 Months",
            Timeframe::SixMonths => "6 Months",
        }
    }

    /// Label with spaces replaced, for use in output file names.
    pub fn file_label(self) -> String {
        self.label().replace(' ', "_")
    }

    /// The range ending on `today` and starting `days()` before it.
    pub fn range_ending(self, today: NaiveDate) -> DateRange {
        DateRange {
            start: today - Duration::days(self.days()),
            end: today,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An inclusive pair of calendar dates with `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, Box<dyn Error>> {
        if end < start {
            return Err(format!("date range ends ({end}) before it starts ({start})").into());
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Start date as `MM/DD/YYYY`.
    pub fn start_str(&self) -> String {
        self.start.format(RANGE_DATE_FORMAT).to_string()
    }

    /// End date as `MM/DD/YYYY`.
    pub fn end_str(&self) -> String {
        self.end.format(RANGE_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_str(), self.end_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_range_strings() {
        let range = Timeframe::Week.range_ending(ymd(2024, 3, 15));
        assert_eq!(range.start_str(), "03/08/2024");
        assert_eq!(range.end_str(), "03/15/2024");
    }

    #[test]
    fn test_month_offsets() {
        let today = ymd(2024, 3, 15);
        assert_eq!(Timeframe::Month.range_ending(today).start(), ymd(2024, 2, 14));
        assert_eq!(Timeframe::ThreeMonths.range_ending(today).start(), ymd(2023, 12, 16));
        assert_eq!(Timeframe::SixMonths.range_ending(today).start(), ymd(2023, 9, 17));
    }

    #[test]
    fn test_range_rejects_end_before_start() {
        assert!(DateRange::new(ymd(2024, 3, 15), ymd(2024, 3, 14)).is_err());
        assert!(DateRange::new(ymd(2024, 3, 15), ymd(2024, 3, 15)).is_ok());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Timeframe::ThreeMonths.label(), "3 Months");
        assert_eq!(Timeframe::Week.file_label(), "1_Week");
        assert_eq!(Timeframe::SixMonths.to_string(), "6 Months");
    }

    #[test]
    fn test_range_display_pads_month_and_day() {
        let range = DateRange::new(ymd(2024, 1, 2), ymd(2024, 1, 9)).unwrap();
        assert_eq!(range.to_string(), "01/02/2024 - 01/09/2024");
    }
}
