//! Utility functions for date reparsing, error traces, string handling and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Best-effort parsing of the free-form dates search services report
//! - Rendering an error's source chain as a diagnostic trace
//! - String truncation for logging
//! - File system validation for the output directory

use crate::models::ParsedDate;
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

static RELATIVE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+|an?)\s+(sec(?:ond)?|min(?:ute)?|hour|day|week|month|year)s?\.?\s+ago$")
        .expect("relative date regex")
});

/// Absolute date layouts seen in Google News cards and feeds.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
];

/// Reparse a service-reported date, relative to `now`.
///
/// Understands absolute dates (`03/08/2024`, `Mar 8, 2024`, `8 March 2024`,
/// ISO dates), RFC 2822 and RFC 3339 timestamps, and relative phrases such as
/// `"3 days ago"`, `"an hour ago"` or `"yesterday"`. Anything else, including
/// a missing date, yields [`ParsedDate::Invalid`]; this never fails.
///
/// Months and years in relative phrases are calendar months and years.
pub fn parse_maybe_date(raw: Option<&str>, now: NaiveDateTime) -> ParsedDate {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return ParsedDate::Invalid;
    };

    match raw.to_ascii_lowercase().as_str() {
        "today" | "just now" => return ParsedDate::Parsed(now.date()),
        "yesterday" => return ParsedDate::Parsed(now.date() - Duration::days(1)),
        _ => {}
    }

    if let Some(date) = parse_relative(raw, now) {
        return ParsedDate::Parsed(date);
    }

    if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
        return ParsedDate::Parsed(ts.date_naive());
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ParsedDate::Parsed(ts.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(ParsedDate::Parsed)
        .unwrap_or(ParsedDate::Invalid)
}

fn parse_relative(raw: &str, now: NaiveDateTime) -> Option<NaiveDate> {
    let caps = RELATIVE_DATE.captures(raw)?;
    let amount: u32 = match &caps[1] {
        n if n.eq_ignore_ascii_case("a") || n.eq_ignore_ascii_case("an") => 1,
        n => n.parse().ok()?,
    };

    let unit = caps[2].to_ascii_lowercase();
    let then = match unit.as_str() {
        u if u.starts_with("sec") => now.checked_sub_signed(Duration::seconds(amount.into()))?,
        u if u.starts_with("min") => now.checked_sub_signed(Duration::minutes(amount.into()))?,
        "hour" => now.checked_sub_signed(Duration::hours(amount.into()))?,
        "day" => now.checked_sub_signed(Duration::days(amount.into()))?,
        "week" => now.checked_sub_signed(Duration::weeks(amount.into()))?,
        "month" => now.checked_sub_months(Months::new(amount))?,
        "year" => now.checked_sub_months(Months::new(amount.checked_mul(12)?))?,
        _ => return None,
    };
    Some(then.date())
}

/// Render an error and its sources as a numbered trace, followed by the
/// debug form of the top-level error.
///
/// # Examples
///
/// ```ignore
/// 0: HTTP status client error (429 Too Many Requests) for url (...)
/// debug: reqwest::Error { kind: Status(429), ... }
/// ```
pub fn error_trace(err: &(dyn Error + 'static)) -> String {
    let chain = std::iter::successors(Some(err), |e| (*e).source())
        .enumerate()
        .map(|(i, e)| format!("{i}: {e}"))
        .join("\n");
    format!("{chain}\ndebug: {err:?}")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at a character boundary at or below `max` bytes and
/// suffixed with the number of bytes dropped.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;

    let probe_path = path.join(".fno_news_probe");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
