//! Data models for search hits, normalized news records and batch output.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ResultItem`]: A raw hit returned by a search session, either structured or opaque
//! - [`NewsRecord`]: One normalized news item attributed to a subject
//! - [`FetchError`]: A captured, non-fatal failure for one subject
//! - [`BatchResult`]: The combined records and errors of one full run
//! - [`ParsedDate`]: A best-effort reparsed publication date for the table export

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A single hit as returned by a search session.
///
/// Search backends do not always manage to pull every field out of a result
/// card. When a hit has a recognizable headline it is `Structured`, otherwise
/// whatever text the card carried is kept as `Opaque`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultItem {
    Structured {
        title: Option<String>,
        date: Option<String>,
        media: Option<String>,
        link: Option<String>,
    },
    Opaque(String),
}

/// A news item attributed to the subject whose query produced it.
///
/// Serialized field names match the columns of the exported table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsRecord {
    /// The subject (stock name) the query was built from.
    #[serde(rename = "Stock")]
    pub subject: String,
    /// The exact query string sent to the search service.
    #[serde(rename = "Query")]
    pub query: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    /// Publication date as reported by the service, unparsed.
    #[serde(rename = "Date")]
    pub date: Option<String>,
    /// Publisher name.
    #[serde(rename = "Media")]
    pub media: Option<String>,
    #[serde(rename = "Link")]
    pub link: Option<String>,
}

impl NewsRecord {
    /// Normalize a raw hit into a record tagged with its subject and query.
    ///
    /// Structured hits map field-for-field. Opaque hits only populate the
    /// title, with the raw text as its value.
    pub fn from_item(subject: &str, query: &str, item: ResultItem) -> Self {
        let (title, date, media, link) = match item {
            ResultItem::Structured {
                title,
                date,
                media,
                link,
            } => (title, date, media, link),
            ResultItem::Opaque(text) => (Some(text), None, None, None),
        };

        Self {
            subject: subject.to_string(),
            query: query.to_string(),
            title,
            date,
            media,
            link,
        }
    }
}

/// A failure captured for one subject. Never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FetchError {
    #[serde(rename = "stock")]
    pub subject: String,
    /// Human-readable description of the failure.
    pub error: String,
    /// Source chain and debug rendering of the failure.
    pub trace: String,
}

/// Output of one full run over all subjects.
///
/// Both sequences follow the order of the input subject list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BatchResult {
    pub records: Vec<NewsRecord>,
    pub errors: Vec<FetchError>,
}

impl BatchResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.errors.is_empty()
    }
}

/// A reparsed publication date, or the explicit marker for dates that could
/// not be understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    Parsed(NaiveDate),
    Invalid,
}

impl fmt::Display for ParsedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedDate::Parsed(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            ParsedDate::Invalid => f.write_str("invalid"),
        }
    }
}

impl Serialize for ParsedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
