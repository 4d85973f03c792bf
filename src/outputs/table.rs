//! CSV table export.
//!
//! Columns, in order: `Stock, Title, Date, ParsedDate, Media, Link`.
//! Missing fields are empty cells. `ParsedDate` is the best-effort reparse of
//! `Date` as `YYYY-MM-DD`, or `invalid`.

use super::file_stem;
use crate::models::{NewsRecord, ParsedDate};
use crate::timeframe::Timeframe;
use crate::utils::parse_maybe_date;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
struct TableRow<'a> {
    #[serde(rename = "Stock")]
    stock: &'a str,
    #[serde(rename = "Title")]
    title: Option<&'a str>,
    #[serde(rename = "Date")]
    date: Option<&'a str>,
    #[serde(rename = "ParsedDate")]
    parsed_date: ParsedDate,
    #[serde(rename = "Media")]
    media: Option<&'a str>,
    #[serde(rename = "Link")]
    link: Option<&'a str>,
}

impl<'a> TableRow<'a> {
    fn new(record: &'a NewsRecord, now: NaiveDateTime) -> Self {
        Self {
            stock: &record.subject,
            title: record.title.as_deref(),
            date: record.date.as_deref(),
            parsed_date: parse_maybe_date(record.date.as_deref(), now),
            media: record.media.as_deref(),
            link: record.link.as_deref(),
        }
    }
}

/// Render records as CSV bytes, header first. Relative dates resolve against `now`.
pub fn render_csv(records: &[NewsRecord], now: NaiveDateTime) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(TableRow::new(record, now))?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(bytes)
}

/// Write `fno_news_<timeframe>.csv` into `output_dir` and return its path.
#[instrument(level = "info", skip_all, fields(%timeframe, output_dir = %output_dir.display(), count = records.len()))]
pub async fn write_table(
    records: &[NewsRecord],
    timeframe: Timeframe,
    output_dir: &Path,
    now: NaiveDateTime,
) -> Result<PathBuf, Box<dyn Error>> {
    let csv = render_csv(records, now)?;
    let path = output_dir.join(format!("{}.csv", file_stem(timeframe)));

    fs::write(&path, csv).await?;
    info!(path = %path.display(), "Wrote CSV table");
    Ok(path)
}
