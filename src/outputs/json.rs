//! JSON dump of a full run.
//!
//! Unlike the CSV table, the JSON report also carries the query behind every
//! record and the per-subject errors with their traces, so a failed run can
//! be inspected after the fact.
//!
//! ```text
//! {
//!   "timeframe": "1 Week",
//!   "start": "03/08/2024",
//!   "end": "03/15/2024",
//!   "generated_at": "2024-03-15T12:00:00Z",
//!   "records": [ { "Stock": ..., "Query": ..., ... } ],
//!   "errors": [ { "stock": ..., "error": ..., "trace": ... } ]
//! }
//! ```

use super::file_stem;
use crate::models::{BatchResult, FetchError, NewsRecord};
use crate::timeframe::{DateRange, Timeframe};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub timeframe: &'static str,
    pub start: String,
    pub end: String,
    pub generated_at: DateTime<Utc>,
    pub records: &'a [NewsRecord],
    pub errors: &'a [FetchError],
}

impl<'a> RunReport<'a> {
    pub fn new(
        batch: &'a BatchResult,
        timeframe: Timeframe,
        range: &DateRange,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            timeframe: timeframe.label(),
            start: range.start_str(),
            end: range.end_str(),
            generated_at,
            records: &batch.records,
            errors: &batch.errors,
        }
    }
}

/// Write `fno_news_<timeframe>.json` into `output_dir` and return its path.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_report(
    report: &RunReport<'_>,
    timeframe: Timeframe,
    output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    let path = output_dir.join(format!("{}.json", file_stem(timeframe)));

    info!(path = %path.display(), "Writing JSON");
    if let Err(e) = fs::write(&path, json).await {
        error!(path = %path.display(), error = %e, "Failed to write JSON report");
        return Err(e.into());
    }
    info!(
        path = %path.display(),
        records = report.records.len(),
        errors = report.errors.len(),
        "Wrote JSON report"
    );
    Ok(path)
}
