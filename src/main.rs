//! # fno_news
//!
//! Batch-fetches Google News headlines for a list of F&O stocks over a fixed
//! timeframe and exports them as a CSV table plus a JSON report.
//!
//! ## Features
//!
//! - Four timeframes ending today: 1 week, 1 month, 3 months, 6 months
//! - Two search backends: the Google news tab (HTML) and Google News RSS
//! - One query per stock, strictly sequential, with a configurable pause
//!   between stocks to stay under rate limits
//! - Per-stock failures are captured with a diagnostic trace and never abort the run
//! - Best-effort reparsing of reported dates (`"3 days ago"`, `Mar 9, 2024`, RFC 2822)
//!
//! ## Usage
//!
//! ```sh
//! fno_news --timeframe month --delay 1.5 -o ./out
//! ```
//!
//! ## Architecture
//!
//! 1. **Setup**: Parse CLI, check the output directory, load config, build the HTTP client
//! 2. **Fetching**: [`fetcher::BatchNewsFetcher`] walks the stock list against one search session
//! 3. **Output**: Write `fno_news_<timeframe>.csv` and `fno_news_<timeframe>.json`

use chrono::{Local, Utc};
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod fetcher;
mod models;
mod outputs;
mod scrapers;
mod timeframe;
mod utils;

use cli::{Backend, Cli};
use config::FetchConfig;
use fetcher::BatchNewsFetcher;
use models::BatchResult;
use outputs::{json, table};
use scrapers::google_news::GoogleNews;
use scrapers::google_rss::GoogleNewsRss;
use scrapers::{NewsSearch, build_http_client};
use timeframe::DateRange;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("fno_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Config ----
    let mut config = match &args.config {
        Some(path) => match FetchConfig::load(path).await {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load configuration");
                return Err(e);
            }
        },
        None => FetchConfig::default(),
    };
    if !args.subjects.is_empty() {
        config.subjects = args.subjects.clone();
    }
    if let Some(lang) = &args.lang {
        config.lang = lang.clone();
    }

    // The search service is unreachable without a client; stop before fetching anything.
    let client = match build_http_client() {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client; cannot reach Google News");
            return Err(e);
        }
    };

    // ---- Fetch ----
    let now = Local::now();
    let range = args.timeframe.range_ending(now.date_naive());
    info!(
        timeframe = %args.timeframe,
        start = %range.start_str(),
        end = %range.end_str(),
        subjects = config.subjects.len(),
        backend = ?args.backend,
        "Searching Google News"
    );

    let batch = match args.backend {
        Backend::Html => {
            let session = GoogleNews::new(client, &config.lang).with_pages(args.pages.into());
            run_batch(session, &config, &range, args.delay).await
        }
        Backend::Rss => {
            let session = GoogleNewsRss::new(client, &config.lang);
            run_batch(session, &config, &range, args.delay).await
        }
    };

    // ---- Report ----
    if batch.records.is_empty() {
        warn!("No news items found for the selected period");
    } else {
        info!(count = batch.records.len(), "Found news items");
        if let Err(e) =
            table::write_table(&batch.records, args.timeframe, &args.output_dir, now.naive_local()).await
        {
            error!(error = %e, "Failed to write CSV table");
        }
    }

    if !batch.errors.is_empty() {
        error!(count = batch.errors.len(), "Errors occurred for some stocks");
        for e in &batch.errors {
            error!(stock = %e.subject, error = %e.error, "Stock fetch error");
            debug!(stock = %e.subject, trace = %e.trace, "Stock fetch trace");
        }
    }

    let report = json::RunReport::new(&batch, args.timeframe, &range, Utc::now());
    if let Err(e) = json::write_report(&report, args.timeframe, &args.output_dir).await {
        error!(error = %e, "Failed to write JSON report");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        records = batch.records.len(),
        errors = batch.errors.len(),
        "Execution complete"
    );

    Ok(())
}

/// Run one batch over the configured subjects with a freshly built session.
#[instrument(level = "info", skip_all)]
async fn run_batch<S: NewsSearch>(
    session: S,
    config: &FetchConfig,
    range: &DateRange,
    delay: Duration,
) -> BatchResult {
    let mut fetcher = BatchNewsFetcher::new(session, &config.query_suffix);
    fetcher.fetch(&config.subjects, range, delay).await
}
