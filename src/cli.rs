//! Command-line interface definitions for fno_news.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Some arguments can also be provided via environment variables.

use crate::timeframe::Timeframe;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for the pause between subjects, in seconds.
pub const MAX_DELAY_SECS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Google web search, news tab (HTML)
    Html,
    /// Google News RSS feed
    Rss,
}

/// Command-line arguments for fno_news.
///
/// # Examples
///
/// ```sh
/// # Last week of news for the built-in stock list
/// fno_news
///
/// # Three months, slower pacing, custom output directory
/// fno_news --timeframe three-months --delay 2.5 -o ./out
///
/// # A couple of stocks only, via the RSS backend
/// fno_news --subject Infosys --subject Wipro --backend rss
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Time window ending today
    #[arg(short, long, value_enum, default_value_t = Timeframe::Week)]
    pub timeframe: Timeframe,

    /// Pause between stock queries in seconds (0-10), to avoid rate limits
    #[arg(short, long, env = "FNO_NEWS_DELAY", default_value = "0.8", value_parser = parse_delay)]
    pub delay: Duration,

    /// Output directory for the CSV and JSON files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "FNO_NEWS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Stock to query; repeat to build a list. Overrides the configured subjects
    #[arg(short, long = "subject")]
    pub subjects: Vec<String>,

    /// Search backend
    #[arg(short, long, value_enum, default_value_t = Backend::Html)]
    pub backend: Backend,

    /// Result pages per stock (html backend only)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..=10))]
    pub pages: u16,

    /// Search language, overrides the configured one
    #[arg(long)]
    pub lang: Option<String>,
}

fn parse_delay(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    if !(0.0..=MAX_DELAY_SECS).contains(&secs) {
        return Err(format!("delay must be between 0 and {MAX_DELAY_SECS} seconds"));
    }
    Ok(Duration::from_secs_f64(secs))
}
