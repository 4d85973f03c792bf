//! Search sessions against Google News.
//!
//! Every backend implements [`NewsSearch`], a small stateful session that
//! mirrors how a news search is driven:
//!
//! 1. **Range**: `set_time_range()` stores the date window for the next search
//! 2. **Search**: `search(query)` runs the request(s) and stores the hits
//! 3. **Read**: `results()` exposes the hits in the order the service returned them
//! 4. **Reset**: `reset()` drops the stored hits before the next query
//!
//! # Supported Backends
//!
//! | Backend | Module | Method | Notes |
//! |---------|--------|--------|-------|
//! | Google web search, news tab | [`google_news`] | HTML scraping | Custom date range via `tbs=cdr:1`, paged |
//! | Google News RSS | [`google_rss`] | RSS/XML | Range via `after:`/`before:` query operators |

use crate::models::ResultItem;
use crate::timeframe::DateRange;
use std::error::Error;
use std::time::Duration;

pub mod google_news;
pub mod google_rss;

/// Browser-like user agent; Google serves a stripped page to unknown clients.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// A stateful news search session.
///
/// A session is owned by exactly one fetcher and driven sequentially.
pub trait NewsSearch {
    /// Store the date window applied to subsequent searches.
    fn set_time_range(&mut self, range: &DateRange) -> Result<(), Box<dyn Error>>;

    /// Run `query` and store the hits, appending to anything not yet reset.
    async fn search(&mut self, query: &str) -> Result<(), Box<dyn Error>>;

    /// Hits stored since the last reset, in service order.
    fn results(&self) -> &[ResultItem];

    /// Drop all stored hits.
    ///
    /// Postcondition: `results()` is empty. The time range and language are kept.
    fn reset(&mut self);
}

/// Build the shared HTTP client used by every backend.
///
/// Failing here means the search service cannot be reached at all, which is
/// a startup error rather than a per-subject one.
pub fn build_http_client() -> Result<reqwest::Client, Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()?;
    Ok(client)
}

/// Collapse runs of whitespace and trim; `None` when nothing is left.
pub(crate) fn clean_text(raw: &str) -> Option<String> {
    let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
