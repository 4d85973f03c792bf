//! Google News RSS search.
//!
//! The RSS endpoint (`https://news.google.com/rss/search`) has no range
//! parameter, so the window is expressed with query operators instead:
//!
//! ```text
//! q=Infosys stock India after:2024-03-08 before:2024-03-16
//! ```
//!
//! `before:` is exclusive, hence the day added to the range end.
//!
//! Feed titles carry the publisher as a `" - Publisher"` suffix, which is
//! stripped when the item also names its `<source>`.

use super::{NewsSearch, clean_text};
use crate::models::ResultItem;
use crate::timeframe::DateRange;
use chrono::Duration;
use scraper::Html;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://news.google.com";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    source: Option<Source>,
}

#[derive(Debug, Deserialize)]
struct Source {
    #[serde(rename = "$text", default)]
    name: Option<String>,
}

/// Search session against the Google News RSS feed.
#[derive(Debug)]
pub struct GoogleNewsRss {
    client: reqwest::Client,
    base_url: String,
    lang: String,
    range: Option<DateRange>,
    results: Vec<ResultItem>,
}

impl GoogleNewsRss {
    pub fn new(client: reqwest::Client, lang: &str) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: lang.to_string(),
            range: None,
            results: Vec::new(),
        }
    }

    /// Point the session at another host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The query with the range appended as `after:`/`before:` operators.
    fn ranged_query(&self, query: &str) -> String {
        match &self.range {
            Some(range) => format!(
                "{} after:{} before:{}",
                query,
                range.start().format("%Y-%m-%d"),
                (range.end() + Duration::days(1)).format("%Y-%m-%d")
            ),
            None => query.to_string(),
        }
    }
}

impl NewsSearch for GoogleNewsRss {
    fn set_time_range(&mut self, range: &DateRange) -> Result<(), Box<dyn Error>> {
        self.range = Some(*range);
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    async fn search(&mut self, query: &str) -> Result<(), Box<dyn Error>> {
        if query.trim().is_empty() {
            return Err("refusing to search for an empty query".into());
        }

        let url = format!("{}/rss/search", self.base_url);
        let q = self.ranged_query(query);
        let xml = self
            .client
            .get(&url)
            .query(&[("q", q.as_str()), ("hl", self.lang.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let items = parse_feed(&xml)?;
        debug!(bytes = xml.len(), count = items.len(), "Parsed Google News RSS feed");
        self.results.extend(items);

        info!(count = self.results.len(), "Google News RSS search complete");
        Ok(())
    }

    fn results(&self) -> &[ResultItem] {
        &self.results
    }

    fn reset(&mut self) {
        self.results.clear();
    }
}

/// Parse an RSS document into hits, in feed order.
///
/// Items with a title are structured; items with only a description are kept
/// as opaque text; items with neither are dropped.
pub fn parse_feed(xml: &str) -> Result<Vec<ResultItem>, Box<dyn Error>> {
    let rss: Rss = quick_xml::de::from_str(xml)?;
    Ok(rss.channel.items.into_iter().filter_map(normalize_item).collect())
}

fn normalize_item(item: Item) -> Option<ResultItem> {
    let media = item
        .source
        .and_then(|s| s.name)
        .and_then(|name| clean_text(&name));

    match item.title.as_deref().and_then(clean_text) {
        Some(title) => {
            let title = match &media {
                Some(media) => title
                    .strip_suffix(&format!(" - {media}"))
                    .map(str::to_string)
                    .unwrap_or(title),
                None => title,
            };
            Some(ResultItem::Structured {
                title: Some(title),
                date: item.pub_date.as_deref().and_then(clean_text),
                media,
                link: item.link.as_deref().and_then(clean_text),
            })
        }
        None => item
            .description
            .as_deref()
            .map(html_to_text)
            .and_then(|text| clean_text(&text))
            .map(ResultItem::Opaque),
    }
}

/// RSS descriptions carry escaped HTML; keep only the text.
fn html_to_text(html: &str) -> String {
    Html::parse_fragment(html)
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}
