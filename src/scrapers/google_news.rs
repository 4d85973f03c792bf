//! Google web search, news tab.
//!
//! This backend scrapes the news vertical of Google web search
//! (`/search?tbm=nws`). The date window is passed through the `tbs` parameter
//! as a custom range:
//!
//! ```text
//! tbs=lr:lang_1en,cdr:1,cd_min:03/08/2024,cd_max:03/15/2024,sbd:1
//! ```
//!
//! # Result Cards
//!
//! Each hit is rendered as a card. Cards with a heading become
//! [`ResultItem::Structured`]; cards whose markup did not expose a heading are
//! kept as [`ResultItem::Opaque`] with the card's visible text. Links are
//! usually Google redirects (`/url?q=<target>&sa=U...`) and are unwrapped to
//! the target URL.

use super::{NewsSearch, clean_text};
use crate::models::ResultItem;
use crate::timeframe::DateRange;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.google.com";

/// Hits per result page; Google pages with `start=N*10`.
const PAGE_SIZE: usize = 10;

static CARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.SoaBEf, div.dbsr").expect("card selector"));
static HEADING: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div[role=heading], div.n0jPhd, div.JheGif").expect("heading selector")
});
static MEDIA: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".MgUUmf, .CEMjEf, .XTjFC").expect("media selector"));
static DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".OSrXXb, .LfVVr, .WG9SHc").expect("date selector"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("link selector"));

/// Search session against the Google news tab.
#[derive(Debug)]
pub struct GoogleNews {
    client: reqwest::Client,
    base_url: String,
    lang: String,
    pages: usize,
    range: Option<DateRange>,
    results: Vec<ResultItem>,
}

impl GoogleNews {
    pub fn new(client: reqwest::Client, lang: &str) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: lang.to_string(),
            pages: 1,
            range: None,
            results: Vec::new(),
        }
    }

    /// Point the session at another host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Number of result pages to walk per query. At least one.
    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = pages.max(1);
        self
    }

    /// The `tbs` parameter: language restriction plus the optional custom range.
    fn tbs(&self) -> String {
        match &self.range {
            Some(range) => format!(
                "lr:lang_1{},cdr:1,cd_min:{},cd_max:{},sbd:1",
                self.lang,
                range.start_str(),
                range.end_str()
            ),
            None => format!("lr:lang_1{}", self.lang),
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_page(&self, query: &str, page: usize) -> Result<Vec<ResultItem>, Box<dyn Error>> {
        let url = format!("{}/search", self.base_url);
        let start = (page * PAGE_SIZE).to_string();
        let lr = format!("lang_{}", self.lang);
        let tbs = self.tbs();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("hl", self.lang.as_str()),
                ("lr", lr.as_str()),
                ("tbm", "nws"),
                ("tbs", tbs.as_str()),
                ("start", start.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let html = response.text().await?;
        let items = parse_results(&html, &self.base_url);
        debug!(page, bytes = html.len(), count = items.len(), "Parsed Google News page");
        Ok(items)
    }
}

impl NewsSearch for GoogleNews {
    fn set_time_range(&mut self, range: &DateRange) -> Result<(), Box<dyn Error>> {
        self.range = Some(*range);
        Ok(())
    }

    #[instrument(level = "info", skip(self), fields(pages = self.pages))]
    async fn search(&mut self, query: &str) -> Result<(), Box<dyn Error>> {
        if query.trim().is_empty() {
            return Err("refusing to search for an empty query".into());
        }

        for page in 0..self.pages {
            let items = self.fetch_page(query, page).await?;
            if items.is_empty() {
                if page == 0 {
                    warn!("Google News returned no result cards");
                }
                break;
            }
            self.results.extend(items);
        }

        info!(count = self.results.len(), "Google News search complete");
        Ok(())
    }

    fn results(&self) -> &[ResultItem] {
        &self.results
    }

    fn reset(&mut self) {
        self.results.clear();
    }
}

/// Extract every result card from a news-tab page, in page order.
pub fn parse_results(html: &str, base_url: &str) -> Vec<ResultItem> {
    let document = Html::parse_document(html);
    document
        .select(&CARD)
        .filter_map(|card| parse_card(card, base_url))
        .collect()
}

fn parse_card(card: ElementRef<'_>, base_url: &str) -> Option<ResultItem> {
    let title = first_text(card, &HEADING);
    match title {
        Some(title) => Some(ResultItem::Structured {
            title: Some(title),
            date: first_text(card, &DATE),
            media: first_text(card, &MEDIA),
            link: card
                .select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| resolve_link(href, base_url)),
        }),
        None => clean_text(&card.text().collect::<Vec<_>>().join(" ")).map(ResultItem::Opaque),
    }
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .find_map(|el| clean_text(&el.text().collect::<Vec<_>>().join(" ")))
}

/// Turn a card href into the article URL.
///
/// Google redirect links (`/url?q=...` or `/url?url=...`) yield their target;
/// other relative links are resolved against `base_url`.
pub fn resolve_link(href: &str, base_url: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    let resolved = base.join(href).ok()?;

    if resolved.path() == "/url" {
        return resolved
            .query_pairs()
            .find(|(key, _)| key == "q" || key == "url")
            .map(|(_, target)| target.into_owned());
    }

    Some(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use httpmock::{Method::GET, MockServer};

    const PAGE: &str = r#"
        <html><body><div id="search">
          <div class="SoaBEf">
            <a class="WlydOe" href="/url?q=https://www.livemint.com/markets/reliance-q4&sa=U&ved=2ah">
              <div class="MgUUmf"><span>Mint</span></div>
              <div class="n0jPhd" role="heading">Reliance shares climb after Q4 results</div>
              <div class="OSrXXb"><span>3 days ago</span></div>
            </a>
          </div>
          <div class="SoaBEf">
            <a href="https://economictimes.indiatimes.com/tcs-order">
              <div class="MgUUmf">Economic  Times</div>
              <div role="heading">TCS bags   large deal</div>
              <div class="OSrXXb">Mar 9, 2024</div>
            </a>
          </div>
          <div class="SoaBEf"><span>Sponsored market update</span></div>
        </div></body></html>
    "#;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_results_structured_and_opaque() {
        let items = parse_results(PAGE, DEFAULT_BASE_URL);
        assert_eq!(items.len(), 3);

        assert_eq!(
            items[0],
            ResultItem::Structured {
                title: Some("Reliance shares climb after Q4 results".to_string()),
                date: Some("3 days ago".to_string()),
                media: Some("Mint".to_string()),
                link: Some("https://www.livemint.com/markets/reliance-q4".to_string()),
            }
        );
        assert_eq!(
            items[1],
            ResultItem::Structured {
                title: Some("TCS bags large deal".to_string()),
                date: Some("Mar 9, 2024".to_string()),
                media: Some("Economic Times".to_string()),
                link: Some("https://economictimes.indiatimes.com/tcs-order".to_string()),
            }
        );
        assert_eq!(items[2], ResultItem::Opaque("Sponsored market update".to_string()));
    }

    #[test]
    fn test_parse_results_empty_page() {
        assert!(parse_results("<html><body>No results</body></html>", DEFAULT_BASE_URL).is_empty());
    }

    #[test]
    fn test_resolve_link() {
        assert_eq!(
            resolve_link("/url?q=https://example.com/a%3Fb%3D1&sa=U", DEFAULT_BASE_URL).as_deref(),
            Some("https://example.com/a?b=1")
        );
        assert_eq!(
            resolve_link("https://example.com/story", DEFAULT_BASE_URL).as_deref(),
            Some("https://example.com/story")
        );
        assert_eq!(
            resolve_link("/search?q=more", DEFAULT_BASE_URL).as_deref(),
            Some("https://www.google.com/search?q=more")
        );
    }

    #[test]
    fn test_tbs_with_and_without_range() {
        let client = reqwest::Client::new();
        let mut session = GoogleNews::new(client, "en");
        assert_eq!(session.tbs(), "lr:lang_1en");

        let range = DateRange::new(ymd(2024, 3, 8), ymd(2024, 3, 15)).unwrap();
        session.set_time_range(&range).unwrap();
        assert_eq!(
            session.tbs(),
            "lr:lang_1en,cdr:1,cd_min:03/08/2024,cd_max:03/15/2024,sbd:1"
        );
    }

    #[tokio::test]
    async fn test_search_sends_range_and_stores_results() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "Reliance Industries stock India")
                .query_param("tbm", "nws")
                .query_param("hl", "en")
                .query_param(
                    "tbs",
                    "lr:lang_1en,cdr:1,cd_min:03/08/2024,cd_max:03/15/2024,sbd:1",
                )
                .query_param("start", "0");
            then.status(200)
                .header("content-type", "text/html")
                .body(PAGE);
        });

        let mut session =
            GoogleNews::new(reqwest::Client::new(), "en").with_base_url(server.base_url());
        let range = DateRange::new(ymd(2024, 3, 8), ymd(2024, 3, 15)).unwrap();
        session.set_time_range(&range).unwrap();
        session.search("Reliance Industries stock India").await.unwrap();

        mock.assert();
        assert_eq!(session.results().len(), 3);

        session.reset();
        assert!(session.results().is_empty());
    }

    #[tokio::test]
    async fn test_search_stops_paging_on_empty_page() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET).path("/search").query_param("start", "0");
            then.status(200).body(PAGE);
        });
        let second = server.mock(|when, then| {
            when.method(GET).path("/search").query_param("start", "10");
            then.status(200).body("<html><body></body></html>");
        });
        let third = server.mock(|when, then| {
            when.method(GET).path("/search").query_param("start", "20");
            then.status(200).body(PAGE);
        });

        let mut session = GoogleNews::new(reqwest::Client::new(), "en")
            .with_base_url(server.base_url())
            .with_pages(3);
        session.search("TCS stock India").await.unwrap();

        first.assert_hits(1);
        second.assert_hits(1);
        third.assert_hits(0);
        assert_eq!(session.results().len(), 3);
    }

    #[tokio::test]
    async fn test_search_rate_limited_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(429).body("Too Many Requests");
        });

        let mut session =
            GoogleNews::new(reqwest::Client::new(), "en").with_base_url(server.base_url());
        let err = session.search("ITC stock India").await.unwrap_err();
        assert!(err.to_string().contains("429"));
        assert!(session.results().is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query() {
        let mut session = GoogleNews::new(reqwest::Client::new(), "en");
        assert!(session.search("   ").await.is_err());
    }
}
