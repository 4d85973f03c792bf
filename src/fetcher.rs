//! Sequential batch fetch over a list of subjects.
//!
//! [`BatchNewsFetcher`] owns one [`NewsSearch`] session and walks the subject
//! list strictly in order:
//!
//! 1. Build the query (`"{subject} {suffix}"`)
//! 2. Apply the date range and run the search
//! 3. Normalize every hit into a [`NewsRecord`]
//! 4. Reset the session so hits never carry over to the next subject
//! 5. Pause for the configured delay before the next subject
//!
//! A failure in any step is recorded as a [`FetchError`] for that subject and
//! the batch moves on. Each subject is attempted exactly once.

use crate::models::{BatchResult, FetchError, NewsRecord};
use crate::scrapers::NewsSearch;
use crate::timeframe::DateRange;
use crate::utils::{error_trace, truncate_for_log};
use std::error::Error;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

pub const DEFAULT_QUERY_SUFFIX: &str = "stock India";

#[derive(Debug)]
pub struct BatchNewsFetcher<S> {
    session: S,
    query_suffix: String,
}

impl<S: NewsSearch> BatchNewsFetcher<S> {
    pub fn new(session: S, query_suffix: impl Into<String>) -> Self {
        Self {
            session,
            query_suffix: query_suffix.into(),
        }
    }

    /// The query sent for `subject`.
    pub fn query_for(&self, subject: &str) -> String {
        let suffix = self.query_suffix.trim();
        if suffix.is_empty() {
            subject.to_string()
        } else {
            format!("{subject} {suffix}")
        }
    }

    /// Fetch news for every subject over `range`, pausing `delay` between subjects.
    ///
    /// Never fails: per-subject errors end up in [`BatchResult::errors`].
    /// An empty subject list returns an empty result without touching the session.
    #[instrument(level = "info", skip_all, fields(subjects = subjects.len(), %range, ?delay))]
    pub async fn fetch(
        &mut self,
        subjects: &[String],
        range: &DateRange,
        delay: Duration,
    ) -> BatchResult {
        let t0 = Instant::now();
        let mut batch = BatchResult::default();

        for (i, subject) in subjects.iter().enumerate() {
            let query = self.query_for(subject);

            match self.fetch_subject(subject, &query, range).await {
                Ok(records) => {
                    debug!(index = i, %subject, count = records.len(), "Subject fetched");
                    batch.records.extend(records);
                }
                Err(e) => {
                    error!(index = i, %subject, error = %e, "Subject fetch failed; continuing");
                    batch.errors.push(FetchError {
                        subject: subject.clone(),
                        error: e.to_string(),
                        trace: error_trace(e.as_ref()),
                    });
                }
            }

            self.session.reset();

            if i + 1 < subjects.len() && !delay.is_zero() {
                sleep(delay).await;
            }
        }

        info!(
            records = batch.records.len(),
            errors = batch.errors.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Batch fetch complete"
        );
        batch
    }

    async fn fetch_subject(
        &mut self,
        subject: &str,
        query: &str,
        range: &DateRange,
    ) -> Result<Vec<NewsRecord>, Box<dyn Error>> {
        self.session.set_time_range(range)?;
        self.session.search(query).await?;

        let records: Vec<NewsRecord> = self
            .session
            .results()
            .iter()
            .cloned()
            .map(|item| NewsRecord::from_item(subject, query, item))
            .collect();

        if let Some(first) = records.first().and_then(|r| r.title.as_deref()) {
            debug!(%subject, first = %truncate_for_log(first, 80), "First headline");
        }
        Ok(records)
    }
}
