//! Single-attempt search for one term

use crate::engines::{Engine, RequestParams, TimeRange};
use crate::error::SearchError;
use crate::network::{HttpClient, SearchSession};
use crate::results::SearchResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::debug;

/// Performs one search attempt for a term and extracts its results
#[async_trait]
pub trait TermSearcher: Send + Sync {
    async fn search(&self, term: &str) -> Result<Vec<SearchResult>, SearchError>;
}

/// Searcher backed by an HTML search engine
pub struct EngineSearcher {
    client: HttpClient,
    engine: Arc<dyn Engine>,
    lang: String,
    time_range: Option<TimeRange>,
    attempt_timeout: Duration,
}

impl EngineSearcher {
    pub fn new(client: HttpClient, engine: Arc<dyn Engine>) -> Self {
        let attempt_timeout = client.timeout();
        Self {
            client,
            engine,
            lang: "en-US".to_string(),
            time_range: Some(TimeRange::Day),
            attempt_timeout,
        }
    }

    /// Set language
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set time range; ignored by engines without time range support
    pub fn with_time_range(mut self, time_range: Option<TimeRange>) -> Self {
        self.time_range = time_range;
        self
    }

    /// Bound on a whole attempt, request plus body
    pub fn with_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    fn params(&self, term: &str) -> RequestParams {
        let time_range = if self.engine.supports_time_range() {
            self.time_range
        } else {
            None
        };

        RequestParams::for_term(term)
            .with_lang(self.lang.clone())
            .with_time_range(time_range)
    }
}

#[async_trait]
impl TermSearcher for EngineSearcher {
    async fn search(&self, term: &str) -> Result<Vec<SearchResult>, SearchError> {
        let session = SearchSession::open(&self.client, term);
        let start = Instant::now();

        let request = self.engine.request(&self.params(term))?;
        let response = timeout(self.attempt_timeout, session.client().execute(request))
            .await
            .map_err(|_| SearchError::Timeout)??;

        let results = self.engine.response(response, term)?;

        debug!(
            "Engine {} returned {} results for '{}' in {:?}",
            self.engine.name(),
            results.len(),
            term,
            start.elapsed()
        );

        Ok(results)
    }
}
