//! Search-and-retry pipeline over a list of terms

use super::searcher::TermSearcher;
use crate::error::PipelineError;
use crate::results::SearchResult;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineOutcome {
    /// Results in completion order
    pub results: Vec<SearchResult>,
    /// Terms that failed on every attempt
    pub unresolved: Vec<String>,
    /// Number of retry rounds that actually ran
    pub retry_rounds: u32,
    /// Attempts made per term
    pub attempts: HashMap<String, u32>,
}

impl PipelineOutcome {
    /// Total number of attempts across all terms and rounds
    pub fn total_attempts(&self) -> u32 {
        self.attempts.values().sum()
    }
}

/// Working state of a run: results so far and currently failed terms
#[derive(Debug, Default)]
struct RetryLedger {
    results: Vec<SearchResult>,
    failed: Vec<String>,
    attempts: HashMap<String, u32>,
}

impl RetryLedger {
    /// A success clears any earlier failure of the same term
    fn record_success(&mut self, term: &str, results: Vec<SearchResult>) {
        self.failed.retain(|t| t != term);
        self.results.extend(results);
    }

    fn record_failure(&mut self, term: &str) {
        if !self.failed.iter().any(|t| t == term) {
            self.failed.push(term.to_string());
        }
    }

    fn count_attempt(&mut self, term: &str) {
        *self.attempts.entry(term.to_string()).or_insert(0) += 1;
    }

    /// Move every failed term back to pending
    fn take_failed(&mut self) -> Vec<String> {
        std::mem::take(&mut self.failed)
    }
}

/// Searches each term once, then retries failed terms for a bounded number
/// of rounds
pub struct SearchRetryPipeline<S> {
    searcher: S,
    retry_delay: Duration,
}

impl<S: TermSearcher> SearchRetryPipeline<S> {
    pub fn new(searcher: S) -> Self {
        Self {
            searcher,
            retry_delay: Duration::from_secs(5),
        }
    }

    /// Delay after each attempt in a retry round
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Run the initial pass plus up to `max_retries` retry rounds
    ///
    /// Term failures never abort the run; only malformed input is an error.
    pub async fn run(
        &self,
        terms: &[String],
        max_retries: i32,
    ) -> Result<PipelineOutcome, PipelineError> {
        if max_retries < 0 {
            return Err(PipelineError::NegativeRetries(max_retries));
        }
        if terms.is_empty() {
            return Err(PipelineError::NoTerms);
        }

        let mut ledger = RetryLedger::default();

        info!("Searching {} terms", terms.len());
        for term in terms {
            self.attempt(&mut ledger, term, "Error processing").await;
        }

        let mut retry_rounds = 0;
        for round in 1..=max_retries {
            if ledger.failed.is_empty() {
                break;
            }

            let pending = ledger.take_failed();
            info!(
                "Retry attempt {} for {} failed searches...",
                round,
                pending.len()
            );
            retry_rounds += 1;

            for term in &pending {
                self.attempt(&mut ledger, term, "Retry failed for").await;
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        if !ledger.failed.is_empty() {
            warn!(
                "Failed to process the following terms after retries: {:?}",
                ledger.failed
            );
        }

        Ok(PipelineOutcome {
            results: ledger.results,
            unresolved: ledger.failed,
            retry_rounds,
            attempts: ledger.attempts,
        })
    }

    async fn attempt(&self, ledger: &mut RetryLedger, term: &str, context: &str) {
        ledger.count_attempt(term);
        match self.searcher.search(term).await {
            Ok(results) => {
                info!("Found {} results for '{}'", results.len(), term);
                ledger.record_success(term, results);
            }
            Err(e) => {
                warn!("{} {}: {}", context, term, e);
                ledger.record_failure(term);
            }
        }
    }
}
