//! Per-attempt search session

use super::client::HttpClient;
use std::time::Instant;
use tracing::debug;

/// HTTP handle scoped to a single search attempt
///
/// Each attempt starts with a fresh user agent; the session is released
/// when dropped, on success and failure alike.
pub struct SearchSession {
    client: HttpClient,
    term: String,
    opened: Instant,
}

impl SearchSession {
    /// Open a session for `term` derived from a shared client
    pub fn open(base: &HttpClient, term: &str) -> Self {
        let mut client = base.clone();
        client.rotate_user_agent();
        debug!(term, user_agent = client.user_agent(), "search session opened");

        Self {
            client,
            term: term.to_string(),
            opened: Instant::now(),
        }
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        debug!(
            term = %self.term,
            elapsed_ms = self.opened.elapsed().as_millis() as u64,
            "search session closed"
        );
    }
}
