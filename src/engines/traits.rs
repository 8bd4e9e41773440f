//! Engine traits and types

use crate::error::SearchError;
use crate::results::SearchResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Time range filter applied to a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

/// Parameters for building a search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestParams {
    /// Search query string
    pub query: String,
    /// Language code
    pub lang: String,
    /// Time range filter
    pub time_range: Option<TimeRange>,
}

impl RequestParams {
    /// Create new request parameters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            lang: "en-US".to_string(),
            time_range: Some(TimeRange::Day),
        }
    }

    /// News query for a company: "<term> news"
    pub fn for_term(term: &str) -> Self {
        Self::new(format!("{} news", term))
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_time_range(mut self, time_range: Option<TimeRange>) -> Self {
        self.time_range = time_range;
        self
    }
}

/// HTTP request to be made by the engine
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// URL to request
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters
    pub params: HashMap<String, String>,
    /// POST form data
    pub form: Option<HashMap<String, String>>,
    /// Cookies to send
    pub cookies: HashMap<String, String>,
}

impl EngineRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: HttpMethod::Get,
            headers: HashMap::new(),
            params: HashMap::new(),
            form: None,
            cookies: HashMap::new(),
        }
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url)
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add form data (sets content-type to form-urlencoded)
    pub fn form(mut self, data: HashMap<String, String>) -> Self {
        self.form = Some(data);
        self
    }

    /// Add a cookie
    pub fn cookie(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(key.into(), value.into());
        self
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Google redirects blocked clients to `/sorry/index`
const CAPTCHA_URL_MARKER: &str = "/sorry/";

/// Challenge forms served instead of a results page
const CAPTCHA_PAGE_MARKERS: [&str; 2] = ["id=\"captcha-form\"", "anomaly-modal"];

/// HTTP response from engine request
#[derive(Debug)]
pub struct EngineResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl EngineResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if response indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    /// Check if response is a CAPTCHA interstitial
    ///
    /// Only looks at challenge markers, not at words a result snippet
    /// could contain.
    pub fn is_captcha(&self) -> bool {
        self.url.contains(CAPTCHA_URL_MARKER)
            || CAPTCHA_PAGE_MARKERS
                .iter()
                .any(|marker| self.text.contains(marker))
    }

    /// Reject error statuses and CAPTCHA pages
    pub fn ensure_usable(&self) -> Result<(), SearchError> {
        if self.is_rate_limited() {
            return Err(SearchError::RateLimited);
        }
        if !self.is_success() {
            return Err(SearchError::Http(self.status));
        }
        if self.is_captcha() {
            return Err(SearchError::Captcha);
        }
        Ok(())
    }
}

/// A search engine that can look up news for a term
///
/// Engines are pure request builders and page parsers; the HTTP round
/// trip happens in the searcher.
pub trait Engine: Send + Sync {
    /// Engine name
    fn name(&self) -> &str;

    /// Whether this engine supports time range filtering
    fn supports_time_range(&self) -> bool {
        false
    }

    /// Build the HTTP request for a search
    fn request(&self, params: &RequestParams) -> Result<EngineRequest, SearchError>;

    /// Parse the HTTP response into results for `company`
    fn response(
        &self,
        response: EngineResponse,
        company: &str,
    ) -> Result<Vec<SearchResult>, SearchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, text: &str) -> EngineResponse {
        EngineResponse {
            status,
            text: text.to_string(),
            url: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_for_term_builds_news_query() {
        let params = RequestParams::for_term("Acme Bio");
        assert_eq!(params.query, "Acme Bio news");
        assert_eq!(params.time_range, Some(TimeRange::Day));
    }

    #[test]
    fn test_ensure_usable() {
        assert!(response(200, "<html></html>").ensure_usable().is_ok());
        assert!(matches!(
            response(503, "").ensure_usable(),
            Err(SearchError::Http(503))
        ));
        assert!(matches!(
            response(429, "").ensure_usable(),
            Err(SearchError::RateLimited)
        ));
        assert!(matches!(
            response(200, r#"<form id="captcha-form" action="index">"#).ensure_usable(),
            Err(SearchError::Captcha)
        ));
    }

    #[test]
    fn test_captcha_detection_uses_challenge_markers() {
        let sorry = EngineResponse {
            status: 200,
            text: "<html></html>".to_string(),
            url: "https://www.google.com/sorry/index?continue=x".to_string(),
        };
        assert!(sorry.is_captcha());
        assert!(response(200, r#"<div class="anomaly-modal__title">"#).is_captcha());

        let mentions = response(
            200,
            "<p>Acme ships a CAPTCHA solver that blocks automated requests</p>",
        );
        assert!(!mentions.is_captcha());
        assert!(mentions.ensure_usable().is_ok());
    }
}
