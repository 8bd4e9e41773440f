//! Google web search engine, restricted to recent news for a company

use super::page::{has_element, parse_selector, HtmlNode, NodeSelectors};
use super::traits::*;
use crate::error::SearchError;
use crate::network::accept_language;
use crate::results::{extract_results, SearchResult};
use scraper::{Html, Selector};

/// Results container that must be present on a usable page
const RESULTS_CONTAINER: &str = "#search";

/// Google web search engine
pub struct Google {
    base_url: String,
    lead_selector: Selector,
    result_selector: Selector,
    node_selectors: NodeSelectors,
}

impl Google {
    pub fn new() -> Self {
        Self::with_base_url("https://www.google.com/search")
    }

    /// Point the engine at another host (used for tests and mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            lead_selector: parse_selector("div.g[data-hveid]"),
            result_selector: parse_selector(
                "div[jscontroller][lang][jsaction][data-hveid][data-ved]",
            ),
            node_selectors: NodeSelectors::new("h3", &["[data-sncf='1']", "div.VwiC3b"]),
        }
    }

    fn parse_results(&self, html: &str, company: &str) -> Result<Vec<SearchResult>, SearchError> {
        let document = Html::parse_document(html);

        if !has_element(&document, RESULTS_CONTAINER) {
            return Err(SearchError::MissingElement(RESULTS_CONTAINER));
        }

        // The lead block goes first, ahead of the regular result blocks
        let nodes: Vec<HtmlNode<'_>> = document
            .select(&self.lead_selector)
            .take(1)
            .chain(document.select(&self.result_selector))
            .map(|element| HtmlNode::new(element, &self.node_selectors))
            .collect();

        Ok(extract_results(&nodes, company))
    }
}

impl Default for Google {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for Google {
    fn name(&self) -> &str {
        "google"
    }

    fn supports_time_range(&self) -> bool {
        true
    }

    fn request(&self, params: &RequestParams) -> Result<EngineRequest, SearchError> {
        let mut request = EngineRequest::get(&self.base_url)
            .param("q", params.query.clone())
            .param("hl", params.lang.clone())
            .param("num", "10")
            .header("Accept-Language", accept_language(&params.lang))
            // Pre-accepted consent so no cookie interstitial is served
            .cookie("CONSENT", "YES+cb")
            .cookie("SOCS", "CAESEwgDEgk0ODE3Nzk3MjQaAmVuIAEaBgiA_LyaBg");

        if let Some(time_range) = params.time_range {
            let tbs = match time_range {
                TimeRange::Day => "qdr:d",
                TimeRange::Week => "qdr:w",
                TimeRange::Month => "qdr:m",
                TimeRange::Year => "qdr:y",
            };
            request = request.param("tbs", tbs);
        }

        Ok(request)
    }

    fn response(
        &self,
        response: EngineResponse,
        company: &str,
    ) -> Result<Vec<SearchResult>, SearchError> {
        response.ensure_usable()?;
        self.parse_results(&response.text, company)
    }
}
