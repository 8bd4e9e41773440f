//! DuckDuckGo HTML search engine implementation

use super::page::{has_element, parse_selector, HtmlNode, NodeSelectors};
use super::traits::*;
use crate::error::SearchError;
use crate::network::accept_language;
use crate::results::{extract_results, SearchResult};
use scraper::{Html, Selector};
use std::collections::HashMap;

const RESULTS_CONTAINER: &str = "#links";

/// DuckDuckGo web search engine
pub struct DuckDuckGo {
    html_url: String,
    result_selector: Selector,
    node_selectors: NodeSelectors,
}

impl DuckDuckGo {
    pub fn new() -> Self {
        Self::with_base_url("https://html.duckduckgo.com/html/")
    }

    pub fn with_base_url(html_url: impl Into<String>) -> Self {
        Self {
            html_url: html_url.into(),
            // Ads carry the same classes but live in result--ad blocks
            result_selector: parse_selector("div.result:not(.result--ad)"),
            node_selectors: NodeSelectors::new("a.result__a", &["a.result__snippet", ".result__snippet"]),
        }
    }

    fn parse_html_results(
        &self,
        html: &str,
        company: &str,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let document = Html::parse_document(html);

        if !has_element(&document, RESULTS_CONTAINER) {
            return Err(SearchError::MissingElement(RESULTS_CONTAINER));
        }

        let nodes: Vec<HtmlNode<'_>> = document
            .select(&self.result_selector)
            .map(|element| HtmlNode::new(element, &self.node_selectors))
            .collect();

        Ok(extract_results(&nodes, company))
    }
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    fn supports_time_range(&self) -> bool {
        true
    }

    fn request(&self, params: &RequestParams) -> Result<EngineRequest, SearchError> {
        let mut form_data = HashMap::new();
        form_data.insert("q".to_string(), params.query.clone());
        form_data.insert("b".to_string(), String::new());
        form_data.insert("kl".to_string(), region_code(&params.lang));

        if let Some(time_range) = params.time_range {
            let df = match time_range {
                TimeRange::Day => "d",
                TimeRange::Week => "w",
                TimeRange::Month => "m",
                TimeRange::Year => "y",
            };
            form_data.insert("df".to_string(), df.to_string());
        }

        Ok(EngineRequest::post(&self.html_url)
            .header("Accept-Language", accept_language(&params.lang))
            .form(form_data))
    }

    fn response(
        &self,
        response: EngineResponse,
        company: &str,
    ) -> Result<Vec<SearchResult>, SearchError> {
        response.ensure_usable()?;
        self.parse_html_results(&response.text, company)
    }
}

/// DuckDuckGo region code ("us-en") from a language tag ("en-US")
fn region_code(lang: &str) -> String {
    match lang.split_once('-') {
        Some((language, region)) => format!("{}-{}", region.to_lowercase(), language.to_lowercase()),
        None => "wt-wt".to_string(),
    }
}
