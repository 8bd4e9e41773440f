//! HTML implementation of the result page query

use crate::results::ResultNode;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Selectors that locate the fields inside one result block
pub struct NodeSelectors {
    title: Selector,
    snippets: Vec<Selector>,
}

impl NodeSelectors {
    /// Build from CSS selector strings
    ///
    /// Snippet selectors are tried in order; the first match wins.
    pub fn new(title: &str, snippets: &[&str]) -> Self {
        Self {
            title: parse_selector(title),
            snippets: snippets.iter().map(|s| parse_selector(s)).collect(),
        }
    }
}

/// Parse a selector that is known at compile time
pub(crate) fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

/// One result block in a parsed HTML document
pub struct HtmlNode<'a> {
    element: ElementRef<'a>,
    selectors: &'a NodeSelectors,
}

impl<'a> HtmlNode<'a> {
    pub fn new(element: ElementRef<'a>, selectors: &'a NodeSelectors) -> Self {
        Self { element, selectors }
    }

    fn title_element(&self) -> Option<ElementRef<'a>> {
        self.element.select(&self.selectors.title).next()
    }
}

impl ResultNode for HtmlNode<'_> {
    fn find_title(&self) -> Option<String> {
        self.title_element().and_then(|t| element_text(&t))
    }

    /// `href` of the closest anchor enclosing the title, within this block
    fn find_url(&self) -> Option<String> {
        let title = self.title_element()?;
        let root = (*self.element).id();

        for node in std::iter::once(*title).chain(title.ancestors()) {
            if let Some(el) = ElementRef::wrap(node) {
                if el.value().name() == "a" {
                    if let Some(href) = el.value().attr("href") {
                        return Some(resolve_href(href));
                    }
                }
            }
            if node.id() == root {
                break;
            }
        }

        None
    }

    fn find_snippet(&self) -> Option<String> {
        self.selectors
            .snippets
            .iter()
            .find_map(|sel| self.element.select(sel).next())
            .and_then(|s| element_text(&s))
    }
}

/// Collect the visible text of an element, `None` when blank
fn element_text(element: &ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Unwrap search-engine redirect links to their target URL
///
/// Handles Google's `/url?q=` and DuckDuckGo's `//duckduckgo.com/l/?uddg=`
/// forms; anything else is returned unchanged.
pub fn resolve_href(href: &str) -> String {
    let target = if href.starts_with("/url?") {
        redirect_target(&format!("https://www.google.com{}", href), "q")
    } else if href.starts_with("//duckduckgo.com/l/") {
        redirect_target(&format!("https:{}", href), "uddg")
    } else {
        None
    };

    target.unwrap_or_else(|| href.to_string())
}

fn redirect_target(absolute: &str, key: &str) -> Option<String> {
    let url = Url::parse(absolute).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Whether a document contains at least one element matching `css`
pub fn has_element(document: &Html, css: &str) -> bool {
    document.select(&parse_selector(css)).next().is_some()
}
