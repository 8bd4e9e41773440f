//! Extraction of search results from a page query

use super::types::SearchResult;
use std::collections::HashSet;

/// One result block on a search page
///
/// Engines implement this over their own markup so extraction never
/// deals with selectors directly.
pub trait ResultNode {
    /// Headline text
    fn find_title(&self) -> Option<String>;

    /// Link target
    fn find_url(&self) -> Option<String>;

    /// Snippet text
    fn find_snippet(&self) -> Option<String>;
}

/// Turn a page's result nodes into deduplicated results for `company`
///
/// Every node yields a row, even when none of its accessors find anything.
pub fn extract_results<N: ResultNode>(nodes: &[N], company: &str) -> Vec<SearchResult> {
    let rows = nodes.iter().map(|node| {
        let mut result = SearchResult::new(company);
        result.title = node.find_title();
        result.url = node.find_url();
        if let Some(snippet) = node.find_snippet() {
            result = result.with_description(snippet);
        }
        result
    });

    dedup_results(rows)
}

/// Drop exact duplicate rows, keeping the first occurrence
pub fn dedup_results(rows: impl IntoIterator<Item = SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeNode {
        title: Option<&'static str>,
        url: Option<&'static str>,
        snippet: Option<&'static str>,
    }

    impl ResultNode for FakeNode {
        fn find_title(&self) -> Option<String> {
            self.title.map(String::from)
        }

        fn find_url(&self) -> Option<String> {
            self.url.map(String::from)
        }

        fn find_snippet(&self) -> Option<String> {
            self.snippet.map(String::from)
        }
    }

    fn node(title: &'static str, url: &'static str, snippet: &'static str) -> FakeNode {
        FakeNode {
            title: Some(title),
            url: Some(url),
            snippet: Some(snippet),
        }
    }

    #[test]
    fn test_identical_rows_collapse() {
        let nodes = vec![
            node("Acme raises $10M", "https://news.example/acme", "2 hours ago - funding"),
            node("Acme raises $10M", "https://news.example/acme", "2 hours ago - funding"),
        ];

        let results = extract_results(&nodes, "Acme");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].company, "Acme");
        assert_eq!(results[0].released.as_deref(), Some("2 hours ago"));
    }

    #[test]
    fn test_rows_differing_in_one_field_stay_distinct() {
        let nodes = vec![
            node("Acme raises $10M", "https://news.example/acme", "funding"),
            node("Acme raises $10M", "https://news.example/acme-2", "funding"),
            node("Acme raises $10M", "https://news.example/acme", "funding round"),
        ];

        let results = extract_results(&nodes, "Acme");
        assert_eq!(results.len(), 3);
        assert_eq!(results[1].url.as_deref(), Some("https://news.example/acme-2"));
    }

    #[test]
    fn test_blank_node_still_emits_row() {
        let nodes = vec![FakeNode {
            title: None,
            url: None,
            snippet: None,
        }];

        let results = extract_results(&nodes, "Beta");
        assert_eq!(results.len(), 1);
        assert!(results[0].is_blank());
        assert_eq!(results[0].company, "Beta");
    }

    #[test]
    fn test_order_preserved() {
        let nodes = vec![
            node("first", "https://a.example", "x"),
            node("second", "https://b.example", "y"),
            node("first", "https://a.example", "x"),
        ];

        let titles: Vec<_> = extract_results(&nodes, "Acme")
            .into_iter()
            .filter_map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }
}
