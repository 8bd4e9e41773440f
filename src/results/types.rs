//! Result type definitions

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Matches a relative freshness label such as "3 hours ago" anywhere in a string
static RELEASED_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+) (second|minute|hour)s? ago").expect("valid regex"));

/// Matches a freshness label that makes up the start of a string
static RELEASED_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+) (second|minute|hour)s? ago").expect("valid regex"));

/// A single scraped news item
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResult {
    /// The query term that produced this result
    pub company: String,
    /// Freshness label, e.g. "3 hours ago"
    pub released: Option<String>,
    /// Headline text
    pub title: Option<String>,
    /// Result link
    pub url: Option<String>,
    /// Snippet text
    pub description: Option<String>,
}

impl SearchResult {
    /// Create an empty result for a company
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            released: None,
            title: None,
            url: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the description and derive `released` from it
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.released = released_from_text(&description);
        self.description = Some(description);
        self
    }

    /// Parsed freshness of this result
    pub fn freshness(&self) -> Freshness {
        Freshness::parse(self.released.as_deref())
    }

    /// Whether every field besides `company` is absent
    pub fn is_blank(&self) -> bool {
        self.released.is_none()
            && self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
    }
}

/// Unit of a relative freshness label, declared from finest to coarsest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    fn from_singular(s: &str) -> Option<Self> {
        match s {
            "second" => Some(Self::Second),
            "minute" => Some(Self::Minute),
            "hour" => Some(Self::Hour),
            _ => None,
        }
    }

    fn plural(self) -> &'static str {
        match self {
            Self::Second => "seconds",
            Self::Minute => "minutes",
            Self::Hour => "hours",
        }
    }
}

/// Typed freshness of a result
///
/// Orders by unit first, then by value. `Unknown` sorts after every
/// parsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Freshness {
    Ago { unit: TimeUnit, value: u64 },
    Unknown,
}

impl Freshness {
    /// Parse a label such as "5 seconds ago" or "1 hour ago"
    pub fn parse(label: Option<&str>) -> Self {
        label
            .and_then(|l| RELEASED_LABEL.captures(l))
            .and_then(|cap| Self::from_captures(&cap))
            .unwrap_or(Self::Unknown)
    }

    fn from_captures(cap: &regex::Captures<'_>) -> Option<Self> {
        let value = cap[1].parse().ok()?;
        let unit = TimeUnit::from_singular(&cap[2])?;
        Some(Self::Ago { unit, value })
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ago { unit, value } => write!(f, "{} {} ago", value, unit.plural()),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Find the first freshness label in free text, normalized to plural units
pub fn released_from_text(text: &str) -> Option<String> {
    RELEASED_IN_TEXT
        .captures(text)
        .and_then(|cap| Freshness::from_captures(&cap))
        .map(|f| f.to_string())
}
