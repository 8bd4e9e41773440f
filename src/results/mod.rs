//! Result types and extraction for scraped news items
//!
//! This module defines the record that flows through search, export and
//! filtering, plus the freshness ordering used for sorting.

mod extract;
mod types;

pub use extract::{dedup_results, extract_results, ResultNode};
pub use types::*;
