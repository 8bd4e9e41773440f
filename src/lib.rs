//! competitor-news: daily competitor news gathering
//!
//! Searches the web for recent news on a list of companies, retrying failed
//! searches for a bounded number of rounds, then exports the results, drops
//! blacklisted rows, summarizes them with a language model, posts the files
//! to Slack and archives them.

pub mod archive;
pub mod config;
pub mod distribute;
pub mod engines;
pub mod error;
pub mod export;
pub mod filter;
pub mod network;
pub mod results;
pub mod search;
pub mod summarize;
pub mod workflow;

pub use config::Settings;
pub use engines::Engine;
pub use error::{CollaboratorError, PipelineError, SearchError};
pub use results::{Freshness, SearchResult};
pub use search::{PipelineOutcome, SearchRetryPipeline, TermSearcher};
pub use workflow::{Workflow, WorkflowReport};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
