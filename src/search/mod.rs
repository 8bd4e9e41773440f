//! Search orchestration module
//!
//! Runs one search attempt per term and retries failed terms for a
//! bounded number of rounds.

mod pipeline;
mod searcher;

pub use pipeline::{PipelineOutcome, SearchRetryPipeline};
pub use searcher::{EngineSearcher, TermSearcher};
