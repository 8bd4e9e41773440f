//! Search engine module
//!
//! Defines the Engine trait, the HTML page query used by engines, and
//! the engines that can be configured.

mod loader;
mod page;
mod traits;

// Engine implementations
pub mod duckduckgo;
pub mod google;

pub use loader::EngineLoader;
pub use page::{resolve_href, HtmlNode, NodeSelectors};
pub use traits::*;
