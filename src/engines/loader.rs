//! Engine loader for creating the configured search engine

use super::traits::Engine;
use super::{duckduckgo, google};
use crate::config::SearchSettings;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Loader for initializing engines from configuration
pub struct EngineLoader;

impl EngineLoader {
    /// Create the engine named in the search settings
    pub fn load(settings: &SearchSettings) -> Result<Arc<dyn Engine>> {
        let engine = Self::create_engine(&settings.engine, settings.engine_url.as_deref())?;
        info!("Loaded engine: {}", engine.name());
        Ok(engine)
    }

    /// Create an engine instance by name, optionally at a custom base URL
    fn create_engine(engine_type: &str, base_url: Option<&str>) -> Result<Arc<dyn Engine>> {
        let engine: Arc<dyn Engine> = match (engine_type, base_url) {
            ("google", None) => Arc::new(google::Google::new()),
            ("google", Some(url)) => Arc::new(google::Google::with_base_url(url)),
            ("duckduckgo", None) => Arc::new(duckduckgo::DuckDuckGo::new()),
            ("duckduckgo", Some(url)) => Arc::new(duckduckgo::DuckDuckGo::with_base_url(url)),
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown engine type: {} (available: {})",
                    engine_type,
                    Self::available_engines().join(", ")
                ));
            }
        };

        Ok(engine)
    }

    /// Get list of available engine types
    pub fn available_engines() -> Vec<&'static str> {
        vec!["google", "duckduckgo"]
    }
}
