//! Configuration module for competitor-news
//!
//! Handles loading settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "COMPETITOR_NEWS_SETTINGS_PATH";

/// Default locations searched for a settings file, in order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("competitor-news/settings.yml"));
    }
    paths
}

/// Load settings from the first existing file, or defaults
///
/// An explicit path (from the command line or the environment) must
/// exist; the default locations are optional.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let from_env = std::env::var(SETTINGS_PATH_VAR).ok().map(PathBuf::from);

    let mut settings = match explicit.map(Path::to_path_buf).or(from_env) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)
                .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?
        }
        None => match default_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                info!("Loading settings from: {}", path.display());
                Settings::from_file(&path)?
            }
            None => {
                info!("No settings file found, using defaults");
                Settings::default()
            }
        },
    };

    settings.merge_env();
    Ok(settings)
}
