//! Settings structures for competitor-news configuration

use crate::engines::TimeRange;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// System prompt sent to the summarizer model
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a biotech market analyst expert, your goal is to provide a detailed analysis of the facts relating to competitor data that is provided to you. Please talk specifically about the news and facts relating to each individual company";

/// Instruction that precedes the news table in the summarizer request
pub const DEFAULT_INSTRUCTION: &str = "You have been provided a table of information that contains the names of different companies, and recent news pertaining to their activities. as an expert in biotechnology and competitive analysis, please provide a concise yet informative summary of the news you are presented with, including key facts or headlines relating to these companies. I must emphasize however you must stick to the facts. Note that some rows in this table may not be relevant, use your expert judgement to ignore rows that do not related to biotech, for example, if the row contains Tik Tok on Instagram. Please also exclude non-english results.";

/// Comment posted alongside uploaded files
pub const DEFAULT_INITIAL_COMMENT: &str =
    "Here is today's table of competitor news and an AI summary of the contents";

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub paths: PathSettings,
    pub export: ExportSettings,
    pub summarizer: SummarizerSettings,
    pub slack: SlackSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge from an arbitrary variable source (COMPETITOR_NEWS_* prefix
    /// plus the service credentials)
    pub fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("COMPETITOR_NEWS_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = var("COMPETITOR_NEWS_ENGINE") {
            self.search.engine = val;
        }
        if let Some(val) = var("COMPETITOR_NEWS_MAX_RETRIES") {
            if let Ok(retries) = val.parse() {
                self.search.max_retries = retries;
            }
        }
        if let Some(val) = var("COMPETITOR_NEWS_NEWS_DIR") {
            self.paths.news_dir = PathBuf::from(val);
        }
        if let Some(val) = var("COMPETITOR_NEWS_COMPANIES_FILE") {
            self.paths.companies_file = PathBuf::from(val);
        }
        if let Some(val) = var("ANTHROPIC_API_KEY") {
            self.summarizer.api_key = Some(val);
        }
        if let Some(val) = var("SLACK_BOT_TOKEN") {
            self.slack.bot_token = Some(val);
        }
        if let Some(val) = var("SLACK_CHANNEL_ID") {
            self.slack.channel_id = Some(val);
        }
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
}

/// Search and retry behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Engine to search with (google, duckduckgo)
    pub engine: String,
    /// Override the engine's base URL
    pub engine_url: Option<String>,
    /// Retry rounds after the initial pass
    pub max_retries: i32,
    /// Delay after each attempt in a retry round (seconds)
    pub retry_delay: f64,
    /// Freshness window passed to the engine
    pub time_range: Option<TimeRange>,
    /// Language tag for the search
    pub language: String,
}

impl SearchSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay.max(0.0))
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            engine: "google".to_string(),
            engine_url: None,
            max_retries: 3,
            retry_delay: 5.0,
            time_range: Some(TimeRange::Day),
            language: "en-US".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Per-attempt request timeout in seconds
    pub request_timeout: f64,
    /// User agent suffix appended to the generated user agent
    pub useragent_suffix: Option<String>,
    /// Pool max size
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            useragent_suffix: None,
            pool_maxsize: 4,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Locations of the input and output artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// One company name per line
    pub companies_file: PathBuf,
    /// One blacklisted substring per line
    pub blacklist_file: PathBuf,
    /// Directory receiving CSV and summary files
    pub news_dir: PathBuf,
    /// Archive directory for distributed files
    pub legacy_dir: PathBuf,
    /// Terms that stayed unresolved after all retries
    pub failed_terms_file: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            companies_file: PathBuf::from("companies_to_search.txt"),
            blacklist_file: PathBuf::from("blacklist.txt"),
            news_dir: PathBuf::from("news"),
            legacy_dir: PathBuf::from("legacy_news"),
            failed_terms_file: PathBuf::from("failed_terms.txt"),
        }
    }
}

/// CSV export settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Sort exported rows freshest first instead of completion order
    pub sort_by_freshness: bool,
}

/// Language model summarizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerSettings {
    pub enabled: bool,
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub system_prompt: String,
    pub instruction: String,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://api.anthropic.com/v1".to_string(),
            api_key: None,
            model: "claude-3-5-sonnet-20240620".to_string(),
            max_tokens: 1024,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
        }
    }
}

/// Slack distribution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackSettings {
    pub enabled: bool,
    pub api_url: String,
    pub bot_token: Option<String>,
    pub channel_id: Option<String>,
    pub initial_comment: String,
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://slack.com/api".to_string(),
            bot_token: None,
            channel_id: None,
            initial_comment: DEFAULT_INITIAL_COMMENT.to_string(),
        }
    }
}
