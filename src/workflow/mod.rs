//! End-to-end run: search, export, filter, summarize, distribute, archive

use crate::archive::move_news_files;
use crate::config::Settings;
use crate::distribute::{files_to_upload, latest_matching, Distributor, SlackDistributor, UploadReport};
use crate::engines::EngineLoader;
use crate::export::{file_timestamp, results_file_name, write_results, write_unresolved};
use crate::filter::{filter_csv, Blacklist, FILTERED_SUFFIX};
use crate::network::HttpClient;
use crate::search::{EngineSearcher, SearchRetryPipeline, TermSearcher};
use crate::summarize::{summarize_file, ClaudeSummarizer, Summarizer};
use anyhow::{bail, Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Read search terms: one per line, trimmed, blank lines skipped
pub fn read_terms(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read companies file {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// What a workflow run produced
#[derive(Debug, Default)]
pub struct WorkflowReport {
    pub result_count: usize,
    pub unresolved: Vec<String>,
    pub results_file: PathBuf,
    pub filtered_file: PathBuf,
    pub summary_file: Option<PathBuf>,
    pub uploads: Option<UploadReport>,
    /// Number of files archived, if archival ran
    pub archived: Option<usize>,
}

/// The daily competitor news run
pub struct Workflow<S> {
    settings: Settings,
    pipeline: SearchRetryPipeline<S>,
    summarizer: Option<Box<dyn Summarizer>>,
    distributor: Option<Box<dyn Distributor>>,
}

impl Workflow<EngineSearcher> {
    /// Wire up the configured engine, summarizer and distributor
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let client = HttpClient::with_settings(&settings.outgoing)?;
        let engine = EngineLoader::load(&settings.search)?;

        let searcher = EngineSearcher::new(client, engine)
            .with_lang(settings.search.language.clone())
            .with_time_range(settings.search.time_range);

        let summarizer: Option<Box<dyn Summarizer>> = if settings.summarizer.enabled {
            let Some(api_key) = settings.summarizer.api_key.clone() else {
                bail!("summarizer is enabled but no API key is set (ANTHROPIC_API_KEY)");
            };
            Some(Box::new(ClaudeSummarizer::from_settings(
                &settings.summarizer,
                api_key,
            )))
        } else {
            None
        };

        let distributor: Option<Box<dyn Distributor>> = if settings.slack.enabled {
            Some(Box::new(
                SlackDistributor::from_settings(&settings.slack)
                    .context("Slack distribution is enabled but not configured")?,
            ))
        } else {
            None
        };

        let mut workflow = Self::new(settings, searcher);
        workflow.summarizer = summarizer;
        workflow.distributor = distributor;
        Ok(workflow)
    }
}

impl<S: TermSearcher> Workflow<S> {
    /// Workflow with only the search and file steps; attach a summarizer and
    /// distributor separately
    pub fn new(settings: Settings, searcher: S) -> Self {
        let pipeline =
            SearchRetryPipeline::new(searcher).with_retry_delay(settings.search.retry_delay());
        Self {
            settings,
            pipeline,
            summarizer: None,
            distributor: None,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_distributor(mut self, distributor: Box<dyn Distributor>) -> Self {
        self.distributor = Some(distributor);
        self
    }

    pub async fn run(&self) -> Result<WorkflowReport> {
        let paths = &self.settings.paths;
        let terms = read_terms(&paths.companies_file)?;
        let outcome = self
            .pipeline
            .run(&terms, self.settings.search.max_retries)
            .await?;

        let timestamp = file_timestamp(Local::now());
        let results_file = results_file_name(&paths.news_dir, &timestamp);
        write_results(
            &results_file,
            &outcome.results,
            self.settings.export.sort_by_freshness,
        )?;
        write_unresolved(&paths.failed_terms_file, &outcome.unresolved)?;

        info!("Creating blacklisted csv");
        let blacklist = Blacklist::from_file(&paths.blacklist_file)?;
        let (filtered_file, _) = filter_csv(&results_file, &blacklist)?;

        let summary_file = match &self.summarizer {
            Some(summarizer) => Some(
                summarize_file(
                    summarizer.as_ref(),
                    &self.settings.summarizer.instruction,
                    &filtered_file,
                    &paths.news_dir,
                    &timestamp,
                )
                .await?,
            ),
            None => None,
        };

        let uploads = match &self.distributor {
            Some(distributor) => {
                let files = if summary_file.is_some() {
                    files_to_upload(&paths.news_dir)?
                } else {
                    vec![latest_matching(&paths.news_dir, FILTERED_SUFFIX)?]
                };
                Some(distributor.distribute(&files).await)
            }
            None => None,
        };

        let archived = match &uploads {
            Some(report) if report.all_succeeded() => {
                Some(move_news_files(&paths.news_dir, &paths.legacy_dir)?)
            }
            Some(report) => {
                for failure in report.failures() {
                    warn!(
                        "Not archiving: {} was not uploaded ({:?})",
                        failure.path.display(),
                        failure.status
                    );
                }
                None
            }
            None => None,
        };

        Ok(WorkflowReport {
            result_count: outcome.results.len(),
            unresolved: outcome.unresolved,
            results_file,
            filtered_file,
            summary_file,
            uploads,
            archived,
        })
    }
}
