//! competitor-news: search, filter, summarize and distribute competitor news
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use competitor_news::{config, Workflow};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Daily competitor news search, summary and Slack distribution
///
/// Credentials are read from ANTHROPIC_API_KEY, SLACK_BOT_TOKEN and
/// SLACK_CHANNEL_ID; COMPETITOR_NEWS_* variables override settings.
#[derive(Parser, Debug)]
#[command(name = "competitor-news", version)]
struct CliArgs {
    /// Path to the YAML settings file
    #[arg(short, long, env = config::SETTINGS_PATH_VAR)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let settings = config::load(cli_args.config.as_deref())?;

    // Initialize logging
    let level = if settings.general.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .init();

    info!("Starting competitor-news v{}", competitor_news::VERSION);

    let workflow = Workflow::from_settings(settings)?;
    let report = workflow.run().await?;

    info!(
        "Done: {} results, {} unresolved terms, filtered file {}",
        report.result_count,
        report.unresolved.len(),
        report.filtered_file.display()
    );
    if let Some(archived) = report.archived {
        info!("Archived {} files", archived);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_config_flag() {
        let args = CliArgs::try_parse_from(["competitor-news", "-c", "custom.yml"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("custom.yml")));
    }
}
