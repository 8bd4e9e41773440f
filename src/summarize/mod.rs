//! Language-model summary of the filtered news table

mod claude;

pub use claude::{ClaudeSummarizer, NO_RESPONSE};

use crate::error::{CollaboratorError, CollaboratorResult};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const COLLABORATOR: &str = "summarizer";

/// Turns tabular text plus an instruction prompt into free text
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, instruction: &str, table: &str) -> CollaboratorResult<String>;
}

/// Wrap summary text between two 60-character divider lines
pub fn format_summary(text: &str) -> String {
    let divider = "=".repeat(60);
    format!("\n{divider}\n{text}\n{divider}\n")
}

/// `LLM_summary_competitor_news_<timestamp>.txt` inside `dir`
pub fn summary_file_name(dir: &Path, timestamp: &str) -> PathBuf {
    dir.join(format!("LLM_summary_competitor_news_{}.txt", timestamp))
}

/// Write a formatted summary, headed by `competitor news <timestamp>`
pub fn write_summary(path: &Path, timestamp: &str, text: &str) -> CollaboratorResult<()> {
    let content = format!("competitor news {}{}", timestamp, format_summary(text));
    fs::write(path, content).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;
    info!("Summary written to {}", path.display());
    Ok(())
}

/// Summarize the filtered CSV at `table_path` and write the summary file
/// into `dir`
pub async fn summarize_file<S: Summarizer + ?Sized>(
    summarizer: &S,
    instruction: &str,
    table_path: &Path,
    dir: &Path,
    timestamp: &str,
) -> CollaboratorResult<PathBuf> {
    let table =
        fs::read_to_string(table_path).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;

    info!("Summarizing {}", table_path.display());
    let text = summarizer.summarize(instruction, &table).await?;

    let path = summary_file_name(dir, timestamp);
    write_summary(&path, timestamp, &text)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct EchoSummarizer {
        seen: Mutex<Option<(String, String)>>,
    }

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, instruction: &str, table: &str) -> CollaboratorResult<String> {
            *self.seen.lock().unwrap() = Some((instruction.to_string(), table.to_string()));
            Ok("Acme announced a partnership.".to_string())
        }
    }

    #[test]
    fn test_format_summary() {
        let formatted = format_summary("hello");
        let lines: Vec<_> = formatted.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(60));
        assert_eq!(lines[2], "hello");
        assert_eq!(lines[3], "=".repeat(60));
    }

    #[tokio::test]
    async fn test_summarize_file_writes_summary() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let table_path = dir.join("competitor_news_x_blacklisted.csv");
        fs::write(&table_path, "company,released\nAcme,2 hours ago\n").unwrap();

        let summarizer = EchoSummarizer {
            seen: Mutex::new(None),
        };
        let path = summarize_file(
            &summarizer,
            "Summarize the table.",
            &table_path,
            dir,
            "2024_05_01_08_00_00",
        )
        .await
        .unwrap();

        assert_eq!(
            path.file_name().unwrap(),
            "LLM_summary_competitor_news_2024_05_01_08_00_00.txt"
        );
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("competitor news 2024_05_01_08_00_00\n===="));
        assert!(text.contains("\nAcme announced a partnership.\n"));

        let (instruction, table) = summarizer.seen.lock().unwrap().clone().unwrap();
        assert_eq!(instruction, "Summarize the table.");
        assert!(table.contains("Acme,2 hours ago"));
    }

    #[tokio::test]
    async fn test_missing_table_is_error() {
        let summarizer = EchoSummarizer {
            seen: Mutex::new(None),
        };
        let err = summarize_file(
            &summarizer,
            "x",
            Path::new("/nonexistent/competitor-news/table.csv"),
            Path::new("/nonexistent"),
            "ts",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CollaboratorError::Io { .. }));
    }
}
