//! CSV export of search results and the unresolved-term log

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::results::SearchResult;
use chrono::{DateTime, Local};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const COLLABORATOR: &str = "csv export";

/// Column order of exported result files
pub const RESULT_COLUMNS: [&str; 5] = ["company", "released", "title", "url", "description"];

/// Timestamp used in artifact file names
pub fn file_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y_%m_%d_%H_%M_%S").to_string()
}

/// `competitor_news_<timestamp>.csv` inside `dir`
pub fn results_file_name(dir: &Path, timestamp: &str) -> PathBuf {
    dir.join(format!("competitor_news_{}.csv", timestamp))
}

/// Write results as CSV: a header row, then one row per result
///
/// With `sort_by_freshness` rows are stably ordered freshest first and
/// rows without a parsable label last.
pub fn write_results(
    path: &Path,
    results: &[SearchResult],
    sort_by_freshness: bool,
) -> CollaboratorResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;
    }

    let mut rows: Vec<&SearchResult> = results.iter().collect();
    if sort_by_freshness {
        rows.sort_by_key(|r| r.freshness());
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| CollaboratorError::csv(COLLABORATOR, e))?;

    // Explicit header so an empty result set still yields the columns
    writer
        .write_record(RESULT_COLUMNS)
        .map_err(|e| CollaboratorError::csv(COLLABORATOR, e))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| CollaboratorError::csv(COLLABORATOR, e))?;
    }
    writer
        .flush()
        .map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;

    info!("Results saved to {}", path.display());
    Ok(())
}

/// Write unresolved terms one per line; nothing is written for an empty list
///
/// Returns whether the file was written.
pub fn write_unresolved(path: &Path, unresolved: &[String]) -> CollaboratorResult<bool> {
    if unresolved.is_empty() {
        return Ok(false);
    }

    let mut file = fs::File::create(path).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;
    for term in unresolved {
        writeln!(file, "{}", term).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;
    }

    warn!(
        "Failed to process the following terms after retries: {:?} (logged to {})",
        unresolved,
        path.display()
    );
    Ok(true)
}
