//! Distribution of the day's artifacts to a chat channel

mod slack;

pub use slack::SlackDistributor;

use crate::error::{CollaboratorError, CollaboratorResult};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const COLLABORATOR: &str = "distribution";

/// Pushes files to an external channel, one outcome per file
#[async_trait]
pub trait Distributor: Send + Sync {
    async fn distribute(&self, files: &[PathBuf]) -> UploadReport;
}

/// Outcome of one file upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Uploaded { permalink: Option<String> },
    /// File was not on disk
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub path: PathBuf,
    pub status: UploadStatus,
}

/// Per-file outcomes of a distribution batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub files: Vec<FileUpload>,
}

impl UploadReport {
    pub fn push(&mut self, path: &Path, status: UploadStatus) {
        self.files.push(FileUpload {
            path: path.to_path_buf(),
            status,
        });
    }

    /// Whether every file in the batch was uploaded
    pub fn all_succeeded(&self) -> bool {
        !self.files.is_empty()
            && self
                .files
                .iter()
                .all(|f| matches!(f.status, UploadStatus::Uploaded { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileUpload> {
        self.files
            .iter()
            .filter(|f| !matches!(f.status, UploadStatus::Uploaded { .. }))
    }
}

/// Most recently modified file in `dir` whose name ends with `suffix`
pub fn latest_matching(dir: &Path, suffix: &str) -> CollaboratorResult<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        let matches = path
            .file_name()
            .map(|n| n.to_string_lossy().ends_with(suffix))
            .unwrap_or(false);
        if !matches || !path.is_file() {
            continue;
        }

        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        if latest.as_ref().map_or(true, |(t, _)| modified >= *t) {
            latest = Some((modified, path));
        }
    }

    latest.map(|(_, path)| path).ok_or_else(|| {
        CollaboratorError::unavailable(
            COLLABORATOR,
            format!("no *{} files found in {}", suffix, dir.display()),
        )
    })
}

/// The filtered table and the summary to upload, newest of each
pub fn files_to_upload(news_dir: &Path) -> CollaboratorResult<Vec<PathBuf>> {
    Ok(vec![
        latest_matching(news_dir, crate::filter::FILTERED_SUFFIX)?,
        latest_matching(news_dir, ".txt")?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_latest_matching_by_mtime() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("b_blacklisted.csv"), "old").unwrap();
        std::thread::sleep(Duration::from_millis(20));
        fs::write(dir.join("a_blacklisted.csv"), "new").unwrap();
        fs::write(dir.join("c.csv"), "unfiltered").unwrap();

        let latest = latest_matching(dir, "_blacklisted.csv").unwrap();
        assert_eq!(latest, dir.join("a_blacklisted.csv"));
    }

    #[test]
    fn test_no_match_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("c.csv"), "").unwrap();

        let err = files_to_upload(dir).unwrap_err();
        assert!(matches!(err, CollaboratorError::Unavailable { .. }));
    }

    #[test]
    fn test_report_success() {
        let mut report = UploadReport::default();
        assert!(!report.all_succeeded());

        report.push(Path::new("a.csv"), UploadStatus::Uploaded { permalink: None });
        assert!(report.all_succeeded());

        report.push(Path::new("b.txt"), UploadStatus::Skipped);
        assert!(!report.all_succeeded());
        assert_eq!(report.failures().count(), 1);
    }
}
