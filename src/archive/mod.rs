//! Archival of processed news files

use crate::error::{CollaboratorError, CollaboratorResult};
use std::fs;
use std::path::Path;
use tracing::info;

const COLLABORATOR: &str = "archive";

/// Extensions of artifacts that get archived
const ARCHIVED_EXTENSIONS: [&str; 2] = ["csv", "txt"];

fn is_archived(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ARCHIVED_EXTENSIONS.iter().any(|a| ext == *a))
            .unwrap_or(false)
}

/// Move every `.csv` and `.txt` file from `source` into `dest`
///
/// `dest` is created if needed. Returns the number of files moved.
pub fn move_news_files(source: &Path, dest: &Path) -> CollaboratorResult<usize> {
    fs::create_dir_all(dest).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;

    let entries = fs::read_dir(source).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;
    let mut moved = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        if !is_archived(&path) {
            continue;
        }

        let target = dest.join(entry.file_name());
        if fs::rename(&path, &target).is_err() {
            // rename fails across filesystems
            fs::copy(&path, &target).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;
            fs::remove_file(&path).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;
        }
        moved += 1;
    }

    if moved > 0 {
        info!(
            "All matching files have been moved to {} ({} files)",
            dest.display(),
            moved
        );
    } else {
        info!("No .csv or .txt files found in {}", source.display());
    }

    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_only_csv_and_txt() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let news = root.join("news");
        let legacy = root.join("legacy_news");
        fs::create_dir_all(news.join("sub")).unwrap();
        for name in ["a.csv", "a_blacklisted.csv", "summary.txt", "notes.md", "image.png"] {
            fs::write(news.join(name), name).unwrap();
        }

        let moved = move_news_files(&news, &legacy).unwrap();

        assert_eq!(moved, 3);
        assert!(legacy.join("a.csv").exists());
        assert!(legacy.join("a_blacklisted.csv").exists());
        assert_eq!(fs::read_to_string(legacy.join("summary.txt")).unwrap(), "summary.txt");
        assert!(news.join("notes.md").exists());
        assert!(news.join("image.png").exists());
        assert!(news.join("sub").is_dir());
        assert!(!news.join("a.csv").exists());
    }

    #[test]
    fn test_nothing_to_move() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let news = root.join("news");
        fs::create_dir_all(&news).unwrap();

        assert_eq!(move_news_files(&news, &root.join("legacy")).unwrap(), 0);
        assert!(root.join("legacy").is_dir());
    }

    #[test]
    fn test_missing_source_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let err = move_news_files(&root.join("absent"), &root.join("legacy")).unwrap_err();
        assert!(matches!(err, CollaboratorError::Io { .. }));
    }
}
