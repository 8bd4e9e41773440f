//! Blacklist filtering of exported result rows
//!
//! A row is dropped when any of its fields contains a blacklisted
//! substring, compared case-insensitively. Surviving rows gain a `source`
//! column holding the host of their URL.

use crate::error::{CollaboratorError, CollaboratorResult};
use crate::results::SearchResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

const COLLABORATOR: &str = "blacklist filter";

/// Suffix marking a filtered CSV file
pub const FILTERED_SUFFIX: &str = "_blacklisted.csv";

/// Lowercased substrings that disqualify a row
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    words: Vec<String>,
}

impl Blacklist {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() && !list.contains(&word) {
                list.push(word);
            }
        }
        Self { words: list }
    }

    /// Load one entry per line; blank lines are ignored
    pub fn from_file(path: &Path) -> CollaboratorResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;
        Ok(Self::new(text.lines()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether any field contains any blacklisted substring
    pub fn matches<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        fields.into_iter().any(|field| {
            let field = field.to_lowercase();
            self.words.iter().any(|word| field.contains(word.as_str()))
        })
    }

    /// Whether a result row should be dropped
    pub fn rejects(&self, row: &SearchResult) -> bool {
        let fields = [
            Some(row.company.as_str()),
            row.released.as_deref(),
            row.title.as_deref(),
            row.url.as_deref(),
            row.description.as_deref(),
        ];
        self.matches(fields.into_iter().flatten())
    }
}

/// A result row that passed the blacklist, with its URL host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredRow {
    pub company: String,
    pub released: Option<String>,
    pub source: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

impl From<SearchResult> for FilteredRow {
    fn from(row: SearchResult) -> Self {
        let source = row.url.as_deref().and_then(source_host);
        Self {
            company: row.company,
            released: row.released,
            source,
            title: row.title,
            url: row.url,
            description: row.description,
        }
    }
}

/// Host part of a URL, e.g. "www.fiercebiotech.com"
pub fn source_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

/// Drop blacklisted rows and attach the source column
pub fn filter_rows(rows: Vec<SearchResult>, blacklist: &Blacklist) -> Vec<FilteredRow> {
    rows.into_iter()
        .filter(|row| !blacklist.rejects(row))
        .map(FilteredRow::from)
        .collect()
}

/// Output path for a filtered copy of `input`: `<stem>_blacklisted.csv`
pub fn filtered_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}", stem, FILTERED_SUFFIX))
}

/// Most recent unfiltered CSV in `dir`, by file name
///
/// Exported names carry a sortable timestamp, so the greatest name is the
/// newest export.
pub fn find_unfiltered_csv(dir: &Path) -> CollaboratorResult<Option<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            name.ends_with(".csv") && !name.ends_with(FILTERED_SUFFIX)
        })
        .collect();
    candidates.sort();

    Ok(candidates.pop())
}

/// Filter the CSV at `input` and write the surviving rows next to it
///
/// Returns the path of the filtered file and the number of rows kept.
pub fn filter_csv(input: &Path, blacklist: &Blacklist) -> CollaboratorResult<(PathBuf, usize)> {
    let mut reader =
        csv::Reader::from_path(input).map_err(|e| CollaboratorError::csv(COLLABORATOR, e))?;
    let rows = reader
        .deserialize::<SearchResult>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CollaboratorError::csv(COLLABORATOR, e))?;
    let total = rows.len();

    let kept = filter_rows(rows, blacklist);
    let output = filtered_path(input);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&output)
        .map_err(|e| CollaboratorError::csv(COLLABORATOR, e))?;
    writer
        .write_record(["company", "released", "source", "title", "url", "description"])
        .map_err(|e| CollaboratorError::csv(COLLABORATOR, e))?;
    for row in &kept {
        writer
            .serialize(row)
            .map_err(|e| CollaboratorError::csv(COLLABORATOR, e))?;
    }
    writer
        .flush()
        .map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;

    info!(
        "Kept {} of {} rows; filtered data saved to {}",
        kept.len(),
        total,
        output.display()
    );
    Ok((output, kept.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::write_results;

    fn row(company: &str, title: &str, url: &str) -> SearchResult {
        SearchResult::new(company).with_title(title).with_url(url)
    }

    #[test]
    fn test_blacklist_normalizes_entries() {
        let blacklist = Blacklist::new(["  TikTok ", "", "tiktok", "Instagram"]);
        assert_eq!(blacklist.len(), 2);
    }

    #[test]
    fn test_tiktok_rows_excluded_in_any_field() {
        let blacklist = Blacklist::new(["tiktok"]);
        let rows = vec![
            row("Acme", "Acme goes viral on TIKTOK", "https://news.example/1"),
            row("Acme", "Acme trial data", "https://www.tiktok.com/@acme"),
            row("TikTokBio", "Quarterly results", "https://news.example/2"),
            row("Acme", "Acme trial data", "https://news.example/3"),
        ];

        let kept = filter_rows(rows, &blacklist);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].url.as_deref(), Some("https://news.example/3"));
        assert_eq!(kept[0].source.as_deref(), Some("news.example"));
    }

    #[test]
    fn test_substring_not_token_match() {
        let blacklist = Blacklist::new(["gram"]);
        assert!(blacklist.matches(["see us on Instagram"]));
        assert!(!blacklist.matches(["Instagrm", "grain"]));
    }

    #[test]
    fn test_filtered_path() {
        assert_eq!(
            filtered_path(Path::new("news/competitor_news_2024_01_01_00_00_00.csv")),
            PathBuf::from("news/competitor_news_2024_01_01_00_00_00_blacklisted.csv")
        );
    }

    #[test]
    fn test_filter_csv_roundtrip_through_export() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let input = dir.join("competitor_news_2024_01_01_00_00_00.csv");
        let results = vec![
            row("Acme", "Acme on Instagram", "https://instagram.com/acme"),
            SearchResult::new("Acme")
                .with_title("Acme licenses antibody")
                .with_url("https://www.fiercebiotech.com/acme")
                .with_description("4 hours ago - licensing deal"),
            SearchResult::new("Beta"),
        ];
        write_results(&input, &results, false).unwrap();

        let (output, kept) = filter_csv(&input, &Blacklist::new(["instagram"])).unwrap();
        assert_eq!(kept, 2);

        let text = fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "company,released,source,title,url,description");
        assert_eq!(
            lines[1],
            "Acme,4 hours ago,www.fiercebiotech.com,Acme licenses antibody,https://www.fiercebiotech.com/acme,4 hours ago - licensing deal"
        );
        assert_eq!(lines[2], "Beta,,,,,");
    }

    #[test]
    fn test_find_unfiltered_csv_picks_newest() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        assert_eq!(find_unfiltered_csv(dir).unwrap(), None);

        for name in [
            "competitor_news_2024_01_01_00_00_00.csv",
            "competitor_news_2024_02_01_00_00_00.csv",
            "competitor_news_2024_03_01_00_00_00_blacklisted.csv",
            "notes.txt",
        ] {
            fs::write(dir.join(name), "").unwrap();
        }

        assert_eq!(
            find_unfiltered_csv(dir).unwrap(),
            Some(dir.join("competitor_news_2024_02_01_00_00_00.csv"))
        );
    }
}
