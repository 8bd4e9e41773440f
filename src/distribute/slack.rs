//! Slack file uploads through the external upload flow

use super::{Distributor, UploadReport, UploadStatus};
use crate::config::SlackSettings;
use crate::error::{CollaboratorError, CollaboratorResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const COLLABORATOR: &str = "slack";

#[derive(Debug, Deserialize)]
struct UploadUrlResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    upload_url: Option<String>,
    #[serde(default)]
    file_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompleteResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    files: Vec<CompletedFile>,
}

#[derive(Debug, Deserialize)]
struct CompletedFile {
    #[serde(default)]
    permalink: Option<String>,
}

/// Uploads files to one Slack channel with a bot token
pub struct SlackDistributor {
    http: reqwest::Client,
    api_url: String,
    token: String,
    channel_id: String,
    initial_comment: String,
}

impl SlackDistributor {
    pub fn new(token: impl Into<String>, channel_id: impl Into<String>) -> Self {
        let defaults = SlackSettings::default();
        Self {
            http: reqwest::Client::new(),
            api_url: defaults.api_url,
            token: token.into(),
            channel_id: channel_id.into(),
            initial_comment: defaults.initial_comment,
        }
    }

    /// Build from settings; token and channel are required
    pub fn from_settings(settings: &SlackSettings) -> CollaboratorResult<Self> {
        let token = settings
            .bot_token
            .clone()
            .ok_or_else(|| CollaboratorError::unavailable(COLLABORATOR, "no bot token configured"))?;
        let channel_id = settings
            .channel_id
            .clone()
            .ok_or_else(|| CollaboratorError::unavailable(COLLABORATOR, "no channel configured"))?;

        Ok(Self::new(token, channel_id)
            .with_api_url(&settings.api_url)
            .with_initial_comment(&settings.initial_comment))
    }

    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_initial_comment(mut self, comment: &str) -> Self {
        self.initial_comment = comment.to_string();
        self
    }

    fn api_error(method: &str, error: Option<String>) -> CollaboratorError {
        CollaboratorError::unavailable(
            COLLABORATOR,
            format!("{} failed: {}", method, error.unwrap_or_else(|| "unknown_error".into())),
        )
    }

    fn request_error(err: reqwest::Error) -> CollaboratorError {
        CollaboratorError::unavailable(COLLABORATOR, err.to_string())
    }

    /// Upload one file; returns its permalink when Slack reports one
    pub async fn upload(&self, path: &Path) -> CollaboratorResult<Option<String>> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CollaboratorError::io(COLLABORATOR, e))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let ticket: UploadUrlResponse = self
            .http
            .post(format!("{}/files.getUploadURLExternal", self.api_url))
            .bearer_auth(&self.token)
            .form(&[("filename", filename.clone()), ("length", bytes.len().to_string())])
            .send()
            .await
            .map_err(Self::request_error)?
            .json()
            .await
            .map_err(Self::request_error)?;

        let (upload_url, file_id) = match (ticket.ok, ticket.upload_url, ticket.file_id) {
            (true, Some(url), Some(id)) => (url, id),
            (_, _, _) => return Err(Self::api_error("files.getUploadURLExternal", ticket.error)),
        };

        let response = self
            .http
            .post(&upload_url)
            .body(bytes)
            .send()
            .await
            .map_err(Self::request_error)?;
        if !response.status().is_success() {
            return Err(CollaboratorError::Api {
                collaborator: COLLABORATOR,
                status: response.status().as_u16(),
                message: format!("upload of {} rejected", filename),
            });
        }

        let completed: CompleteResponse = self
            .http
            .post(format!("{}/files.completeUploadExternal", self.api_url))
            .bearer_auth(&self.token)
            .json(&json!({
                "files": [{"id": file_id, "title": filename}],
                "channel_id": self.channel_id,
                "initial_comment": self.initial_comment,
            }))
            .send()
            .await
            .map_err(Self::request_error)?
            .json()
            .await
            .map_err(Self::request_error)?;

        if !completed.ok {
            return Err(Self::api_error("files.completeUploadExternal", completed.error));
        }

        Ok(completed.files.into_iter().find_map(|f| f.permalink))
    }
}

#[async_trait]
impl Distributor for SlackDistributor {
    async fn distribute(&self, files: &[PathBuf]) -> UploadReport {
        let mut report = UploadReport::default();

        for path in files {
            if !path.exists() {
                warn!("File not found: {}", path.display());
                report.push(path, UploadStatus::Skipped);
                continue;
            }

            match self.upload(path).await {
                Ok(permalink) => {
                    info!(
                        "File uploaded successfully: {} ({})",
                        path.display(),
                        permalink.as_deref().unwrap_or("no permalink")
                    );
                    report.push(path, UploadStatus::Uploaded { permalink });
                }
                Err(e) => {
                    warn!("Error uploading file {}: {}", path.display(), e);
                    report.push(path, UploadStatus::Failed(e.to_string()));
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_upload_flow(server: &MockServer, complete_ok: bool) {
        Mock::given(method("POST"))
            .and(path("/api/files.getUploadURLExternal"))
            .and(header("authorization", "Bearer xoxb-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "upload_url": format!("{}/upload/F1", server.uri()),
                "file_id": "F1",
            })))
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/upload/F1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;

        let complete = if complete_ok {
            json!({"ok": true, "files": [{"id": "F1", "permalink": "https://slack.example/F1"}]})
        } else {
            json!({"ok": false, "error": "not_in_channel"})
        };
        Mock::given(method("POST"))
            .and(path("/api/files.completeUploadExternal"))
            .and(body_partial_json(json!({"channel_id": "C123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(complete))
            .mount(server)
            .await;
    }

    fn distributor(server: &MockServer) -> SlackDistributor {
        SlackDistributor::new("xoxb-test", "C123").with_api_url(&format!("{}/api", server.uri()))
    }

    #[tokio::test]
    async fn test_uploads_and_skips_missing() {
        let server = MockServer::start().await;
        mount_upload_flow(&server, true).await;

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let table = dir.join("news_blacklisted.csv");
        fs::write(&table, "company\nAcme\n").unwrap();
        let missing = dir.join("missing.txt");

        let report = distributor(&server)
            .distribute(&[table.clone(), missing.clone()])
            .await;

        assert_eq!(report.files.len(), 2);
        assert_eq!(
            report.files[0].status,
            UploadStatus::Uploaded {
                permalink: Some("https://slack.example/F1".to_string())
            }
        );
        assert_eq!(report.files[1].path, missing);
        assert_eq!(report.files[1].status, UploadStatus::Skipped);
        assert!(!report.all_succeeded());
    }

    #[tokio::test]
    async fn test_api_error_recorded_per_file() {
        let server = MockServer::start().await;
        mount_upload_flow(&server, false).await;

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let table = dir.join("a_blacklisted.csv");
        let summary = dir.join("summary.txt");
        fs::write(&table, "x").unwrap();
        fs::write(&summary, "y").unwrap();

        let report = distributor(&server).distribute(&[table, summary]).await;

        assert_eq!(report.files.len(), 2);
        for file in &report.files {
            match &file.status {
                UploadStatus::Failed(message) => assert!(message.contains("not_in_channel")),
                other => panic!("unexpected status {:?}", other),
            }
        }
    }

    #[test]
    fn test_from_settings_requires_token() {
        let settings = SlackSettings {
            channel_id: Some("C1".to_string()),
            ..Default::default()
        };
        assert!(SlackDistributor::from_settings(&settings).is_err());
    }
}
