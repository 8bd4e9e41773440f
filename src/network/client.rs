//! HTTP client for making requests to search engines

use super::user_agent::{accept_html, accept_language, generate_user_agent};
use crate::config::OutgoingSettings;
use crate::engines::{EngineRequest, EngineResponse, HttpMethod};
use crate::error::SearchError;
use anyhow::Result;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP client wrapper configured from the outgoing settings
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
    useragent_suffix: Option<String>,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;
        let mut http = Self {
            client,
            default_timeout: Duration::from_secs_f64(settings.request_timeout),
            user_agent: String::new(),
            useragent_suffix: settings.useragent_suffix.clone(),
            extra_headers: settings.extra_headers.clone(),
        };
        http.rotate_user_agent();

        Ok(http)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Execute an engine request
    pub async fn execute(&self, request: EngineRequest) -> Result<EngineResponse, SearchError> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        req_builder = req_builder
            .timeout(self.default_timeout)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_html())
            .header("DNT", "1")
            .header("Upgrade-Insecure-Requests", "1");

        if !request.headers.contains_key("Accept-Language") {
            req_builder = req_builder.header("Accept-Language", accept_language("en-US"));
        }

        for (key, value) in self.extra_headers.iter().chain(&request.headers) {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        if !request.cookies.is_empty() {
            let cookie_str = request
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            req_builder = req_builder.header("Cookie", cookie_str);
        }

        if let Some(form) = request.form {
            req_builder = req_builder.form(&form);
        }

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Parse response into EngineResponse
    async fn parse_response(response: Response) -> Result<EngineResponse, SearchError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response.text().await?;

        Ok(EngineResponse { status, text, url })
    }

    /// Get a new user agent
    pub fn rotate_user_agent(&mut self) {
        let mut ua = generate_user_agent();
        if let Some(ref suffix) = self.useragent_suffix {
            ua.push(' ');
            ua.push_str(suffix);
        }
        self.user_agent = ua;
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_user_agent_suffix() {
        let settings = OutgoingSettings {
            useragent_suffix: Some("competitor-news".to_string()),
            ..Default::default()
        };
        let client = HttpClient::with_settings(&settings).unwrap();
        assert!(client.user_agent().ends_with(" competitor-news"));
    }

    #[tokio::test]
    async fn test_execute_sends_params_and_cookies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Acme news"))
            .and(header("Cookie", "CONSENT=YES"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = EngineRequest::get(format!("{}/search", server.uri()))
            .param("q", "Acme news")
            .cookie("CONSENT", "YES");

        let response = client.execute(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_network_failure_maps_to_search_error() {
        // Reserve a free port, then release it so nothing is listening
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let client = HttpClient::new().unwrap();
        let err = client
            .execute(EngineRequest::get(format!("http://127.0.0.1:{}/search", port)))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Network(_) | SearchError::Timeout));
    }
}
