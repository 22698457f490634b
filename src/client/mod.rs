use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ClientError;
use crate::types::{Credentials, InvestigationReport};

/// Anything the poller can pull reports from.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// False until an identity has been resolved
    fn is_authenticated(&self) -> bool;

    async fn list_reports(&self) -> Result<Vec<InvestigationReport>, ClientError>;

    async fn get_report(&self, alert_id: &str) -> Result<Option<InvestigationReport>, ClientError>;
}

/// Authenticated accessor for the reports API
#[derive(Debug, Clone)]
pub struct ReportClient {
    http: reqwest::Client,
    host_url: String,
    credentials: Option<Credentials>,
}

impl ReportClient {
    pub fn new(host_url: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self {
            http: reqwest::Client::new(),
            host_url: host_url.into(),
            credentials: credentials.filter(Credentials::is_complete),
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    async fn get(&self, credentials: &Credentials, url: Url) -> Result<Response, ClientError> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, basic_auth_header(credentials))
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl ReportSource for ReportClient {
    fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    async fn list_reports(&self) -> Result<Vec<InvestigationReport>, ClientError> {
        let Some(credentials) = &self.credentials else {
            return Ok(Vec::new());
        };

        let url = endpoint(&self.host_url, &["logfire", "reports"])?;
        let response = self.get(credentials, url).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        parse_body(response).await
    }

    async fn get_report(&self, alert_id: &str) -> Result<Option<InvestigationReport>, ClientError> {
        let Some(credentials) = &self.credentials else {
            return Ok(None);
        };

        let url = endpoint(&self.host_url, &["logfire", "report", alert_id])?;
        let response = self.get(credentials, url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        parse_body(response).await.map(Some)
    }
}

/// `Basic base64(id:secret)`
pub fn basic_auth_header(credentials: &Credentials) -> String {
    let encoded = general_purpose::STANDARD
        .encode(format!("{}:{}", credentials.user_id, credentials.secret).as_bytes());
    format!("Basic {}", encoded)
}

/// Join path segments onto the base URL, keeping the backend's trailing slash.
/// Segments are percent-encoded, so alert ids cannot escape their path slot.
pub(crate) fn endpoint(host_url: &str, segments: &[&str]) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(host_url)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments)
        .push("");
    Ok(url)
}

/// Pull a human readable message out of an error response.
pub(crate) async fn error_message(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("message"))
                .or_else(|| v.get("error"))
                .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        });

    (status, message)
}

async fn status_error(response: Response) -> ClientError {
    let (status, message) = error_message(response).await;
    ClientError::Status { status, message }
}

async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))
}
