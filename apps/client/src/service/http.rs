use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::ScanService;
use crate::errors::{ClientError, Operation};
use crate::models::{AiSuggestionResult, HistoryEntry, ScanResult};
use crate::session::InputSnapshot;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP backend for the scan service.
///
/// Each call is a single request/response with no retries. The whole-request
/// timeout turns a dropped connection into an ordinary transport error.
#[derive(Clone)]
pub struct HttpScanService {
    client: Client,
    base_url: String,
}

impl HttpScanService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_inputs<T: DeserializeOwned>(
        &self,
        path: &str,
        inputs: &InputSnapshot,
        operation: Operation,
    ) -> Result<T, ClientError> {
        debug!(
            "POST {path}: resume={} ({} bytes), job_description={} chars",
            inputs.document.file_name(),
            inputs.document.len(),
            inputs.job_description.chars().count()
        );

        let response = self
            .client
            .post(self.url(path))
            .multipart(build_form(inputs)?)
            .send()
            .await?;

        read_json(response, operation).await
    }
}

#[async_trait]
impl ScanService for HttpScanService {
    async fn submit_scan(&self, inputs: &InputSnapshot) -> Result<ScanResult, ClientError> {
        self.post_inputs("/api/scan", inputs, Operation::Scan).await
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>, ClientError> {
        let response = self.client.get(self.url("/api/scans")).send().await?;
        read_json(response, Operation::ListHistory).await
    }

    async fn fetch_scan(&self, id: &str) -> Result<ScanResult, ClientError> {
        let path = format!("/api/scan/{}", encode_path_segment(id));
        let response = self.client.get(self.url(&path)).send().await?;
        read_json(response, Operation::FetchScan).await
    }

    async fn request_ai_suggestions(
        &self,
        inputs: &InputSnapshot,
    ) -> Result<AiSuggestionResult, ClientError> {
        self.post_inputs("/api/ai-suggestions", inputs, Operation::AiSuggestions)
            .await
    }
}

/// Multipart body shared by scan and AI submissions: `resume` + `jobDescription`.
fn build_form(inputs: &InputSnapshot) -> Result<Form, ClientError> {
    let document = &inputs.document;
    let resume = Part::bytes(document.bytes().to_vec())
        .file_name(document.file_name().to_string())
        .mime_str(document.content_type())?;

    Ok(Form::new()
        .part("resume", resume)
        .text("jobDescription", inputs.job_description.clone()))
}

/// Reads the body once. Non-2xx keeps the raw text for message extraction;
/// 2xx must decode as `T`.
async fn read_json<T: DeserializeOwned>(
    response: Response,
    operation: Operation,
) -> Result<T, ClientError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("{operation:?} returned {status}: {body}");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        warn!("{operation:?} returned an undecodable body: {e}");
        ClientError::Decode(e)
    })
}

/// Percent-encodes an opaque id for use as one path segment.
fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
