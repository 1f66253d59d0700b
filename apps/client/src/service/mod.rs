//! Remote Scan Service: the single point of entry for all calls to the
//! scoring backend.
//!
//! Session code only ever talks to `dyn ScanService`; `HttpScanService` is the
//! production backend, tests swap in scripted doubles.

use async_trait::async_trait;

use crate::errors::ClientError;
use crate::models::{AiSuggestionResult, HistoryEntry, ScanResult};
use crate::session::InputSnapshot;

pub mod http;

pub use http::HttpScanService;

#[async_trait]
pub trait ScanService: Send + Sync {
    /// POST /api/scan
    async fn submit_scan(&self, inputs: &InputSnapshot) -> Result<ScanResult, ClientError>;

    /// GET /api/scans, newest first as ordered by the server.
    async fn list_history(&self) -> Result<Vec<HistoryEntry>, ClientError>;

    /// GET /api/scan/{id}
    async fn fetch_scan(&self, id: &str) -> Result<ScanResult, ClientError>;

    /// POST /api/ai-suggestions
    async fn request_ai_suggestions(
        &self,
        inputs: &InputSnapshot,
    ) -> Result<AiSuggestionResult, ClientError>;
}
