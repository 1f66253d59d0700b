use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-held summary of a past scan, as listed by `GET /api/scans`.
/// The client only lists these and dereferences them by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    #[serde(default)]
    pub resume_filename: Option<String>,
    pub total_score: i32,
    pub keyword_score: i32,
    pub section_score: i32,
    pub created_at: DateTime<Utc>,
}
