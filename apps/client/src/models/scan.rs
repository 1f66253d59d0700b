use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{null_as_default, null_as_empty};

/// Authoritative output of one scan, as produced by `POST /api/scan` or
/// `GET /api/scan/{id}`. Keyword order is the server's and is never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub total_score: i32,
    pub keyword_score: i32,
    pub section_score: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub section_checks: BTreeMap<String, bool>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub matched_keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub missing_keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub suggestions: Vec<String>,
}
