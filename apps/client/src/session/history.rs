use tracing::{debug, warn};

use super::lifecycle::RequestId;
use crate::models::HistoryEntry;

pub const DEFAULT_DISPLAY_LIMIT: usize = 15;

pub const OPEN_FAILED_MESSAGE: &str = "Failed to open scan.";

/// Client-side copy of the server's scan history.
///
/// Never owns a `ScanResult`: opening an entry fetches a fresh one by id and
/// the session puts it in the current-result slot.
#[derive(Debug, Clone, Default)]
pub struct HistoryCache {
    entries: Vec<HistoryEntry>,
    latest_applied: Option<RequestId>,
    last_refresh_error: Option<String>,
    open_error: Option<String>,
}

impl HistoryCache {
    /// Entries in server order (newest first).
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The first `limit` entries, for display.
    pub fn recent(&self, limit: usize) -> &[HistoryEntry] {
        &self.entries[..self.entries.len().min(limit)]
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostic only; a failed refresh never surfaces in a lifecycle slot.
    pub fn last_refresh_error(&self) -> Option<&str> {
        self.last_refresh_error.as_deref()
    }

    /// Display error from the most recent failed `open_entry`.
    pub fn open_error(&self) -> Option<&str> {
        self.open_error.as_deref()
    }

    /// Applies a settled refresh. Returns false if a newer refresh has
    /// already been applied.
    pub(crate) fn apply_refresh(
        &mut self,
        request: RequestId,
        outcome: Result<Vec<HistoryEntry>, String>,
    ) -> bool {
        if self.latest_applied.is_some_and(|latest| latest > request) {
            debug!("Dropping history refresh {request}: a newer refresh was already applied");
            return false;
        }
        self.latest_applied = Some(request);

        match outcome {
            Ok(entries) => {
                debug!("History refresh {request} loaded {} entries", entries.len());
                self.entries = entries;
                self.last_refresh_error = None;
            }
            Err(message) => {
                warn!("History refresh {request} failed: {message}");
                self.last_refresh_error = Some(message);
            }
        }
        true
    }

    pub(crate) fn record_open_success(&mut self) {
        self.open_error = None;
    }

    pub(crate) fn record_open_failure(&mut self) {
        self.open_error = Some(OPEN_FAILED_MESSAGE.to_string());
    }

    /// Drops the open error without touching the cached entries.
    pub(crate) fn clear_open_error(&mut self) {
        self.open_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(id: &str, score: i32) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            resume_filename: Some(format!("{id}.pdf")),
            total_score: score,
            keyword_score: score,
            section_score: score,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_refresh_replaces_wholesale_in_server_order() {
        let mut cache = HistoryCache::default();
        cache.apply_refresh(RequestId::new(1), Ok(vec![entry("a", 10)]));
        cache.apply_refresh(
            RequestId::new(2),
            Ok(vec![entry("c", 30), entry("b", 20)]),
        );

        let ids: Vec<&str> = cache.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn test_failed_refresh_keeps_entries_and_records_error() {
        let mut cache = HistoryCache::default();
        cache.apply_refresh(RequestId::new(1), Ok(vec![entry("a", 10)]));
        cache.apply_refresh(RequestId::new(2), Err("Failed to load history".to_string()));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.last_refresh_error(), Some("Failed to load history"));

        cache.apply_refresh(RequestId::new(3), Ok(vec![]));
        assert!(cache.is_empty());
        assert_eq!(cache.last_refresh_error(), None);
    }

    #[test]
    fn test_older_refresh_does_not_overwrite_newer() {
        let mut cache = HistoryCache::default();
        assert!(cache.apply_refresh(RequestId::new(5), Ok(vec![entry("new", 50)])));
        assert!(!cache.apply_refresh(RequestId::new(4), Ok(vec![entry("old", 40)])));
        assert_eq!(cache.entries()[0].id, "new");
    }

    #[test]
    fn test_recent_truncates_for_display() {
        let mut cache = HistoryCache::default();
        let entries: Vec<_> = (0..20).map(|i| entry(&format!("scan-{i}"), i)).collect();
        cache.apply_refresh(RequestId::new(1), Ok(entries));

        let recent = cache.recent(DEFAULT_DISPLAY_LIMIT);
        assert_eq!(recent.len(), 15);
        assert_eq!(recent[0].id, "scan-0");
        assert_eq!(cache.recent(100).len(), 20);
    }

    #[test]
    fn test_open_error_slot() {
        let mut cache = HistoryCache::default();
        cache.record_open_failure();
        assert_eq!(cache.open_error(), Some("Failed to open scan."));
        cache.record_open_success();
        assert_eq!(cache.open_error(), None);
    }

    #[test]
    fn test_clear_open_error_keeps_entries() {
        let mut cache = HistoryCache::default();
        cache.apply_refresh(RequestId::new(1), Ok(vec![entry("a", 10)]));
        cache.record_open_failure();

        cache.clear_open_error();

        assert_eq!(cache.open_error(), None);
        assert_eq!(cache.len(), 1);
    }
}
