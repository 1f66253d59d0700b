use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use tokio::sync::oneshot;

use crate::errors::ClientError;
use crate::models::{AiSuggestionResult, DocumentHandle, HistoryEntry, ScanResult};
use crate::service::ScanService;
use crate::session::InputSnapshot;

pub fn pdf() -> DocumentHandle {
    DocumentHandle::from_bytes("jane-doe.pdf", b"%PDF-1.7 test".to_vec())
}

pub fn sample_scan() -> ScanResult {
    ScanResult {
        id: None,
        total_score: 72,
        keyword_score: 65,
        section_score: 80,
        section_checks: BTreeMap::from([
            ("Skills".to_string(), true),
            ("Experience".to_string(), true),
            ("Education".to_string(), false),
        ]),
        matched_keywords: vec!["python".to_string(), "aws".to_string()],
        missing_keywords: vec!["kubernetes".to_string()],
        suggestions: vec!["Add a Projects section".to_string()],
    }
}

pub fn sample_history(count: usize) -> Vec<HistoryEntry> {
    let newest = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    (0..count)
        .map(|i| HistoryEntry {
            id: format!("scan-{i}"),
            resume_filename: Some(format!("resume-{i}.pdf")),
            total_score: 70 - i as i32,
            keyword_score: 60,
            section_score: 80,
            created_at: newest - Duration::hours(i as i64),
        })
        .collect()
}

pub fn server_error(message: &str) -> ClientError {
    ClientError::Api {
        status: 500,
        message: message.to_string(),
    }
}

pub fn not_found() -> ClientError {
    ClientError::Api {
        status: 404,
        message: String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Scan { job_description: String },
    ListHistory,
    FetchScan { id: String },
    AiSuggestions { job_description: String },
}

type Outcome<T> = Result<T, ClientError>;

enum Reply<T> {
    Ready(Outcome<T>),
    Held(oneshot::Receiver<Outcome<T>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Outcome<T> {
        match self {
            Reply::Ready(outcome) => outcome,
            Reply::Held(rx) => rx
                .await
                .unwrap_or_else(|_| Err(server_error("held reply dropped"))),
        }
    }
}

/// In-memory `ScanService` with scripted replies per operation.
///
/// `hold_*` returns a sender that releases the reply, so a request can be kept
/// in flight while the test inspects the session. Unscripted calls fail.
#[derive(Default)]
pub struct ScriptedService {
    scans: Mutex<VecDeque<Reply<ScanResult>>>,
    ai: Mutex<VecDeque<Reply<AiSuggestionResult>>>,
    history: Mutex<VecDeque<Reply<Vec<HistoryEntry>>>>,
    entries: Mutex<VecDeque<Reply<ScanResult>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedService {
    pub fn push_scan(&self, outcome: Outcome<ScanResult>) {
        self.scans.lock().unwrap().push_back(Reply::Ready(outcome));
    }

    pub fn hold_scan(&self) -> oneshot::Sender<Outcome<ScanResult>> {
        let (tx, rx) = oneshot::channel();
        self.scans.lock().unwrap().push_back(Reply::Held(rx));
        tx
    }

    pub fn push_ai(&self, outcome: Outcome<AiSuggestionResult>) {
        self.ai.lock().unwrap().push_back(Reply::Ready(outcome));
    }

    pub fn hold_ai(&self) -> oneshot::Sender<Outcome<AiSuggestionResult>> {
        let (tx, rx) = oneshot::channel();
        self.ai.lock().unwrap().push_back(Reply::Held(rx));
        tx
    }

    pub fn push_history(&self, outcome: Outcome<Vec<HistoryEntry>>) {
        self.history.lock().unwrap().push_back(Reply::Ready(outcome));
    }

    pub fn push_entry(&self, outcome: Outcome<ScanResult>) {
        self.entries.lock().unwrap().push_back(Reply::Ready(outcome));
    }

    pub fn hold_entry(&self) -> oneshot::Sender<Outcome<ScanResult>> {
        let (tx, rx) = oneshot::channel();
        self.entries.lock().unwrap().push_back(Reply::Held(rx));
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    fn next<T>(&self, queue: &Mutex<VecDeque<Reply<T>>>, call: Call) -> Reply<T> {
        self.calls.lock().unwrap().push(call);
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::Ready(Err(server_error("unscripted call"))))
    }
}

#[async_trait]
impl ScanService for ScriptedService {
    async fn submit_scan(&self, inputs: &InputSnapshot) -> Result<ScanResult, ClientError> {
        let call = Call::Scan {
            job_description: inputs.job_description.clone(),
        };
        self.next(&self.scans, call).resolve().await
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>, ClientError> {
        self.next(&self.history, Call::ListHistory).resolve().await
    }

    async fn fetch_scan(&self, id: &str) -> Result<ScanResult, ClientError> {
        let call = Call::FetchScan { id: id.to_string() };
        self.next(&self.entries, call).resolve().await
    }

    async fn request_ai_suggestions(
        &self,
        inputs: &InputSnapshot,
    ) -> Result<AiSuggestionResult, ClientError> {
        let call = Call::AiSuggestions {
            job_description: inputs.job_description.clone(),
        };
        self.next(&self.ai, call).resolve().await
    }
}
