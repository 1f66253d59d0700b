//! Session orchestration core.
//!
//! `Session` is synchronous and does no I/O. User intents (`submit_scan`,
//! `submit_ai`, `refresh_history`, `open_entry`) return a `Command` when a
//! request must go out; settled requests come back as `SessionEvent`s through
//! `Session::apply`. `SessionDriver` runs the commands on tokio and feeds the
//! events back one at a time.
//!
//! The current `ScanResult` slot has two writers, scan success and
//! history-open success. Whichever settles last wins.

pub mod driver;
pub mod history;
pub mod lifecycle;
pub mod staging;

#[cfg(test)]
pub(crate) mod test_support;

use tracing::{info, warn};

use crate::errors::{ClientError, Operation};
use crate::models::{AiSuggestionResult, DocumentHandle, HistoryEntry, ScanResult};

pub use driver::SessionDriver;
pub use history::HistoryCache;
pub use lifecycle::{Lifecycle, LifecycleEvent, LifecyclePhase, RequestId, Transition};
pub use staging::{InputSnapshot, InputStaging, MissingInput};

pub const AI_DISABLED_MESSAGE: &str = "AI suggestions are disabled.";

/// Optional parts of the session. Both are on in the full client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionFeatures {
    pub ai_suggestions: bool,
    pub history: bool,
}

impl Default for SessionFeatures {
    fn default() -> Self {
        Self {
            ai_suggestions: true,
            history: true,
        }
    }
}

/// A request the session wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SubmitScan {
        request: RequestId,
        inputs: InputSnapshot,
    },
    RequestAiSuggestions {
        request: RequestId,
        inputs: InputSnapshot,
    },
    RefreshHistory {
        request: RequestId,
    },
    OpenEntry {
        request: RequestId,
        id: String,
    },
}

/// The settled outcome of a `Command`.
#[derive(Debug)]
pub enum SessionEvent {
    ScanSettled {
        request: RequestId,
        outcome: Result<ScanResult, ClientError>,
    },
    AiSettled {
        request: RequestId,
        outcome: Result<AiSuggestionResult, ClientError>,
    },
    HistoryLoaded {
        request: RequestId,
        outcome: Result<Vec<HistoryEntry>, ClientError>,
    },
    EntryOpened {
        request: RequestId,
        id: String,
        outcome: Result<ScanResult, ClientError>,
    },
}

impl SessionEvent {
    pub fn operation(&self) -> Operation {
        match self {
            SessionEvent::ScanSettled { .. } => Operation::Scan,
            SessionEvent::AiSettled { .. } => Operation::AiSuggestions,
            SessionEvent::HistoryLoaded { .. } => Operation::ListHistory,
            SessionEvent::EntryOpened { .. } => Operation::FetchScan,
        }
    }
}

fn scan_gate_message(missing: MissingInput) -> String {
    match missing {
        MissingInput::Document => "Please upload a PDF resume.",
        MissingInput::JobDescription => "Please paste a job description.",
    }
    .to_string()
}

fn ai_gate_message(missing: MissingInput) -> String {
    match missing {
        MissingInput::Document => "Upload a PDF first to generate AI suggestions.",
        MissingInput::JobDescription => "Paste a job description first.",
    }
    .to_string()
}

#[derive(Debug, Default)]
pub struct Session {
    features: SessionFeatures,
    inputs: InputStaging,
    scan: Lifecycle,
    ai: Lifecycle,
    history: HistoryCache,
    current_scan: Option<ScanResult>,
    current_ai: Option<AiSuggestionResult>,
    next_request: u64,
    /// History opens issued before the last reset are ignored when they land.
    reset_floor: RequestId,
}

impl Session {
    pub fn new(features: SessionFeatures) -> Self {
        Self {
            features,
            ..Default::default()
        }
    }

    fn next_request_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId::new(self.next_request)
    }

    // ── Input staging ───────────────────────────────────────────────────────

    /// Replaces the document. Whatever was on display came from the previous
    /// document, so both results and every error slot are discarded.
    pub fn set_document(&mut self, document: Option<DocumentHandle>) {
        self.inputs.set_document(document);
        self.current_scan = None;
        self.current_ai = None;
        self.history.clear_open_error();
        self.scan.dispatch(LifecycleEvent::Discarded);
        self.ai.dispatch(LifecycleEvent::Discarded);
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.inputs.set_job_description(text);
    }

    pub fn is_scan_ready(&self) -> bool {
        self.inputs.is_scan_ready()
    }

    pub fn is_ai_ready(&self) -> bool {
        self.features.ai_suggestions && self.inputs.is_ai_ready()
    }

    /// Clears inputs, both results and every error slot; both controllers go
    /// back to `Idle`. Responses still in flight are dropped when they land.
    /// The history list itself is server state and survives.
    pub fn reset(&mut self) {
        info!("Resetting session");
        self.inputs.clear();
        self.current_scan = None;
        self.current_ai = None;
        self.history.clear_open_error();
        self.scan.dispatch(LifecycleEvent::Reset);
        self.ai.dispatch(LifecycleEvent::Reset);
        self.reset_floor = RequestId::new(self.next_request + 1);
    }

    // ── Intents ─────────────────────────────────────────────────────────────

    pub fn submit_scan(&mut self) -> Option<Command> {
        if self.scan.phase().is_submitting() {
            info!("Scan already in flight; ignoring submit");
            return None;
        }

        let request = self.next_request_id();
        let snapshot = self.inputs.snapshot();
        let gate = snapshot.as_ref().map(|_| ()).map_err(|m| scan_gate_message(*m));

        self.current_scan = None;
        self.history.clear_open_error();
        match self.scan.dispatch(LifecycleEvent::SubmitRequested { request, gate }) {
            Transition::Started(request) => {
                let inputs = snapshot.ok()?;
                info!("Submitting scan {request} for {}", inputs.document.file_name());
                Some(Command::SubmitScan { request, inputs })
            }
            _ => None,
        }
    }

    pub fn submit_ai(&mut self) -> Option<Command> {
        if self.ai.phase().is_submitting() {
            info!("AI suggestions already in flight; ignoring submit");
            return None;
        }

        let request = self.next_request_id();
        let snapshot = self.inputs.snapshot();
        let gate = if self.features.ai_suggestions {
            snapshot.as_ref().map(|_| ()).map_err(|m| ai_gate_message(*m))
        } else {
            Err(AI_DISABLED_MESSAGE.to_string())
        };

        self.current_ai = None;
        match self.ai.dispatch(LifecycleEvent::SubmitRequested { request, gate }) {
            Transition::Started(request) => {
                let inputs = snapshot.ok()?;
                info!(
                    "Requesting AI suggestions {request} for {}",
                    inputs.document.file_name()
                );
                Some(Command::RequestAiSuggestions { request, inputs })
            }
            _ => None,
        }
    }

    pub fn refresh_history(&mut self) -> Option<Command> {
        if !self.features.history {
            return None;
        }
        let request = self.next_request_id();
        Some(Command::RefreshHistory { request })
    }

    /// Fetches a past scan by id. Does not touch the scan controller's phase.
    pub fn open_entry(&mut self, id: &str) -> Option<Command> {
        if !self.features.history {
            warn!("History is disabled; not opening scan {id}");
            return None;
        }
        let id = id.trim();
        if id.is_empty() {
            warn!("Ignoring request to open a scan with an empty id");
            return None;
        }
        let request = self.next_request_id();
        info!("Opening scan {id} ({request})");
        Some(Command::OpenEntry {
            request,
            id: id.to_string(),
        })
    }

    // ── Settled requests ────────────────────────────────────────────────────

    /// Applies one settled request. Returns a follow-up command when the
    /// outcome triggers one (a successful scan refreshes history).
    pub fn apply(&mut self, event: SessionEvent) -> Option<Command> {
        match event {
            SessionEvent::ScanSettled { request, outcome } => self.apply_scan(request, outcome),
            SessionEvent::AiSettled { request, outcome } => {
                self.apply_ai(request, outcome);
                None
            }
            SessionEvent::HistoryLoaded { request, outcome } => {
                let outcome = outcome.map_err(|e| {
                    warn!("History refresh error: {e}");
                    e.user_message(Operation::ListHistory)
                });
                self.history.apply_refresh(request, outcome);
                None
            }
            SessionEvent::EntryOpened {
                request,
                id,
                outcome,
            } => {
                self.apply_open(request, &id, outcome);
                None
            }
        }
    }

    fn apply_scan(
        &mut self,
        request: RequestId,
        outcome: Result<ScanResult, ClientError>,
    ) -> Option<Command> {
        match outcome {
            Ok(result) => {
                match self.scan.dispatch(LifecycleEvent::ResponseReceived { request }) {
                    Transition::Succeeded => {
                        info!("Scan {request} succeeded: total score {}", result.total_score);
                        self.current_scan = Some(result);
                        self.refresh_history()
                    }
                    _ => {
                        warn!("Dropping stale scan response {request}");
                        None
                    }
                }
            }
            Err(e) => {
                let message = e.user_message(Operation::Scan);
                match self
                    .scan
                    .dispatch(LifecycleEvent::ResponseFailed { request, message })
                {
                    Transition::Failed => warn!("Scan {request} failed: {e}"),
                    _ => warn!("Dropping stale scan failure {request}: {e}"),
                }
                None
            }
        }
    }

    fn apply_ai(&mut self, request: RequestId, outcome: Result<AiSuggestionResult, ClientError>) {
        match outcome {
            Ok(report) => match self.ai.dispatch(LifecycleEvent::ResponseReceived { request }) {
                Transition::Succeeded => {
                    info!("AI suggestions {request} succeeded");
                    self.current_ai = Some(report);
                }
                _ => warn!("Dropping stale AI suggestions response {request}"),
            },
            Err(e) => {
                let message = e.user_message(Operation::AiSuggestions);
                match self
                    .ai
                    .dispatch(LifecycleEvent::ResponseFailed { request, message })
                {
                    Transition::Failed => warn!("AI suggestions {request} failed: {e}"),
                    _ => warn!("Dropping stale AI suggestions failure {request}: {e}"),
                }
            }
        }
    }

    fn apply_open(
        &mut self,
        request: RequestId,
        id: &str,
        outcome: Result<ScanResult, ClientError>,
    ) {
        if request < self.reset_floor {
            warn!("Dropping scan {id} opened before the last reset");
            return;
        }
        match outcome {
            Ok(result) => {
                info!("Opened scan {id}");
                self.current_scan = Some(result);
                self.scan.clear_error();
                self.history.record_open_success();
            }
            Err(e) => {
                warn!("Failed to open scan {id}: {e}");
                self.history.record_open_failure();
            }
        }
    }

    // ── Read side ───────────────────────────────────────────────────────────

    pub fn features(&self) -> SessionFeatures {
        self.features
    }

    pub fn inputs(&self) -> &InputStaging {
        &self.inputs
    }

    pub fn scan_phase(&self) -> LifecyclePhase {
        self.scan.phase()
    }

    pub fn scan_error(&self) -> Option<&str> {
        self.scan.error()
    }

    pub fn ai_phase(&self) -> LifecyclePhase {
        self.ai.phase()
    }

    pub fn ai_error(&self) -> Option<&str> {
        self.ai.error()
    }

    pub fn current_scan(&self) -> Option<&ScanResult> {
        self.current_scan.as_ref()
    }

    pub fn current_ai(&self) -> Option<&AiSuggestionResult> {
        self.current_ai.as_ref()
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }
}
