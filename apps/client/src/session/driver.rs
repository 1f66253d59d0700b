use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error};

use super::{Command, Session, SessionEvent};
use crate::errors::{ClientError, Operation};
use crate::models::DocumentHandle;
use crate::service::ScanService;

/// Runs a `Session` against a `ScanService`.
///
/// Every command becomes one spawned task; each task resolves to exactly one
/// `SessionEvent`. Events are applied to the session one at a time, so the
/// session has a single writer even with all four operations in flight.
pub struct SessionDriver {
    session: Session,
    service: Arc<dyn ScanService>,
    in_flight: JoinSet<SessionEvent>,
}

impl SessionDriver {
    pub fn new(session: Session, service: Arc<dyn ScanService>) -> Self {
        Self {
            session,
            service,
            in_flight: JoinSet::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    /// Number of requests issued and not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Loads history once, the way the client does when it first opens.
    pub fn start(&mut self) {
        let command = self.session.refresh_history();
        self.execute(command);
    }

    pub fn set_document(&mut self, document: Option<DocumentHandle>) {
        self.session.set_document(document);
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.session.set_job_description(text);
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn submit_scan(&mut self) {
        let command = self.session.submit_scan();
        self.execute(command);
    }

    pub fn submit_ai(&mut self) {
        let command = self.session.submit_ai();
        self.execute(command);
    }

    pub fn refresh_history(&mut self) {
        let command = self.session.refresh_history();
        self.execute(command);
    }

    pub fn open_entry(&mut self, id: &str) {
        let command = self.session.open_entry(id);
        self.execute(command);
    }

    fn execute(&mut self, command: Option<Command>) {
        let Some(command) = command else {
            return;
        };
        debug!("Issuing {command:?}");

        let service = Arc::clone(&self.service);
        match command {
            Command::SubmitScan { request, inputs } => self.spawn(
                async move { service.submit_scan(&inputs).await },
                move |outcome| SessionEvent::ScanSettled { request, outcome },
            ),
            Command::RequestAiSuggestions { request, inputs } => self.spawn(
                async move { service.request_ai_suggestions(&inputs).await },
                move |outcome| SessionEvent::AiSettled { request, outcome },
            ),
            Command::RefreshHistory { request } => self.spawn(
                async move { service.list_history().await },
                move |outcome| SessionEvent::HistoryLoaded { request, outcome },
            ),
            Command::OpenEntry { request, id } => {
                let fetch_id = id.clone();
                self.spawn(
                    async move { service.fetch_scan(&fetch_id).await },
                    move |outcome| SessionEvent::EntryOpened {
                        request,
                        id,
                        outcome,
                    },
                )
            }
        }
    }

    /// Runs `call` on its own task and settles it through `settle`. A call
    /// that panics still settles, as a `ClientError::Task` failure, so its
    /// controller never stays `Submitting`.
    fn spawn<T, F, S>(&mut self, call: F, settle: S)
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ClientError>> + Send + 'static,
        S: FnOnce(Result<T, ClientError>) -> SessionEvent + Send + 'static,
    {
        let call = tokio::spawn(call);
        self.in_flight.spawn(async move {
            let outcome = match call.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Request task ended without a response: {e}");
                    Err(ClientError::Task(e))
                }
            };
            settle(outcome)
        });
    }

    /// Waits for the next request to settle and applies it. Returns which
    /// operation settled, or `None` when nothing is in flight.
    pub async fn next_event(&mut self) -> Option<Operation> {
        loop {
            match self.in_flight.join_next().await? {
                Ok(event) => {
                    let operation = event.operation();
                    let follow_up = self.session.apply(event);
                    self.execute(follow_up);
                    return Some(operation);
                }
                Err(e) => error!("Settling task ended without an event: {e}"),
            }
        }
    }

    /// Applies events until no request is in flight, including follow-ups
    /// such as the history refresh after a successful scan.
    pub async fn run_until_idle(&mut self) {
        while self.next_event().await.is_some() {}
    }
}
