//! Four-state lifecycle shared by the scan and AI-suggestion controllers.
//!
//! Each controller owns one `Lifecycle` value. Transitions happen only through
//! `Lifecycle::dispatch`, which never looks at any other controller.

use std::fmt;

/// Identifies one issued request. Responses carrying an id that is not the
/// one currently in flight are stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl RequestId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
    #[default]
    Idle,
    Submitting(RequestId),
    Succeeded,
    Failed,
}

impl LifecyclePhase {
    pub fn is_submitting(self) -> bool {
        matches!(self, Self::Submitting(_))
    }

    pub fn is_settled(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// `gate` is the outcome of the readiness check, with the controller's
    /// own validation message on failure.
    SubmitRequested {
        request: RequestId,
        gate: Result<(), String>,
    },
    ResponseReceived {
        request: RequestId,
    },
    ResponseFailed {
        request: RequestId,
        message: String,
    },
    /// The displayed outcome was thrown away (document replaced).
    Discarded,
    Reset,
}

/// What a dispatch did, so the caller knows which slots to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Now `Submitting`; the caller must issue the request.
    Started(RequestId),
    /// Readiness gate failed; now `Failed` with the validation message.
    Rejected,
    /// Already `Submitting`; nothing changed.
    Suppressed,
    Succeeded,
    Failed,
    /// Response for a request that is no longer in flight; nothing changed.
    Stale,
    Idle,
}

#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    phase: LifecyclePhase,
    error: Option<String>,
}

impl Lifecycle {
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Clears the error slot without changing phase. Used when another writer
    /// (opening a history entry) replaces what is on display.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn dispatch(&mut self, event: LifecycleEvent) -> Transition {
        match event {
            LifecycleEvent::SubmitRequested { request, gate } => {
                if self.phase.is_submitting() {
                    return Transition::Suppressed;
                }
                match gate {
                    Ok(()) => {
                        self.error = None;
                        self.phase = LifecyclePhase::Submitting(request);
                        Transition::Started(request)
                    }
                    Err(message) => {
                        self.error = Some(message);
                        self.phase = LifecyclePhase::Failed;
                        Transition::Rejected
                    }
                }
            }
            LifecycleEvent::ResponseReceived { request } => {
                if self.phase != LifecyclePhase::Submitting(request) {
                    return Transition::Stale;
                }
                self.error = None;
                self.phase = LifecyclePhase::Succeeded;
                Transition::Succeeded
            }
            LifecycleEvent::ResponseFailed { request, message } => {
                if self.phase != LifecyclePhase::Submitting(request) {
                    return Transition::Stale;
                }
                self.error = Some(message);
                self.phase = LifecyclePhase::Failed;
                Transition::Failed
            }
            LifecycleEvent::Discarded => {
                self.error = None;
                if self.phase.is_settled() {
                    self.phase = LifecyclePhase::Idle;
                    Transition::Idle
                } else {
                    Transition::Suppressed
                }
            }
            LifecycleEvent::Reset => {
                self.error = None;
                self.phase = LifecyclePhase::Idle;
                Transition::Idle
            }
        }
    }
}
