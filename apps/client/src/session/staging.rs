use crate::models::DocumentHandle;

/// Which required input is missing. The document is checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    Document,
    JobDescription,
}

/// Read-only copy of the inputs taken when a submission starts.
/// Edits made after `submit()` only affect the next submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSnapshot {
    pub document: DocumentHandle,
    /// Already trimmed and non-blank.
    pub job_description: String,
}

/// Holds the two inputs both lifecycles read from.
#[derive(Debug, Clone, Default)]
pub struct InputStaging {
    document: Option<DocumentHandle>,
    job_description: String,
}

impl InputStaging {
    pub fn set_document(&mut self, document: Option<DocumentHandle>) {
        self.document = document;
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    pub fn document(&self) -> Option<&DocumentHandle> {
        self.document.as_ref()
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn clear(&mut self) {
        self.document = None;
        self.job_description.clear();
    }

    /// Snapshot of the current inputs, or the first one that is missing.
    pub fn snapshot(&self) -> Result<InputSnapshot, MissingInput> {
        let document = self.document.clone().ok_or(MissingInput::Document)?;
        let job_description = self.job_description.trim();
        if job_description.is_empty() {
            return Err(MissingInput::JobDescription);
        }
        Ok(InputSnapshot {
            document,
            job_description: job_description.to_string(),
        })
    }

    pub fn is_scan_ready(&self) -> bool {
        self.snapshot().is_ok()
    }

    /// Same conditions as the scan gate today; kept separate so the two
    /// operations can diverge.
    pub fn is_ai_ready(&self) -> bool {
        self.snapshot().is_ok()
    }
}
