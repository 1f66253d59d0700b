use std::fmt;
use std::path::Path;

use bytes::Bytes;

use crate::errors::ClientError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Opaque handle to the résumé file a user selected.
///
/// Cloning shares the underlying buffer, so input snapshots taken at submit
/// time do not copy the payload. Content is never inspected here; only
/// presence gates a submission.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    file_name: String,
    content_type: String,
    bytes: Bytes,
}

impl DocumentHandle {
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: PDF_CONTENT_TYPE.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk. The file name sent to the service is the last
    /// path component.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume.pdf".to_string());
        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Payload bytes stay out of logs.
impl fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
