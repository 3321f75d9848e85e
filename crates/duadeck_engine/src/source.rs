use duadeck_core::RawTable;

use crate::Credential;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// No HTTP response at all: DNS, connect, TLS, timeout, dropped body.
    #[error("network error: {0}")]
    Network(String),
    #[error("authorization failed")]
    Unauthorized,
    #[error("access denied")]
    AccessDenied,
    #[error("spreadsheet not found")]
    NotFound,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("response too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },
    #[error("unexpected response: {0}")]
    Malformed(String),
}

impl SourceError {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => SourceError::Unauthorized,
            403 => SourceError::AccessDenied,
            404 => SourceError::NotFound,
            other => SourceError::HttpStatus(other),
        }
    }
}

/// Yields the raw table of a spreadsheet.
#[async_trait::async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_table(
        &self,
        document_id: &str,
        credential: &Credential,
    ) -> Result<RawTable, SourceError>;
}
