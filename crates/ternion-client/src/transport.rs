//! Transport trait — the boundary to the remote execution service

use ternion_core::{AppTask, ProtocolHeader};

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport error types. None of these escape the client: each becomes a
/// Failed task result carrying the error text.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("http status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("timed out after {0}ms")]
    Timeout(u64),

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Decoded reply from the remote service.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportResponse {
    pub body: serde_json::Value,
    /// Protocol header returned by the service, if any.
    pub header: Option<ProtocolHeader>,
}

impl TransportResponse {
    pub fn new(body: serde_json::Value) -> Self {
        Self { body, header: None }
    }

    pub fn with_header(mut self, header: ProtocolHeader) -> Self {
        self.header = Some(header);
        self
    }
}

/// Transport trait
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one task together with the caller's protocol header.
    async fn send(&self, task: &AppTask, header: &ProtocolHeader) -> TransportResult<TransportResponse>;

    /// Reachability check.
    async fn ping(&self) -> TransportResult<()>;
}
