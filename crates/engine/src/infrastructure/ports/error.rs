//! Error types for port operations.

/// Progress service call failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressServiceError {
    /// Transport-level failure (connection refused, timeout, ...).
    #[error("Progress service request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("Progress service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Invalid progress service response: {0}")]
    InvalidResponse(String),
}

impl ProgressServiceError {
    pub fn request(message: impl ToString) -> Self {
        Self::Request(message.to_string())
    }

    pub fn status(status: u16, message: impl ToString) -> Self {
        Self::Status {
            status,
            message: message.to_string(),
        }
    }

    pub fn invalid_response(message: impl ToString) -> Self {
        Self::InvalidResponse(message.to_string())
    }

    /// Client errors (4xx other than 408/429) will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(_) | Self::InvalidResponse(_) => true,
            Self::Status { status, .. } => {
                !(400..500).contains(status) || *status == 408 || *status == 429
            }
        }
    }
}

/// Local snapshot persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O error in {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

impl SnapshotError {
    pub fn io(operation: &'static str, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}
