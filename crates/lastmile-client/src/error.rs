//! Error types for the LastMile client.

/// Client errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure (DNS, TLS, connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body could not be parsed as JSON.
    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    /// The run data endpoint answered without a `runData` field.
    #[error("no runData returned for trial {trial_id} (cell group {cell_group_index})")]
    RunDataMissing {
        trial_id: String,
        cell_group_index: usize,
    },

    /// No pre-computed run data was supplied for a cell group.
    #[error("no run data supplied for cell group {cell_group_id}")]
    RunDataNotFound { cell_group_id: String },

    /// The API answered with JSON that lacks the fields an operation needs.
    /// The payload is kept as-is (typically an error body).
    #[error("unexpected {context} payload: {message}")]
    UnexpectedPayload {
        context: &'static str,
        message: String,
        payload: serde_json::Value,
    },

    /// A field needed to continue a call chain is absent.
    #[error("missing field `{field}` in {context}")]
    MissingField {
        field: &'static str,
        context: &'static str,
    },

    /// Local file could not be read.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ClientError {
    /// Whether the error came from the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    /// Server payload carried by the error, if any.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            Self::UnexpectedPayload { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
