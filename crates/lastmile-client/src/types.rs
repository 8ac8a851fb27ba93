//! Configuration and the few typed payloads the client reads or builds.
//!
//! Everything else the API returns is passed through as loose JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Loosely-typed JSON object as returned by the API.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Run data for one cell group, as produced by the run data endpoint.
pub type RunData = JsonObject;

/// Default REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://lastmileai.dev/api";

/// Owner filter used by `get_models` when none is given.
pub const DEFAULT_OWNER_TYPE: &str = "user";

/// Default object-storage upload endpoint.
pub const DEFAULT_STORAGE_URL: &str = "https://s3.amazonaws.com/files.uploads.lastmileai.com/";

/// Client configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base REST endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key used for bearer authentication.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Object-storage endpoint for direct uploads.
    #[serde(default = "default_storage_url")]
    pub storage_url: String,

    /// Request timeout in seconds. `None` leaves requests unbounded.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_storage_url() -> String {
    DEFAULT_STORAGE_URL.to_string()
}

/// Parse a timeout in whole seconds. Anything else leaves requests unbounded.
fn parse_timeout(raw: &str) -> Option<u64> {
    match raw.trim().parse() {
        Ok(secs) => Some(secs),
        Err(_) => {
            warn!(value = %raw, "ignoring invalid LASTMILEAI_TIMEOUT; requests have no timeout");
            None
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            storage_url: default_storage_url(),
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("storage_url", &self.storage_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `LASTMILEAI_API_KEY` | API key |
    /// | `LASTMILEAI_ENDPOINT` | REST endpoint |
    /// | `LASTMILEAI_STORAGE_URL` | Object-storage upload endpoint |
    /// | `LASTMILEAI_TIMEOUT` | Request timeout in seconds |
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("LASTMILEAI_ENDPOINT").unwrap_or_else(|_| default_endpoint()),
            api_key: std::env::var(crate::auth::API_KEY_ENV)
                .ok()
                .filter(|k| !k.is_empty()),
            storage_url: std::env::var("LASTMILEAI_STORAGE_URL")
                .unwrap_or_else(|_| default_storage_url()),
            timeout_secs: std::env::var("LASTMILEAI_TIMEOUT")
                .ok()
                .and_then(|v| parse_timeout(&v)),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the REST endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the object-storage endpoint.
    pub fn with_storage_url(mut self, storage_url: impl Into<String>) -> Self {
        self.storage_url = storage_url.into();
        self
    }

    /// Bound every request by a timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// Signed upload policy from `GET /upload/policy`.
#[derive(Clone, Serialize, Deserialize)]
pub struct UploadPolicy {
    #[serde(rename = "userId")]
    pub user_id: String,

    #[serde(rename = "AWSAccessKeyId")]
    pub aws_access_key_id: String,

    /// Base64 policy document.
    #[serde(rename = "s3Policy")]
    pub s3_policy: String,

    #[serde(rename = "s3Signature")]
    pub s3_signature: String,
}

impl fmt::Debug for UploadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadPolicy")
            .field("user_id", &self.user_id)
            .field("aws_access_key_id", &self.aws_access_key_id)
            .finish_non_exhaustive()
    }
}

/// Metadata recorded for an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMetadata {
    /// MIME type guessed from the file extension.
    #[serde(rename = "type")]
    pub mime_type: String,

    /// Size in bytes of the local file.
    pub size: u64,
}

/// Result of a direct object-storage upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageUpload {
    /// Public URL of the object (storage URL + key).
    pub url: String,

    pub metadata: UploadMetadata,

    /// HTTP status answered by the storage service.
    #[serde(skip)]
    pub status: u16,
}

impl StorageUpload {
    /// Whether the storage service confirmed the upload with 201.
    pub fn is_confirmed(&self) -> bool {
        self.status == 201
    }
}
