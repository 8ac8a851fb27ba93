//! Client library for the LastMile AI REST API.
//!
//! Covers trials and trial steps, workbook/workflow execution, OpenAI
//! inference proxying, direct uploads to object storage, and dataset,
//! embedding collection and model management. Every operation is a single
//! request whose JSON answer is returned as-is, except the workflow chains
//! which thread each step's output id into the next call.
//!
//! # Quick Start
//!
//! ```no_run
//! use lastmile_client::LastMileClient;
//!
//! # async fn example() -> Result<(), lastmile_client::ClientError> {
//! let client = LastMileClient::new("my-api-key", None)?;
//!
//! let trial = client.create_trial("Stable Diffusion Trial").await?;
//! let trial_id = trial["id"].as_str().unwrap_or_default();
//!
//! client
//!     .add_input_step(trial_id, "a photo of Pikachu fine dining")
//!     .await?;
//! let output_step = client.add_output_step(trial_id).await?;
//!
//! let policy = client.get_upload_policy().await?;
//! let stored = client.upload_to_s3(&policy, "output.jpg").await?;
//! let upload = client
//!     .create_upload_in_lastmile(&stored.url, &stored.metadata)
//!     .await?;
//! client
//!     .attach_upload_to_trialstep(
//!         upload["id"].as_str().unwrap_or_default(),
//!         output_step["id"].as_str().unwrap_or_default(),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `LASTMILEAI_API_KEY` | API key (bearer token) |
//! | `LASTMILEAI_ENDPOINT` | REST endpoint (default: `https://lastmileai.dev/api`) |
//! | `LASTMILEAI_STORAGE_URL` | Object-storage upload endpoint |
//! | `LASTMILEAI_TIMEOUT` | Request timeout in seconds (default: none) |
//!
//! # Logging
//!
//! Requests, responses and chain steps are reported through `tracing`.
//! Install a subscriber in the application to see them.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

// Re-export main types
pub use auth::ApiKey;
pub use client::{LastMileClient, CLIENT_USER_AGENT};
pub use error::{ClientError, ClientResult};
pub use types::{
    ClientConfig, JsonObject, RunData, StorageUpload, UploadMetadata, UploadPolicy,
    DEFAULT_ENDPOINT, DEFAULT_OWNER_TYPE, DEFAULT_STORAGE_URL,
};
