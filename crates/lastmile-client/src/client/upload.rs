//! Uploads: signed policy, direct object-storage POST, and registration of
//! the stored object as an Upload attached to a trial step.

use std::path::Path;

use rand::Rng;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::helpers::{build_upload_key, file_base_name, guess_mime_type, UPLOAD_KEY_RANDOM_MAX};
use super::http::Auth;
use super::payload::{AttachUpload, CreateUpload};
use super::{routes, LastMileClient};
use crate::error::{ClientError, ClientResult};
use crate::types::{StorageUpload, UploadMetadata, UploadPolicy};

impl LastMileClient {
    /// Fetch a fresh signed upload policy. Use it for one upload only.
    ///
    /// An answer without the policy fields (e.g. a 401 error body) fails with
    /// [`ClientError::UnexpectedPayload`] carrying that answer unchanged.
    pub async fn get_upload_policy(&self) -> ClientResult<UploadPolicy> {
        let payload: Value = self
            .http
            .get(routes::UPLOAD_POLICY, &[], Auth::Bearer)
            .await?;

        UploadPolicy::deserialize(&payload).map_err(|e| {
            warn!(response = %payload, "upload policy response lacks policy fields");
            ClientError::UnexpectedPayload {
                context: "upload policy",
                message: e.to_string(),
                payload,
            }
        })
    }

    /// Upload a local file straight to object storage under the policy.
    ///
    /// The key is `uploads/<userId>/<UTC timestamp>/<0..=10000>/<basename>`, so
    /// two uploads of the same file name in the same second can collide.
    ///
    /// Storage success is best effort: the URL and metadata are returned
    /// whatever status storage answers, and [`StorageUpload::is_confirmed`]
    /// reports whether it was the expected 201. Transport errors still fail.
    pub async fn upload_to_s3(
        &self,
        policy: &UploadPolicy,
        image_path: impl AsRef<Path>,
    ) -> ClientResult<StorageUpload> {
        let path = image_path.as_ref();
        let file_name = file_base_name(path)?;
        let mime_type = guess_mime_type(path);

        let bytes = tokio::fs::read(path).await.map_err(|e| ClientError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let size = bytes.len() as u64;

        let random = rand::thread_rng().gen_range(0..=UPLOAD_KEY_RANDOM_MAX);
        let key = build_upload_key(&policy.user_id, chrono::Utc::now(), random, &file_name);
        debug!(key = %key, mime_type = %mime_type, size, "prepared storage upload");

        let file_part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(&mime_type)
            .map_err(|e| ClientError::Config {
                message: format!("invalid MIME type {}: {}", mime_type, e),
            })?;

        // Storage expects the file as the last field.
        let form = Form::new()
            .text("key", key.clone())
            .text("acl", "public-read")
            .text("Content-Type", mime_type.clone())
            .text("AWSAccessKeyId", policy.aws_access_key_id.clone())
            .text("success_action_status", "201")
            .text("Policy", policy.s3_policy.clone())
            .text("Signature", policy.s3_signature.clone())
            .part("file", file_part);

        let status = self.http.post_storage_form(form).await?;
        if status == StatusCode::CREATED {
            debug!(key = %key, "uploaded to object storage");
        } else {
            warn!(key = %key, status = status.as_u16(), "object storage did not confirm upload");
        }

        Ok(StorageUpload {
            url: format!("{}{}", self.http.storage_url, key),
            metadata: UploadMetadata { mime_type, size },
            status: status.as_u16(),
        })
    }

    /// Register an uploaded object as an Upload entity.
    pub async fn create_upload_in_lastmile(
        &self,
        s3_url: &str,
        metadata: &UploadMetadata,
    ) -> ClientResult<Value> {
        let body = CreateUpload {
            url: s3_url,
            metadata,
        };
        self.http
            .send_json(Method::POST, routes::UPLOAD_CREATE, &[], &body)
            .await
    }

    /// Link an Upload to a trial step.
    pub async fn attach_upload_to_trialstep(
        &self,
        upload_id: &str,
        trial_step_id: &str,
    ) -> ClientResult<Value> {
        let body = AttachUpload {
            id: upload_id,
            entity: "trialstep",
            entity_id: trial_step_id,
        };
        self.http
            .send_json(Method::PUT, routes::UPLOAD_ATTACH, &[], &body)
            .await
    }
}
