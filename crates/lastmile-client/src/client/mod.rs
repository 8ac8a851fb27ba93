//! LastMile API client.
//!
//! Public API: no status code knowledge. Request plumbing lives in http.rs,
//! workflow chaining in workflow.rs, uploads in upload.rs.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::auth::ApiKey;
use crate::error::{ClientError, ClientResult};
use crate::types::{
    ClientConfig, JsonObject, DEFAULT_ENDPOINT, DEFAULT_OWNER_TYPE, DEFAULT_STORAGE_URL,
};

mod helpers;
mod http;
mod payload;
mod upload;
mod workflow;

use helpers::non_empty;
use http::{Auth, HttpBackend};
use payload::{
    Completion, CreateDataset, CreateEmbeddingCollection, CreateModelFork, CreateTrial,
    CreateTrialStep, CreateWorkflow, CreateWorkflowRun, StepData, TrialStepType,
    UpdateEmbeddingCollectionStatus,
};

/// User-Agent sent with every request.
pub const CLIENT_USER_AGENT: &str = concat!("lastmile-client/", env!("CARGO_PKG_VERSION"));

pub(crate) mod routes {
    pub const HEALTH: &str = "/health";
    pub const TRIALS_CREATE: &str = "/trials/create";
    pub const TRIAL_STEPS_CREATE: &str = "/trialsteps/create";
    pub const WORKFLOWS_CREATE: &str = "/workflows/create";
    pub const WORKFLOW_RUNS_CREATE: &str = "/workflowruns/create";
    pub const WORKBOOKS_READ: &str = "/workbooks/read";
    pub const WORKBOOKS_DEPENDENCY_GRAPH: &str = "/workbooks/dependencygraph";
    pub const WORKBOOKS_RUN_DATA: &str = "/workbooks/rundata";
    pub const WORKBOOKS_EXECUTE: &str = "/workbooks/execute";
    pub const UPLOAD_POLICY: &str = "/upload/policy";
    pub const UPLOAD_CREATE: &str = "/upload/create";
    pub const UPLOAD_ATTACH: &str = "/upload/attach";
    pub const OPENAI_COMPLETION: &str = "/inference/openai/completion";
    pub const OPENAI_CHAT_COMPLETION: &str = "/inference/openai/chatgpt/completion";
    pub const DATASETS_CREATE: &str = "/datasets/create";
    pub const EMBEDDING_COLLECTIONS_CREATE: &str = "/embeddings/collections/create";
    pub const EMBEDDING_COLLECTIONS_UPDATE: &str = "/embeddings/collections/update";
    pub const MODELS_FORK: &str = "/models/fork";
    pub const MODELS_LIST: &str = "/models/list";
}

/// Client for the LastMile REST API.
///
/// Holds only immutable configuration and a connection pool, so it is cheap
/// to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct LastMileClient {
    http: HttpBackend,
}

impl LastMileClient {
    /// Create a client for `endpoint` (defaults to the production API).
    pub fn new(api_key: impl Into<String>, endpoint: Option<&str>) -> ClientResult<Self> {
        let config = ClientConfig::default()
            .with_api_key(api_key)
            .with_endpoint(endpoint.unwrap_or(DEFAULT_ENDPOINT));
        Self::from_config(config)
    }

    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let api_key = match config.api_key.as_deref() {
            Some(key) => ApiKey::new(key)?,
            None => {
                return Err(ClientError::Config {
                    message: "no API key configured".into(),
                })
            }
        };

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| ClientError::Config {
            message: format!("failed to create HTTP client: {}", e),
        })?;

        let storage_url = if config.storage_url.is_empty() {
            DEFAULT_STORAGE_URL.to_string()
        } else {
            config.storage_url
        };

        Ok(Self {
            http: HttpBackend {
                client,
                endpoint: config.endpoint.trim_end_matches('/').to_string(),
                storage_url,
                auth_header: api_key.bearer_header()?,
            },
        })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::from_config(ClientConfig::from_env())
    }

    pub fn endpoint(&self) -> &str {
        &self.http.endpoint
    }

    pub fn storage_url(&self) -> &str {
        &self.http.storage_url
    }

    /// Service health. The only unauthenticated call.
    pub async fn api_health(&self) -> ClientResult<Value> {
        self.http.get(routes::HEALTH, &[], Auth::Anonymous).await
    }

    pub async fn create_trial(&self, name: &str) -> ClientResult<Value> {
        debug!(name = %name, "creating trial");
        self.post(routes::TRIALS_CREATE, &CreateTrial { name }).await
    }

    /// Add an INPUT step carrying `prompt` to a trial.
    pub async fn add_input_step(&self, trial_id: &str, prompt: &str) -> ClientResult<Value> {
        let body = CreateTrialStep {
            trial_id,
            step_type: TrialStepType::Input,
            data: vec![StepData { code: prompt }],
        };
        self.post(routes::TRIAL_STEPS_CREATE, &body).await
    }

    /// Add an empty OUTPUT step to a trial, typically to attach an upload to.
    pub async fn add_output_step(&self, trial_id: &str) -> ClientResult<Value> {
        let body = CreateTrialStep {
            trial_id,
            step_type: TrialStepType::Output,
            data: Vec::new(),
        };
        self.post(routes::TRIAL_STEPS_CREATE, &body).await
    }

    pub async fn create_workflow(&self, workbook_id: &str) -> ClientResult<Value> {
        self.post(routes::WORKFLOWS_CREATE, &CreateWorkflow { workbook_id }).await
    }

    /// Create a run of a workflow. An empty batch id is sent as absent.
    pub async fn create_workflow_run(
        &self,
        workflow_id: &str,
        execution_run_id: &str,
        workflow_run_batch_id: Option<&str>,
        workbook_parameters: Option<&Value>,
    ) -> ClientResult<Value> {
        let body = CreateWorkflowRun {
            workflow_id,
            execution_run_id,
            workflow_run_batch_id: non_empty(workflow_run_batch_id),
            workbook_parameters,
        };
        self.post(routes::WORKFLOW_RUNS_CREATE, &body).await
    }

    pub async fn get_workbook(&self, id: &str) -> ClientResult<Value> {
        self.http
            .get(routes::WORKBOOKS_READ, &[("id", id)], Auth::Bearer)
            .await
    }

    pub async fn get_dependency_graph(&self, id: &str) -> ClientResult<Value> {
        self.http
            .get(routes::WORKBOOKS_DEPENDENCY_GRAPH, &[("id", id)], Auth::Bearer)
            .await
    }

    pub async fn create_openai_completion(
        &self,
        completion_params: &Value,
        embedding_collection_id: Option<&str>,
    ) -> ClientResult<Value> {
        let body = Completion {
            completion_params,
            embedding_collection_id,
        };
        self.post(routes::OPENAI_COMPLETION, &body).await
    }

    pub async fn create_openai_chat_completion(
        &self,
        completion_params: &Value,
        embedding_collection_id: Option<&str>,
    ) -> ClientResult<Value> {
        let body = Completion {
            completion_params,
            embedding_collection_id,
        };
        self.post(routes::OPENAI_CHAT_COMPLETION, &body).await
    }

    /// Create a FILES dataset from upload references.
    ///
    /// `None` means no uploads / no metadata; fresh empty containers are sent.
    pub async fn create_dataset(
        &self,
        name: &str,
        uploads: Option<&[Value]>,
        metadata: Option<&JsonObject>,
    ) -> ClientResult<Value> {
        let empty_metadata = JsonObject::new();
        let body = CreateDataset {
            name,
            dataset_type: "FILES",
            uploads: uploads.unwrap_or_default(),
            metadata: metadata.unwrap_or(&empty_metadata),
        };
        self.post(routes::DATASETS_CREATE, &body).await
    }

    pub async fn create_embedding_collection(
        &self,
        name: &str,
        dataset_id: Option<&str>,
        uploads: Option<&[Value]>,
        description: Option<&str>,
    ) -> ClientResult<Value> {
        let body = CreateEmbeddingCollection {
            name,
            dataset_id,
            uploads: uploads.unwrap_or_default(),
            description,
        };
        self.post(routes::EMBEDDING_COLLECTIONS_CREATE, &body).await
    }

    pub async fn update_embedding_collection_status(
        &self,
        id: &str,
        ready: bool,
        error: Option<&str>,
    ) -> ClientResult<Value> {
        let body = UpdateEmbeddingCollectionStatus { id, ready, error };
        self.http
            .send_json(Method::PUT, routes::EMBEDDING_COLLECTIONS_UPDATE, &[], &body)
            .await
    }

    pub async fn create_model_fork(
        &self,
        id: &str,
        name: &str,
        embedding_collection_id: &str,
        description: Option<&str>,
    ) -> ClientResult<Value> {
        let body = CreateModelFork {
            id,
            name,
            embedding_collection_id,
            description,
        };
        self.post(routes::MODELS_FORK, &body).await
    }

    /// List models. `owner_type` defaults to `"user"`.
    pub async fn get_models(&self, owner_type: Option<&str>) -> ClientResult<Value> {
        let owner_type = owner_type.unwrap_or(DEFAULT_OWNER_TYPE);
        self.http
            .get(routes::MODELS_LIST, &[("ownerType", owner_type)], Auth::Bearer)
            .await
    }

    async fn post<B>(&self, path: &str, body: &B) -> ClientResult<Value>
    where
        B: serde::Serialize + ?Sized,
    {
        self.http.send_json(Method::POST, path, &[], body).await
    }
}
