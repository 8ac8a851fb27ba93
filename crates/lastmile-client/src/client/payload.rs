//! JSON request bodies, one per write operation.

use serde::Serialize;
use serde_json::Value;

use crate::types::{JsonObject, UploadMetadata};

#[derive(Debug, Serialize)]
pub(crate) struct CreateTrial<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum TrialStepType {
    Input,
    Output,
}

#[derive(Debug, Serialize)]
pub(crate) struct StepData<'a> {
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTrialStep<'a> {
    pub trial_id: &'a str,
    #[serde(rename = "type")]
    pub step_type: TrialStepType,
    pub data: Vec<StepData<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateWorkflow<'a> {
    pub workbook_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateWorkflowRun<'a> {
    pub workflow_id: &'a str,
    pub execution_run_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_run_batch_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workbook_parameters: Option<&'a Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunDataRequest<'a> {
    pub new_cell_group: &'a Value,
    pub workbook_parameters: &'a Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateUpload<'a> {
    pub url: &'a str,
    pub metadata: &'a UploadMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttachUpload<'a> {
    pub id: &'a str,
    pub entity: &'static str,
    pub entity_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Completion<'a> {
    pub completion_params: &'a Value,
    pub embedding_collection_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateDataset<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub dataset_type: &'static str,
    pub uploads: &'a [Value],
    pub metadata: &'a JsonObject,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateEmbeddingCollection<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<&'a str>,
    pub uploads: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateEmbeddingCollectionStatus<'a> {
    pub id: &'a str,
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateModelFork<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub embedding_collection_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}
