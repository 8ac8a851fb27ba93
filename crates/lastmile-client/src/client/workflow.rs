//! Workbook execution: run data, single-step execute, and execution chains.
//!
//! A chain runs cell groups strictly in order. Each execute call names the
//! previous call's `outputTrialStep.id` as its parent; the first names none.
//! A failure stops the chain and leaves already-created steps on the server.

use std::collections::HashMap;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, error};

use super::helpers::{cell_group_id, output_step_id};
use super::payload::RunDataRequest;
use super::{routes, LastMileClient};
use crate::error::{ClientError, ClientResult};
use crate::types::RunData;

impl LastMileClient {
    /// Compute run data for one cell group server-side.
    ///
    /// Fails with [`ClientError::RunDataMissing`] when the answer has no
    /// `runData` object; the offending response is logged.
    pub async fn get_run_data(
        &self,
        trial_id: &str,
        cell_group_index: usize,
        actual_cell_group: &Value,
        workbook_parameters: &Value,
    ) -> ClientResult<RunData> {
        let index = cell_group_index.to_string();
        let query = [("id", trial_id), ("cellGroupIndex", index.as_str())];
        let body = RunDataRequest {
            new_cell_group: actual_cell_group,
            workbook_parameters,
        };

        let response: Value = self
            .http
            .send_json(Method::POST, routes::WORKBOOKS_RUN_DATA, &query, &body)
            .await?;

        extract_run_data(response, trial_id, cell_group_index)
    }

    /// Execute one step. `run_data` is updated in place with the trial and
    /// parent step ids before being sent.
    pub async fn execute(
        &self,
        trial_id: &str,
        previous_step_id: Option<&str>,
        run_data: &mut RunData,
    ) -> ClientResult<Value> {
        run_data.insert("trialId".into(), Value::String(trial_id.to_string()));
        run_data.insert("trialStepId".into(), Value::Null);
        run_data.insert(
            "parentTrialStepId".into(),
            previous_step_id.map_or(Value::Null, |id| Value::String(id.to_string())),
        );

        self.http
            .send_json(Method::POST, routes::WORKBOOKS_EXECUTE, &[], &*run_data)
            .await
    }

    /// Execute every cell group in order using pre-computed run data keyed by
    /// cell group id. The caller's map is not modified.
    pub async fn execute_all_without_parameters(
        &self,
        trial_id: &str,
        cell_groups: &[Value],
        run_data: &HashMap<String, RunData>,
    ) -> ClientResult<()> {
        let mut previous_step_id: Option<String> = None;

        for (index, cell_group) in cell_groups.iter().enumerate() {
            let group_id = cell_group_id(cell_group)?;
            let mut step_data = run_data
                .get(&group_id)
                .cloned()
                .ok_or_else(|| ClientError::RunDataNotFound {
                    cell_group_id: group_id.clone(),
                })?;

            let response = self
                .execute(trial_id, previous_step_id.as_deref(), &mut step_data)
                .await?;
            let step_id = output_step_id(&response)?;
            debug!(
                trial_id = %trial_id,
                cell_group = %group_id,
                index,
                step_id = %step_id,
                "cell group executed"
            );
            previous_step_id = Some(step_id);
        }

        Ok(())
    }

    /// Execute every cell group in order, computing each group's run data
    /// from `workbook_parameters` right before executing it.
    pub async fn execute_all_with_parameters(
        &self,
        trial_id: &str,
        cell_groups: &[Value],
        workbook_parameters: &Value,
    ) -> ClientResult<()> {
        let mut previous_step_id: Option<String> = None;

        for (index, cell_group) in cell_groups.iter().enumerate() {
            let mut step_data = self
                .get_run_data(trial_id, index, cell_group, workbook_parameters)
                .await?;

            let response = self
                .execute(trial_id, previous_step_id.as_deref(), &mut step_data)
                .await?;
            let step_id = output_step_id(&response)?;
            debug!(trial_id = %trial_id, index, step_id = %step_id, "cell group executed");
            previous_step_id = Some(step_id);
        }

        Ok(())
    }
}

fn extract_run_data(
    response: Value,
    trial_id: &str,
    cell_group_index: usize,
) -> ClientResult<RunData> {
    let missing = |response: &Value| {
        error!(
            trial_id = %trial_id,
            cell_group_index,
            response = %response,
            "no runData in run data response"
        );
        ClientError::RunDataMissing {
            trial_id: trial_id.to_string(),
            cell_group_index,
        }
    };

    match response {
        Value::Object(mut body) => match body.remove("runData") {
            Some(Value::Object(run_data)) => Ok(run_data),
            Some(other) => {
                body.insert("runData".into(), other);
                Err(missing(&Value::Object(body)))
            }
            None => Err(missing(&Value::Object(body))),
        },
        other => Err(missing(&other)),
    }
}
