//! Pure helpers: upload keys, MIME guessing, chained-field extraction (no HTTP).

use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Upper bound (inclusive) of the random path segment in upload keys.
pub(crate) const UPLOAD_KEY_RANDOM_MAX: u32 = 10_000;

const UPLOAD_KEY_TIME_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// Build the object key for a direct upload.
///
/// Format: `uploads/{user_id}/{YYYY_MM_DD_HH_MM_SS}/{random}/{file_name}`
pub(crate) fn build_upload_key(
    user_id: &str,
    at: DateTime<Utc>,
    random: u32,
    file_name: &str,
) -> String {
    format!(
        "uploads/{}/{}/{}/{}",
        user_id,
        at.format(UPLOAD_KEY_TIME_FORMAT),
        random,
        file_name
    )
}

/// Final path component as UTF-8.
pub(crate) fn file_base_name(path: &Path) -> ClientResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .ok_or_else(|| ClientError::Io {
            path: path.display().to_string(),
            message: "path has no file name".to_string(),
        })
}

/// MIME type from the file extension, `application/octet-stream` if unknown.
pub(crate) fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Treat an empty string as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `outputTrialStep.id` from an execute response.
pub(crate) fn output_step_id(response: &Value) -> ClientResult<String> {
    response
        .pointer("/outputTrialStep/id")
        .and_then(id_to_string)
        .ok_or(ClientError::MissingField {
            field: "outputTrialStep.id",
            context: "execute response",
        })
}

/// `id` of a cell group definition.
pub(crate) fn cell_group_id(cell_group: &Value) -> ClientResult<String> {
    cell_group
        .get("id")
        .and_then(id_to_string)
        .ok_or(ClientError::MissingField {
            field: "id",
            context: "cell group",
        })
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
