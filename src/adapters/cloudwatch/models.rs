//! CloudWatch Logs wire models
//!
//! Request and response bodies of the JSON 1.1 protocol. Response fields the
//! service is supposed to return are still `Option`s so that a contract break
//! surfaces as a protocol error in the orchestrator instead of a decode error
//! in the adapter.

use serde::{Deserialize, Serialize};

/// `CreateExportTask` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExportTaskRequest {
    /// Log group to export
    pub log_group_name: String,

    /// Start of the range, epoch milliseconds (inclusive)
    pub from_time: i64,

    /// End of the range, epoch milliseconds (exclusive)
    pub to: i64,

    /// Destination S3 bucket
    pub destination: String,

    /// Key prefix inside the bucket
    pub destination_prefix: String,
}

/// `CreateExportTask` response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExportTaskResponse {
    #[serde(default)]
    pub task_id: Option<String>,
}

/// `DescribeExportTasks` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeExportTasksRequest {
    pub task_id: String,
}

/// `DescribeExportTasks` response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeExportTasksResponse {
    #[serde(default)]
    pub export_tasks: Option<Vec<ExportTaskDescription>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// One entry of `exportTasks`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTaskDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_group_name: Option<String>,

    #[serde(default)]
    pub status: Option<ExportTaskStatus>,
}

/// Status block of an export task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTaskStatus {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ServiceErrorBody {
    #[serde(rename = "__type", default)]
    pub error_type: Option<String>,

    // The service is inconsistent about capitalization here
    #[serde(alias = "Message", default)]
    pub message: Option<String>,
}

impl ServiceErrorBody {
    /// Short error type without the `namespace#` prefix
    pub fn short_type(&self) -> String {
        self.error_type
            .as_deref()
            .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
            .unwrap_or_else(|| "UnknownError".to_string())
    }
}
