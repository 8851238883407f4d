//! CloudWatch Logs integration
//!
//! [`LogExportService`] is the port the export orchestrator talks to.
//! [`CloudWatchLogsClient`] implements it over HTTPS with SigV4 signing;
//! tests substitute scripted implementations.

pub mod client;
pub mod models;
pub mod signing;

pub use client::CloudWatchLogsClient;
pub use models::{
    CreateExportTaskRequest, CreateExportTaskResponse, DescribeExportTasksRequest,
    DescribeExportTasksResponse, ExportTaskDescription, ExportTaskStatus,
};
pub use signing::{Credentials, RequestSigner};

use crate::domain::{CloudWatchError, ExportTaskId};
use async_trait::async_trait;

/// Log service operations needed to export a log group to S3
///
/// Implementations return the service responses as received. Checking that a
/// response actually carries a task id or a status code is up to the caller.
#[async_trait]
pub trait LogExportService: Send + Sync {
    /// Start an export task
    async fn create_export_task(
        &self,
        request: &CreateExportTaskRequest,
    ) -> Result<CreateExportTaskResponse, CloudWatchError>;

    /// Describe a single export task by id
    async fn describe_export_task(
        &self,
        task_id: &ExportTaskId,
    ) -> Result<DescribeExportTasksResponse, CloudWatchError>;

    /// Endpoint the service talks to, for logging
    fn endpoint(&self) -> &str;
}
