//! Export request and outcome types

use crate::core::window::DestinationPath;
use crate::domain::{ExportTaskId, LogGroupName, LogshipError, Result};
use serde::Serialize;
use std::time::Duration;

/// Parameters of one export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Log group to export
    pub log_group_name: String,

    /// S3 bucket receiving the export
    pub destination_bucket: String,

    /// Key prefix the dated path is appended to (may be empty)
    pub destination_prefix: String,

    /// Day offset: 0 exports the 24 hours starting now, 1 the 24 hours before that
    pub days_back: i64,
}

impl ExportRequest {
    /// Checks the request before any service call is made
    pub fn validate(&self) -> Result<()> {
        LogGroupName::new(self.log_group_name.as_str()).map_err(LogshipError::InvalidInput)?;

        if self.destination_bucket.trim().is_empty() {
            return Err(LogshipError::InvalidInput(
                "destination bucket cannot be empty".to_string(),
            ));
        }

        if self.days_back < 0 {
            return Err(LogshipError::InvalidInput(format!(
                "days_back must be >= 0, got {}",
                self.days_back
            )));
        }

        Ok(())
    }
}

/// Result of a successful export
///
/// Serializes to `{"task_id": ..., "s3_export_path": ...}`; the polling
/// diagnostics are only available programmatically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOutcome {
    /// Id of the completed export task
    pub task_id: ExportTaskId,

    /// Destination prefix the logs were written under
    pub s3_export_path: DestinationPath,

    /// Number of status queries made
    #[serde(skip)]
    pub status_checks: u32,

    /// Time spent waiting for the task to complete
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Statistics of a finished poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    pub status_checks: u32,
    pub elapsed: Duration,
}
