//! Export task status interpretation

use crate::adapters::cloudwatch::DescribeExportTasksResponse;
use crate::domain::{LogshipError, Result};
use std::fmt;

/// Status of an export task as far as the poll loop is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    /// Still copying; poll again later
    Running,
    /// All logs were written to the bucket
    Completed,
    /// Any other state, with the code the service reported
    Failed(String),
}

impl ExportStatus {
    /// Maps a service status code to a status
    ///
    /// Only `RUNNING` keeps the loop going; every code other than
    /// `COMPLETED` is treated as a terminal failure.
    pub fn from_code(code: &str) -> Self {
        match code {
            "RUNNING" => ExportStatus::Running,
            "COMPLETED" => ExportStatus::Completed,
            other => ExportStatus::Failed(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExportStatus::Running)
    }

    /// Extracts the status of the single task in a `DescribeExportTasks` response
    ///
    /// # Errors
    ///
    /// Returns a status-check protocol error if the task list is missing,
    /// does not contain exactly one task, or the task has no status code.
    pub fn from_response(response: DescribeExportTasksResponse) -> Result<Self> {
        let tasks = response
            .export_tasks
            .ok_or_else(|| LogshipError::status_protocol("response has no exportTasks"))?;

        if tasks.len() != 1 {
            return Err(LogshipError::status_protocol(format!(
                "expected exactly one export task, found {}",
                tasks.len()
            )));
        }

        let status = tasks
            .into_iter()
            .next()
            .and_then(|task| task.status)
            .ok_or_else(|| LogshipError::status_protocol("export task has no status"))?;

        let code = status
            .code
            .ok_or_else(|| LogshipError::status_protocol("export task status has no code"))?;

        Ok(Self::from_code(&code))
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportStatus::Running => write!(f, "RUNNING"),
            ExportStatus::Completed => write!(f, "COMPLETED"),
            ExportStatus::Failed(code) => write!(f, "{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cloudwatch::{ExportTaskDescription, ExportTaskStatus};
    use crate::domain::ExportPhase;
    use test_case::test_case;

    fn response(tasks: Option<Vec<ExportTaskDescription>>) -> DescribeExportTasksResponse {
        DescribeExportTasksResponse {
            export_tasks: tasks,
            next_token: None,
        }
    }

    fn task(code: Option<&str>) -> ExportTaskDescription {
        ExportTaskDescription {
            task_id: Some("abc-123".to_string()),
            status: Some(ExportTaskStatus {
                code: code.map(str::to_string),
                message: None,
            }),
            ..Default::default()
        }
    }

    #[test_case("RUNNING", ExportStatus::Running ; "running")]
    #[test_case("COMPLETED", ExportStatus::Completed ; "completed")]
    #[test_case("FAILED", ExportStatus::Failed("FAILED".to_string()) ; "failed")]
    #[test_case("CANCELLED", ExportStatus::Failed("CANCELLED".to_string()) ; "cancelled")]
    #[test_case("PENDING", ExportStatus::Failed("PENDING".to_string()) ; "pending")]
    fn test_from_code(code: &str, expected: ExportStatus) {
        assert_eq!(ExportStatus::from_code(code), expected);
    }

    #[test]
    fn test_only_running_is_not_terminal() {
        assert!(!ExportStatus::Running.is_terminal());
        assert!(ExportStatus::Completed.is_terminal());
        assert!(ExportStatus::Failed("FAILED".to_string()).is_terminal());
    }

    #[test]
    fn test_from_response() {
        let status = ExportStatus::from_response(response(Some(vec![task(Some("COMPLETED"))])));
        assert_eq!(status.unwrap(), ExportStatus::Completed);
    }

    #[test]
    fn test_malformed_responses_are_protocol_errors() {
        let missing_status = ExportTaskDescription {
            status: None,
            ..task(None)
        };

        let cases = vec![
            response(None),
            response(Some(vec![])),
            response(Some(vec![task(Some("RUNNING")), task(Some("RUNNING"))])),
            response(Some(vec![missing_status])),
            response(Some(vec![task(None)])),
        ];

        for case in cases {
            let err = ExportStatus::from_response(case).unwrap_err();
            assert!(
                matches!(
                    err,
                    LogshipError::Protocol {
                        phase: ExportPhase::StatusCheck,
                        ..
                    }
                ),
                "unexpected error: {err:?}"
            );
        }
    }
}
