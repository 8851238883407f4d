//! Domain error types
//!
//! This module defines the error hierarchy for logship. The orchestrator
//! returns [`LogshipError`]; the CloudWatch adapter returns [`CloudWatchError`],
//! which the orchestrator wraps with the phase that failed. Neither type
//! exposes third-party error types.

use super::ids::ExportTaskId;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Phase of an export run, used to give protocol errors context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportPhase {
    /// `CreateExportTask` call
    Submission,
    /// `DescribeExportTasks` call
    StatusCheck,
}

impl fmt::Display for ExportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportPhase::Submission => write!(f, "submission"),
            ExportPhase::StatusCheck => write!(f, "status check"),
        }
    }
}

/// Main logship error type
#[derive(Debug, Error)]
pub enum LogshipError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed or out-of-range caller input (e.g. a negative day offset)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The export task could not be created
    #[error("Failed to create export task: {0}")]
    SubmissionFailed(#[source] CloudWatchError),

    /// The status of an export task could not be retrieved
    #[error("Failed to check status of export task {task_id}: {source}")]
    StatusCheckFailed {
        task_id: ExportTaskId,
        #[source]
        source: CloudWatchError,
    },

    /// A response violated the expected shape of the service contract
    #[error("Unexpected response during {phase}: {message}")]
    Protocol { phase: ExportPhase, message: String },

    /// The export task reached a terminal state other than COMPLETED
    #[error("Export task {task_id} ended in state {code}")]
    JobFailed { task_id: ExportTaskId, code: String },

    /// The export task did not finish within the configured polling timeout
    #[error("Export task {task_id} still running after {}s", .waited.as_secs())]
    PollTimeout {
        task_id: ExportTaskId,
        waited: Duration,
    },

    /// The run was interrupted by a shutdown signal
    #[error("Export cancelled {}", cancelled_context(.task_id))]
    Cancelled { task_id: Option<ExportTaskId> },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

fn cancelled_context(task_id: &Option<ExportTaskId>) -> String {
    match task_id {
        Some(id) => format!("while waiting for task {id}"),
        None => "before submission".to_string(),
    }
}

impl LogshipError {
    /// Builds a protocol error for the submission phase
    pub fn submission_protocol(message: impl Into<String>) -> Self {
        LogshipError::Protocol {
            phase: ExportPhase::Submission,
            message: message.into(),
        }
    }

    /// Builds a protocol error for the status-check phase
    pub fn status_protocol(message: impl Into<String>) -> Self {
        LogshipError::Protocol {
            phase: ExportPhase::StatusCheck,
            message: message.into(),
        }
    }
}

/// CloudWatch Logs errors
///
/// Errors that occur when talking to the CloudWatch Logs API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum CloudWatchError {
    /// Failed to reach the service
    #[error("Failed to connect to CloudWatch Logs: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The service rejected the request
    #[error("Service error: {status} {error_type} - {message}")]
    Service {
        status: u16,
        error_type: String,
        message: String,
    },

    /// Response body could not be decoded
    ///
    /// The orchestrator reports this as a protocol error, not a transport
    /// failure.
    #[error("Invalid response from service: {0}")]
    InvalidResponse(String),

    /// The request could not be signed
    #[error("Request signing failed: {0}")]
    Signing(String),
}

impl From<reqwest::Error> for CloudWatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CloudWatchError::Timeout(err.to_string())
        } else if err.is_decode() {
            CloudWatchError::InvalidResponse(err.to_string())
        } else {
            CloudWatchError::ConnectionFailed(err.to_string())
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for LogshipError {
    fn from(err: std::io::Error) -> Self {
        LogshipError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LogshipError {
    fn from(err: serde_json::Error) -> Self {
        LogshipError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LogshipError {
    fn from(err: toml::de::Error) -> Self {
        LogshipError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::str::FromStr;

    #[test]
    fn test_logship_error_display() {
        let err = LogshipError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_protocol_error_names_phase() {
        let err = LogshipError::submission_protocol("missing taskId");
        assert_eq!(
            err.to_string(),
            "Unexpected response during submission: missing taskId"
        );

        let err = LogshipError::status_protocol("no exportTasks");
        assert!(err.to_string().contains("status check"));
    }

    #[test]
    fn test_submission_failed_keeps_source() {
        let err = LogshipError::SubmissionFailed(CloudWatchError::Service {
            status: 400,
            error_type: "LimitExceededException".to_string(),
            message: "Resource limit exceeded".to_string(),
        });

        let source = err.source().expect("source should be set");
        assert!(source.to_string().contains("LimitExceededException"));
    }

    #[test]
    fn test_job_failed_display() {
        let err = LogshipError::JobFailed {
            task_id: ExportTaskId::from_str("abc-123").unwrap(),
            code: "FAILED".to_string(),
        };
        assert_eq!(err.to_string(), "Export task abc-123 ended in state FAILED");
    }

    #[test]
    fn test_cancelled_display() {
        let before = LogshipError::Cancelled { task_id: None };
        assert_eq!(before.to_string(), "Export cancelled before submission");

        let during = LogshipError::Cancelled {
            task_id: Some(ExportTaskId::from_str("abc-123").unwrap()),
        };
        assert_eq!(
            during.to_string(),
            "Export cancelled while waiting for task abc-123"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: LogshipError = io_err.into();
        assert!(matches!(err, LogshipError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: LogshipError = toml_err.into();
        assert!(matches!(err, LogshipError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
