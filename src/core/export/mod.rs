//! Export orchestration
//!
//! - [`ExportOrchestrator`] submits an export task and polls it to completion
//! - [`ExportStatus`] interprets `DescribeExportTasks` responses
//! - [`ExportRequest`] / [`ExportOutcome`] are the inputs and result of a run

pub mod orchestrator;
pub mod request;
pub mod status;

pub use orchestrator::ExportOrchestrator;
pub use request::{ExportOutcome, ExportRequest, PollReport};
pub use status::ExportStatus;
