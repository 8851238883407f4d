//! External system integrations for Logship.
//!
//! - [`cloudwatch`] - CloudWatch Logs export task API
//!
//! Adapters isolate the wire protocol from the export workflow so the
//! workflow can be tested against mock implementations of
//! [`cloudwatch::LogExportService`].

pub mod cloudwatch;
