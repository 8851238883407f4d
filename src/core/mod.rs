//! Core business logic for Logship.
//!
//! # Modules
//!
//! - [`window`] - Export window and destination path calculation
//! - [`backoff`] - Delay policy between status checks
//! - [`export`] - Export submission and status polling
//!
//! # Export Workflow
//!
//! 1. **Window**: compute the 24-hour interval for the requested day offset
//! 2. **Path**: derive `<prefix>/YYYY/MM/DD` from the window start
//! 3. **Submit**: create the CloudWatch Logs export task
//! 4. **Poll**: query the task status with exponential backoff until it completes
//!
//! # Example
//!
//! ```rust,no_run
//! use logship::adapters::cloudwatch::CloudWatchLogsClient;
//! use logship::config::load_config;
//! use logship::core::backoff::BackoffPolicy;
//! use logship::core::export::ExportOrchestrator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("logship.toml")?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let client = CloudWatchLogsClient::new(&config.aws)?;
//! let orchestrator = ExportOrchestrator::new(Arc::new(client), BackoffPolicy::from(&config.polling))
//!     .with_shutdown(shutdown_rx);
//!
//! let outcome = orchestrator.run(&config.export_request()).await?;
//! println!("{}", serde_json::to_string(&outcome)?);
//! # Ok(())
//! # }
//! ```

pub mod backoff;
pub mod export;
pub mod window;
