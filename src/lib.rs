// Logship - CloudWatch Logs to S3 export tool
// Copyright (c) 2025 Logship Contributors
// Licensed under the MIT License

//! # Logship - CloudWatch Logs to S3 export
//!
//! Logship exports one day of a CloudWatch Logs group to an S3 bucket and
//! waits for the export task to finish.
//!
//! ## Overview
//!
//! A run consists of four steps:
//! - **Window**: compute the 24-hour interval `[now - N days, now - N days + 24h)`
//! - **Path**: derive the destination prefix `<prefix>/YYYY/MM/DD` from the window start
//! - **Submit**: create a CloudWatch Logs export task for that window
//! - **Poll**: query the task with exponential backoff until it is COMPLETED
//!
//! The result is `{"task_id": ..., "s3_export_path": ...}`.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Window calculation, backoff and export orchestration
//! - [`adapters`] - CloudWatch Logs client (JSON 1.1 protocol, SigV4)
//! - [`domain`] - Identifiers and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logship::adapters::cloudwatch::CloudWatchLogsClient;
//! use logship::config::load_config;
//! use logship::core::backoff::BackoffPolicy;
//! use logship::core::export::ExportOrchestrator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("logship.toml")?;
//!
//!     let client = CloudWatchLogsClient::new(&config.aws)?;
//!     let orchestrator =
//!         ExportOrchestrator::new(Arc::new(client), BackoffPolicy::from(&config.polling));
//!
//!     let outcome = orchestrator.run(&config.export_request()).await?;
//!     println!("{}", serde_json::to_string(&outcome)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], an alias over
//! [`domain::LogshipError`]. Service failures keep the underlying
//! [`domain::CloudWatchError`] as their source.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
