//! Export command implementation
//!
//! Runs one export and prints `{"task_id": ..., "s3_export_path": ...}` on
//! stdout. Diagnostics go to stderr through the logger.

use crate::adapters::cloudwatch::CloudWatchLogsClient;
use crate::cli::{exit_code, exit_code_for};
use crate::config::{load_config_or_env, LogshipConfig};
use crate::core::backoff::BackoffPolicy;
use crate::core::export::ExportOrchestrator;
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Override the log group to export
    #[arg(long)]
    pub log_group: Option<String>,

    /// Override the destination S3 bucket
    #[arg(long)]
    pub bucket: Option<String>,

    /// Override the destination key prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Override the day offset (0 = starting now, 1 = the day before, ...)
    #[arg(long, allow_negative_numbers = true)]
    pub days_back: Option<i64>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config_or_env(config_path, |config| self.apply_overrides(config)) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("{e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let client = match CloudWatchLogsClient::new(&config.aws) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create CloudWatch Logs client");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let orchestrator =
            ExportOrchestrator::new(Arc::new(client), BackoffPolicy::from(&config.polling))
                .with_poll_timeout(config.polling.poll_timeout())
                .with_shutdown(shutdown_signal);

        match orchestrator.run(&config.export_request()).await {
            Ok(outcome) => {
                println!("{}", serde_json::to_string(&outcome)?);
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }

    fn apply_overrides(&self, config: &mut LogshipConfig) {
        if let Some(ref log_group) = self.log_group {
            tracing::info!(log_group = %log_group, "Overriding log group from CLI");
            config.export.log_group_name = log_group.clone();
        }
        if let Some(ref bucket) = self.bucket {
            tracing::info!(bucket = %bucket, "Overriding destination bucket from CLI");
            config.export.destination_bucket = bucket.clone();
        }
        if let Some(ref prefix) = self.prefix {
            tracing::info!(prefix = %prefix, "Overriding destination prefix from CLI");
            config.export.destination_prefix = prefix.clone();
        }
        if let Some(days_back) = self.days_back {
            tracing::info!(days_back, "Overriding day offset from CLI");
            config.export.days_back = days_back;
        }
    }
}
