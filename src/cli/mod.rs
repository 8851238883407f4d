//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Logship using clap.

pub mod commands;

use crate::config::{read_config, LoggingConfig};
use crate::domain::LogshipError;
use clap::{Parser, Subcommand};
use std::path::Path;

/// Process exit codes
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const CONFIGURATION: i32 = 2;
    pub const JOB_FAILED: i32 = 3;
    pub const SERVICE: i32 = 4;
    pub const FATAL: i32 = 5;
    pub const CANCELLED: i32 = 130;
}

/// Logship - CloudWatch Logs to S3 export tool
#[derive(Parser, Debug)]
#[command(name = "logship")]
#[command(version, about, long_about = None)]
#[command(author = "Logship Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "logship.toml", env = "LOGSHIP_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LOGSHIP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level and file logging settings for this invocation
    ///
    /// `--log-level` wins over the config file. The file is read without
    /// validation, since export settings may still come from flags; a file
    /// that cannot be read at all is reported by the command itself, so here
    /// it only falls back to console logging.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        let file_config = if Path::new(&self.config).exists() {
            read_config(&self.config).ok()
        } else {
            None
        };

        let level = self
            .log_level
            .clone()
            .or_else(|| file_config.as_ref().map(|c| c.application.log_level.clone()))
            .unwrap_or_else(|| "info".to_string());

        let logging = file_config.map(|c| c.logging).unwrap_or_default();
        (level, logging)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export one day of a log group to S3 and wait for completion
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Maps an error to the process exit code
pub fn exit_code_for(err: &LogshipError) -> i32 {
    match err {
        LogshipError::Configuration(_) | LogshipError::InvalidInput(_) => exit_code::CONFIGURATION,
        LogshipError::JobFailed { .. } => exit_code::JOB_FAILED,
        LogshipError::SubmissionFailed(_)
        | LogshipError::StatusCheckFailed { .. }
        | LogshipError::Protocol { .. }
        | LogshipError::PollTimeout { .. } => exit_code::SERVICE,
        LogshipError::Cancelled { .. } => exit_code::CANCELLED,
        LogshipError::Serialization(_) | LogshipError::Io(_) => exit_code::FATAL,
    }
}
