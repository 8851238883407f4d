//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - console output on stderr
//! - configurable log levels (`RUST_LOG` overrides the configured level)
//! - optional JSON files with rotation
//!
//! # Example
//!
//! ```no_run
//! use logship::config::LoggingConfig;
//! use logship::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(task_id = "abc-123", "Export task created");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};
