//! Configuration management for logship.
//!
//! logship reads a TOML file (default `logship.toml`) with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment overrides (`LOGSHIP_<SECTION>_<KEY>`, `GROUP_NAME`,
//!   `DESTINATION_BUCKET`, `PREFIX`, `NDAYS`, `AWS_*`)
//! - Default values for optional settings
//! - Validation on load
//!
//! When no file is present, [`load_config_from_env`] builds the same
//! structure from the environment alone.
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`AwsConfig`] - Region, endpoint, credentials, HTTP timeout
//! - [`ExportConfig`] - Log group, bucket, prefix, day offset
//! - [`PollingConfig`] - Backoff between status checks
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [aws]
//! region = "us-east-1"
//! access_key_id = "${AWS_ACCESS_KEY_ID}"
//! secret_access_key = "${AWS_SECRET_ACCESS_KEY}"
//!
//! [export]
//! log_group_name = "/aws/lambda/orders"
//! destination_bucket = "log-archive"
//! destination_prefix = "orders"
//! days_back = 1
//!
//! [polling]
//! initial_delay_ms = 1000
//! backoff_multiplier = 2.0
//! ```
//!
//! ```rust,no_run
//! use logship::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("logship.toml")?;
//! println!("Exporting {}", config.export.log_group_name);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_from_env, load_config_or_env, read_config};
pub use schema::{
    ApplicationConfig, AwsConfig, ExportConfig, LoggingConfig, LogshipConfig, PollingConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
