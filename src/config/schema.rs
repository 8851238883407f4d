//! Configuration schema types
//!
//! This module defines the configuration structure that maps to `logship.toml`.

use crate::config::SecretString;
use crate::core::export::ExportRequest;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Main logship configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LogshipConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// AWS connection settings
    #[serde(default)]
    pub aws: AwsConfig,

    /// What to export and where
    #[serde(default)]
    pub export: ExportConfig,

    /// Status polling and backoff
    #[serde(default)]
    pub polling: PollingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LogshipConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.aws.validate()?;
        self.export.validate()?;
        self.polling.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Builds the export request the orchestrator runs
    pub fn export_request(&self) -> ExportRequest {
        ExportRequest {
            log_group_name: self.export.log_group_name.clone(),
            destination_bucket: self.export.destination_bucket.clone(),
            destination_prefix: self.export.destination_prefix.clone(),
            days_back: self.export.days_back,
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// AWS connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// AWS region of the log group (e.g. "us-east-1")
    #[serde(default = "default_region")]
    pub region: String,

    /// Override for the CloudWatch Logs endpoint (defaults to the regional endpoint)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Access key ID
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// Secret access key
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,

    /// Session token for temporary credentials
    #[serde(default)]
    pub session_token: Option<SecretString>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl AwsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.region.trim().is_empty() {
            return Err("aws.region cannot be empty".to_string());
        }

        if let Some(ref endpoint) = self.endpoint {
            let url = url::Url::parse(endpoint)
                .map_err(|e| format!("Invalid aws.endpoint '{endpoint}': {e}"))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(format!(
                    "aws.endpoint must use http or https, got '{}'",
                    url.scheme()
                ));
            }
        }

        match self.access_key_id.as_deref() {
            Some(id) if !id.trim().is_empty() => {}
            _ => return Err("aws.access_key_id is required".to_string()),
        }

        match self.secret_access_key {
            Some(ref key) if !key.expose_secret().is_empty() => {}
            _ => return Err("aws.secret_access_key is required".to_string()),
        }

        if self.timeout_seconds == 0 {
            return Err("aws.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }

    /// Endpoint URL the client sends requests to
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://logs.{}.amazonaws.com", self.region))
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Name of the CloudWatch log group to export
    #[serde(default)]
    pub log_group_name: String,

    /// S3 bucket receiving the export
    #[serde(default)]
    pub destination_bucket: String,

    /// Key prefix under which the dated export folder is created
    #[serde(default)]
    pub destination_prefix: String,

    /// Which day to export: 0 = the 24 hours starting now, 1 = the day before, ...
    #[serde(default = "default_days_back")]
    pub days_back: i64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            log_group_name: String::new(),
            destination_bucket: String::new(),
            destination_prefix: String::new(),
            days_back: default_days_back(),
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        crate::domain::LogGroupName::new(self.log_group_name.as_str())
            .map_err(|e| format!("Invalid export.log_group_name: {e}"))?;

        if self.destination_bucket.trim().is_empty() {
            return Err("export.destination_bucket cannot be empty".to_string());
        }

        if self.days_back < 0 {
            return Err(format!(
                "export.days_back must be >= 0, got {}",
                self.days_back
            ));
        }

        Ok(())
    }
}

/// Status polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay before the second status check, in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Factor applied to the delay after every RUNNING response
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Upper bound for a single delay (unbounded if unset)
    #[serde(default)]
    pub max_delay_ms: Option<u64>,

    /// Randomize each delay between half and the full value
    #[serde(default)]
    pub jitter: bool,

    /// Give up waiting after this many seconds (wait forever if unset)
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl PollingConfig {
    /// Overall polling timeout, if configured
    pub fn poll_timeout(&self) -> Option<std::time::Duration> {
        self.timeout_seconds.map(std::time::Duration::from_secs)
    }

    fn validate(&self) -> Result<(), String> {
        if self.initial_delay_ms == 0 {
            return Err("polling.initial_delay_ms must be > 0".to_string());
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(format!(
                "polling.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        if let Some(max) = self.max_delay_ms {
            if max < self.initial_delay_ms {
                return Err(format!(
                    "polling.max_delay_ms ({max}) must be >= polling.initial_delay_ms ({})",
                    self.initial_delay_ms
                ));
            }
        }

        if self.timeout_seconds == Some(0) {
            return Err("polling.timeout_seconds must be > 0 when set".to_string());
        }

        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: None,
            jitter: false,
            timeout_seconds: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// File rotation (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_days_back() -> i64 {
    1
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_local_path() -> String {
    "/var/log/logship".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
