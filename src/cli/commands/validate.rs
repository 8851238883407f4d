//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Logship configuration file.

use crate::cli::exit_code;
use crate::config::{load_config, LogshipConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                println!("{}", Self::summary(&config));
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(exit_code::CONFIGURATION)
            }
        }
    }

    /// Human-readable summary; credentials are reported as set/unset only
    fn summary(config: &LogshipConfig) -> String {
        let set_or_unset = |present: bool| if present { "set" } else { "not set" };
        let polling = &config.polling;

        let mut lines = vec![
            "Configuration Summary:".to_string(),
            format!("  Log Level: {}", config.application.log_level),
            format!("  AWS Region: {}", config.aws.region),
            format!("  Endpoint: {}", config.aws.endpoint_url()),
            format!(
                "  Access Key ID: {}",
                set_or_unset(config.aws.access_key_id.is_some())
            ),
            format!(
                "  Secret Access Key: {}",
                set_or_unset(config.aws.secret_access_key.is_some())
            ),
            format!(
                "  Session Token: {}",
                set_or_unset(config.aws.session_token.is_some())
            ),
            format!("  Log Group: {}", config.export.log_group_name),
            format!("  Destination Bucket: {}", config.export.destination_bucket),
            format!("  Destination Prefix: {}", config.export.destination_prefix),
            format!("  Days Back: {}", config.export.days_back),
            format!(
                "  Polling: {}ms initial, x{} per check",
                polling.initial_delay_ms, polling.backoff_multiplier
            ),
        ];

        if let Some(max) = polling.max_delay_ms {
            lines.push(format!("  Max Delay: {max}ms"));
        }
        if let Some(timeout) = polling.timeout_seconds {
            lines.push(format!("  Poll Timeout: {timeout}s"));
        }
        if config.logging.local_enabled {
            lines.push(format!(
                "  Log Files: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            ));
        }

        lines.join("\n")
    }
}
