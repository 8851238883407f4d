//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::exit_code;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "logship.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Logship configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(exit_code::CONFIGURATION);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your log group and bucket", self.output);
                println!("  2. Export AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY (or put them in .env)");
                println!("  3. Validate configuration: logship validate-config");
                println!("  4. Run export: logship export");
                println!();
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(exit_code::FATAL)
            }
        }
    }

    /// Sample configuration with comments
    fn generate_config() -> String {
        r#"# Logship Configuration File
# Exports one day of a CloudWatch Logs group to S3

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[aws]
region = "us-east-1"

# Override the CloudWatch Logs endpoint (e.g. for LocalStack)
# endpoint = "http://localhost:4566"

access_key_id = "${AWS_ACCESS_KEY_ID}"
secret_access_key = "${AWS_SECRET_ACCESS_KEY}"
# session_token = "${AWS_SESSION_TOKEN}"

# HTTP request timeout
timeout_seconds = 30

[export]
log_group_name = "/aws/lambda/my-function"
destination_bucket = "my-log-archive"

# Objects land under <prefix>/YYYY/MM/DD
destination_prefix = "my-function"

# 0 = the 24 hours starting now, 1 = the 24 hours before that, ...
days_back = 1

[polling]
# First wait between status checks, doubled after every RUNNING response
initial_delay_ms = 1000
backoff_multiplier = 2.0

# Cap for a single wait (unbounded if unset)
# max_delay_ms = 60000

# Randomize waits between half and the full delay
jitter = false

# Stop waiting after this long (wait forever if unset)
# timeout_seconds = 3600

[logging]
# Also write JSON logs to rolling files
local_enabled = false
local_path = "/var/log/logship"

# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
