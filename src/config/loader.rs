//! Configuration loader with TOML parsing and environment variable overrides
//!
//! This is the only place logship reads process environment. Everything
//! downstream receives a plain [`LogshipConfig`].

use super::schema::LogshipConfig;
use super::secret::secret_string;
use crate::domain::errors::LogshipError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into LogshipConfig
/// 4. Applies environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use logship::config::loader::load_config;
///
/// let config = load_config("logship.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<LogshipConfig> {
    validated(read_config_file(path.as_ref())?)
}

/// Loads a configuration file without validating it
///
/// Substitution and environment overrides are applied as in [`load_config`],
/// but required export settings may still be missing. Useful for reading
/// sections such as `[logging]` before command-line flags are applied.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or an environment
/// variable cannot be substituted or parsed.
pub fn read_config(path: impl AsRef<Path>) -> Result<LogshipConfig> {
    read_config_file(path.as_ref())
}

/// Builds configuration from environment variables alone
///
/// Used when no configuration file exists. The export parameters come from
/// `GROUP_NAME`, `DESTINATION_BUCKET`, `PREFIX` and `NDAYS` (or their
/// `LOGSHIP_EXPORT_*` equivalents) and credentials from the standard `AWS_*`
/// variables.
///
/// # Errors
///
/// Returns an error if a variable cannot be parsed or the resulting
/// configuration is invalid.
pub fn load_config_from_env() -> Result<LogshipConfig> {
    validated(read_config_env()?)
}

/// Loads configuration from `path` if it exists, otherwise from the environment
///
/// `adjust` runs after environment overrides and before validation, which
/// lets command-line flags fill in values missing from both sources.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded, a variable cannot be
/// parsed, or the adjusted configuration is invalid.
pub fn load_config_or_env<F>(path: impl AsRef<Path>, adjust: F) -> Result<LogshipConfig>
where
    F: FnOnce(&mut LogshipConfig),
{
    let path = path.as_ref();
    let mut config = if path.exists() {
        tracing::debug!(path = %path.display(), "Loading configuration file");
        read_config_file(path)?
    } else {
        tracing::debug!(path = %path.display(), "No configuration file, using environment");
        read_config_env()?
    };

    adjust(&mut config);
    validated(config)
}

fn read_config_file(path: &Path) -> Result<LogshipConfig> {
    if !path.exists() {
        return Err(LogshipError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LogshipError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: LogshipConfig = toml::from_str(&contents)
        .map_err(|e| LogshipError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;
    Ok(config)
}

fn read_config_env() -> Result<LogshipConfig> {
    let mut config = LogshipConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

fn validated(config: LogshipConfig) -> Result<LogshipConfig> {
    config.validate().map_err(|e| {
        LogshipError::Configuration(format!("Configuration validation failed: {e}"))
    })?;
    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LogshipError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Returns the first of `names` that is set in the environment, with its name
fn first_env<'a>(names: &[&'a str]) -> Option<(&'a str, String)> {
    names
        .iter()
        .find_map(|name| std::env::var(name).ok().map(|val| (*name, val)))
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        LogshipError::Configuration(format!("Invalid value '{value}' for {name}: {e}"))
    })
}

/// Applies environment variable overrides
///
/// `LOGSHIP_<SECTION>_<KEY>` variables win over the plain names that the
/// container deployment uses (`GROUP_NAME`, `DESTINATION_BUCKET`, `PREFIX`,
/// `NDAYS`), which in turn win over the file. AWS settings also honor the
/// standard `AWS_*` variables.
fn apply_env_overrides(config: &mut LogshipConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("LOGSHIP_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // AWS overrides
    if let Some((_, val)) = first_env(&["LOGSHIP_AWS_REGION", "AWS_REGION", "AWS_DEFAULT_REGION"]) {
        config.aws.region = val;
    }
    if let Some((_, val)) = first_env(&["LOGSHIP_AWS_ENDPOINT", "AWS_ENDPOINT_URL_CLOUDWATCH_LOGS"]) {
        config.aws.endpoint = Some(val);
    }
    if let Some((_, val)) = first_env(&["LOGSHIP_AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"]) {
        config.aws.access_key_id = Some(val);
    }
    if let Some((_, val)) = first_env(&["LOGSHIP_AWS_SECRET_ACCESS_KEY", "AWS_SECRET_ACCESS_KEY"]) {
        config.aws.secret_access_key = Some(secret_string(val));
    }
    if let Some((_, val)) = first_env(&["LOGSHIP_AWS_SESSION_TOKEN", "AWS_SESSION_TOKEN"]) {
        config.aws.session_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("LOGSHIP_AWS_TIMEOUT_SECONDS") {
        config.aws.timeout_seconds = parse_env("LOGSHIP_AWS_TIMEOUT_SECONDS", &val)?;
    }

    // Export overrides
    if let Some((_, val)) = first_env(&["LOGSHIP_EXPORT_LOG_GROUP_NAME", "GROUP_NAME"]) {
        config.export.log_group_name = val;
    }
    if let Some((_, val)) = first_env(&["LOGSHIP_EXPORT_DESTINATION_BUCKET", "DESTINATION_BUCKET"]) {
        config.export.destination_bucket = val;
    }
    if let Some((_, val)) = first_env(&["LOGSHIP_EXPORT_DESTINATION_PREFIX", "PREFIX"]) {
        config.export.destination_prefix = val;
    }
    if let Some((name, val)) = first_env(&["LOGSHIP_EXPORT_DAYS_BACK", "NDAYS"]) {
        config.export.days_back = parse_env(name, &val)?;
    }

    // Polling overrides
    if let Ok(val) = std::env::var("LOGSHIP_POLLING_INITIAL_DELAY_MS") {
        config.polling.initial_delay_ms = parse_env("LOGSHIP_POLLING_INITIAL_DELAY_MS", &val)?;
    }
    if let Ok(val) = std::env::var("LOGSHIP_POLLING_BACKOFF_MULTIPLIER") {
        config.polling.backoff_multiplier =
            parse_env("LOGSHIP_POLLING_BACKOFF_MULTIPLIER", &val)?;
    }
    if let Ok(val) = std::env::var("LOGSHIP_POLLING_MAX_DELAY_MS") {
        config.polling.max_delay_ms = Some(parse_env("LOGSHIP_POLLING_MAX_DELAY_MS", &val)?);
    }
    if let Ok(val) = std::env::var("LOGSHIP_POLLING_JITTER") {
        config.polling.jitter = parse_env("LOGSHIP_POLLING_JITTER", &val)?;
    }
    if let Ok(val) = std::env::var("LOGSHIP_POLLING_TIMEOUT_SECONDS") {
        config.polling.timeout_seconds = Some(parse_env("LOGSHIP_POLLING_TIMEOUT_SECONDS", &val)?);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("LOGSHIP_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("LOGSHIP_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("LOGSHIP_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("LOGSHIP_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LOGSHIP_LOADER_TEST_VAR", "test_value");
        let input = "secret_access_key = \"${LOGSHIP_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "secret_access_key = \"test_value\"\n");
        std::env::remove_var("LOGSHIP_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LOGSHIP_LOADER_MISSING_VAR");
        let input = "secret_access_key = \"${LOGSHIP_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("LOGSHIP_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let input = "# secret = \"${LOGSHIP_LOADER_COMMENTED_OUT}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${LOGSHIP_LOADER_COMMENTED_OUT}"));
    }

    #[test]
    fn test_parse_env_reports_variable() {
        let err = parse_env::<i64>("NDAYS", "yesterday").unwrap_err();
        assert!(err.to_string().contains("NDAYS"));
        assert_eq!(parse_env::<i64>("NDAYS", " 3 ").unwrap(), 3);
    }

    #[test]
    fn test_first_env_returns_matching_name() {
        std::env::remove_var("LOGSHIP_LOADER_FIRST_A");
        std::env::set_var("LOGSHIP_LOADER_FIRST_B", "value");

        let found = first_env(&["LOGSHIP_LOADER_FIRST_A", "LOGSHIP_LOADER_FIRST_B"]);
        assert_eq!(found, Some(("LOGSHIP_LOADER_FIRST_B", "value".to_string())));

        std::env::remove_var("LOGSHIP_LOADER_FIRST_B");
        assert_eq!(first_env(&["LOGSHIP_LOADER_FIRST_A", "LOGSHIP_LOADER_FIRST_B"]), None);
    }

    #[test]
    fn test_parse_env_rejects_bad_bool() {
        let err = parse_env::<bool>("LOGSHIP_POLLING_JITTER", "yes").unwrap_err();
        assert!(err.to_string().contains("LOGSHIP_POLLING_JITTER"));
        assert!(parse_env::<bool>("LOGSHIP_POLLING_JITTER", "true").unwrap());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-logship.toml");
        assert!(result.is_err());
    }
}
