//! Result type alias for logship

use super::errors::LogshipError;

/// Result type alias for logship operations
///
/// # Examples
///
/// ```
/// use logship::domain::result::Result;
/// use logship::domain::errors::LogshipError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LogshipError::InvalidInput("days_back must be >= 0".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LogshipError>;
