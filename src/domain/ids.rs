//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers logship passes to and receives from
//! CloudWatch Logs. Each type rejects empty values on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Export task identifier
///
/// Opaque handle returned by `CreateExportTask`. It lives for the duration
/// of one run and is never reused.
///
/// # Examples
///
/// ```
/// use logship::domain::ids::ExportTaskId;
/// use std::str::FromStr;
///
/// let task_id = ExportTaskId::from_str("2b0a3c52-8e2a-4d7c-9f2c-0c6a1c8f7e11").unwrap();
/// assert_eq!(task_id.as_str(), "2b0a3c52-8e2a-4d7c-9f2c-0c6a1c8f7e11");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportTaskId(String);

impl ExportTaskId {
    /// Creates a new ExportTaskId
    ///
    /// # Errors
    ///
    /// Returns `Err` if the identifier is empty or only whitespace
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Export task ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the task ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ExportTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExportTaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ExportTaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// CloudWatch log group name
///
/// Log group names are 1-512 characters from `[\.\-_/#A-Za-z0-9]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogGroupName(String);

impl LogGroupName {
    const MAX_LEN: usize = 512;

    /// Creates a new LogGroupName
    ///
    /// # Errors
    ///
    /// Returns `Err` if the name is empty, too long, or contains characters
    /// CloudWatch Logs does not allow in log group names
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.is_empty() {
            return Err("Log group name cannot be empty".to_string());
        }
        if name.len() > Self::MAX_LEN {
            return Err(format!(
                "Log group name exceeds {} characters",
                Self::MAX_LEN
            ));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '/' | '#')))
        {
            return Err(format!("Log group name contains invalid character '{c}'"));
        }
        Ok(Self(name))
    }

    /// Returns the log group name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogGroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LogGroupName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
