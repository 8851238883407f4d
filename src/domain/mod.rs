//! Domain types for logship.
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ExportTaskId`], [`LogGroupName`])
//! - **Error types** ([`LogshipError`], [`CloudWatchError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, LogshipError>`]:
//!
//! ```rust,no_run
//! use logship::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = logship::config::load_config("logship.toml")?;
//!     println!("{}", config.export.log_group_name);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod result;

pub use errors::{CloudWatchError, ExportPhase, LogshipError};
pub use ids::{ExportTaskId, LogGroupName};
pub use result::Result;
