//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use filewiper::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, WipeError};
pub use crate::core::paths::validate_target;

// Engine
pub use crate::wiper::engine::{NodeOutcome, WipeOptions, WipeReport, Wiper};
pub use crate::wiper::overwrite::PassReport;
pub use crate::wiper::pattern::{DEFAULT_PATTERN, PatternSequence};

// Logging
pub use crate::logger::jsonl::{ActivityLog, EventType, LogEntry, Severity};
