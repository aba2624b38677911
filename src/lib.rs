#![forbid(unsafe_code)]

//! filewiper — secure-deletion utility.
//!
//! Overwrites file contents with one or more configured byte patterns
//! before removing the file or directory entry, so the original
//! content is not trivially recoverable by casual undelete or
//! raw-read tools.
//!
//! **Important qualifiers:** this is NOT a disk-level sanitizer. Data
//! in unused, previously written portions of a disk may remain
//! recoverable; the tool does not comply with DoD 5220.22 or
//! NIST 800-88.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use filewiper::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use filewiper::wiper::engine::Wiper;
//! use filewiper::wiper::pattern::PatternSequence;
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod wiper;
