//! The wipe engine: pattern sequences, multi-pass overwrite, and the
//! recursive traversal that applies them.

pub mod engine;
pub mod overwrite;
pub mod pattern;
