//! Core types: errors, configuration, target validation.

pub mod config;
pub mod errors;
pub mod paths;
