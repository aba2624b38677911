//! Append-only JSONL activity logging for wipe operations.

pub mod jsonl;
