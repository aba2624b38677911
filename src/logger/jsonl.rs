//! JSONL activity log: append-only line-delimited JSON.
//!
//! Each line is a self-contained JSON object assembled in memory and
//! written via a single `write_all`, so a tailing process never sees a
//! partial line. Logging is a side channel: it must never make the
//! wipe fail, so every write degrades (file -> stderr -> discard)
//! instead of erroring.

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::config::LogSection;

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Event types emitted by the wipe engine and front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    WipeStart,
    PassSkipped,
    FileWiped,
    DeleteFailed,
    DirRemoved,
    LeafSkipped,
    ListingFailed,
    WipeComplete,
}

/// A single JSONL log entry; `ts`, `event`, `severity` are mandatory,
/// everything else is omitted from the serialized line when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    /// Event type identifier.
    pub event: EventType,
    /// Severity level.
    pub severity: Severity,
    /// Affected filesystem path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Size in bytes of the affected file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Zero-based index of the overwrite pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_index: Option<usize>,
    /// Fill byte of the overwrite pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_byte: Option<u8>,
    /// Number of passes in the pattern sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_count: Option<usize>,
    /// Duration of the action in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// FWP error code for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Freeform details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            path: None,
            size: None,
            pass_index: None,
            pass_byte: None,
            pass_count: None,
            duration_ms: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }

    /// Attach the affected path.
    #[must_use]
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_string_lossy().to_string());
        self
    }

    /// Attach an error code + message pair.
    #[must_use]
    pub fn with_error(mut self, code: &str, message: impl Into<String>) -> Self {
        self.error_code = Some(code.to_string());
        self.error_message = Some(message.into());
        self
    }
}

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// Writing to the configured file.
    File,
    /// File failed, writing to stderr.
    Stderr,
    /// Everything failed, silently discarding.
    Discard,
}

/// Append-only JSONL writer with size-based rotation.
pub struct ActivityLog {
    path: PathBuf,
    max_size_bytes: u64,
    max_rotated_files: u32,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
}

impl ActivityLog {
    /// Open the activity log described by `section` at `path`.
    pub fn open(path: PathBuf, section: &LogSection) -> Self {
        let mut log = Self {
            path,
            max_size_bytes: section.max_size_bytes,
            max_rotated_files: section.max_rotated_files,
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
        };
        match open_append(&log.path) {
            Ok((file, size)) => {
                log.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                log.state = WriterState::File;
                log.bytes_written = size;
            }
            Err(e) => {
                log.state = WriterState::Stderr;
                let _ = writeln!(
                    io::stderr(),
                    "[FWP-LOG] cannot open {}: {e}; logging to stderr",
                    log.path.display()
                );
            }
        }
        log
    }

    /// Write a single entry as one atomic JSONL line.
    pub fn write_entry(&mut self, entry: &LogEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[FWP-LOG] serialize error: {e}");
                return;
            }
        };
        self.write_line(&line);
    }

    /// Flush buffered lines.
    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }

    /// Current degradation state, for diagnostics.
    pub fn state(&self) -> &'static str {
        match self.state {
            WriterState::File => "file",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    fn write_line(&mut self, line: &str) {
        if self.state == WriterState::File
            && self.bytes_written + line.len() as u64 > self.max_size_bytes
        {
            self.rotate();
        }

        match self.state {
            WriterState::File => {
                if let Some(w) = self.writer.as_mut() {
                    if w.write_all(line.as_bytes()).is_err() {
                        self.degrade();
                        self.write_line(line);
                        return;
                    }
                    self.bytes_written += line.len() as u64;
                } else {
                    self.degrade();
                    self.write_line(line);
                }
            }
            WriterState::Stderr => {
                if write!(io::stderr(), "[FWP-LOG] {line}").is_err() {
                    self.state = WriterState::Discard;
                }
            }
            WriterState::Discard => {}
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        match self.state {
            WriterState::File => {
                self.state = WriterState::Stderr;
                let _ = writeln!(io::stderr(), "[FWP-LOG] log write failed, using stderr");
            }
            WriterState::Stderr => self.state = WriterState::Discard,
            WriterState::Discard => {}
        }
    }

    /// Shift rotations `.N-1 -> .N`, move current to `.1`, reopen fresh.
    fn rotate(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
        self.writer = None;

        for i in (1..self.max_rotated_files).rev() {
            let _ = rename(rotated_name(&self.path, i), rotated_name(&self.path, i + 1));
        }
        let _ = fs::remove_file(rotated_name(&self.path, self.max_rotated_files));
        let _ = rename(&self.path, rotated_name(&self.path, 1));

        match open_append(&self.path) {
            Ok((file, _)) => {
                self.writer = Some(BufWriter::with_capacity(16 * 1024, file));
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

impl Drop for ActivityLog {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Open or create a file for appending. Returns `(file, current_size)`.
fn open_append(path: &Path) -> io::Result<(File, u64)> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

/// Build a rotated filename: `wipe.jsonl` -> `wipe.jsonl.2`.
fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Format current UTC time as ISO 8601 with millisecond precision.
fn format_utc_now() -> String {
    chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
