//! Wipe engine: depth-first post-order traversal with per-node
//! failure isolation.
//!
//! Directories recurse into their children first; only after every
//! child has been processed is the directory itself removed. Leaves
//! are overwritten (best-effort, §overwrite) and then unlinked.
//!
//! The failure policy is asymmetric on purpose, mirroring the
//! behavioral contract of the tool:
//!
//! | condition                      | scope   | effect                    |
//! |--------------------------------|---------|---------------------------|
//! | directory listing fails        | subtree | fatal, aborts everything  |
//! | one overwrite pass fails       | pass    | logged, next pass runs    |
//! | file/dir deletion fails        | node    | logged, siblings continue |
//! | leaf fully permission-denied   | leaf    | skipped, not deleted      |

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::core::errors::{Result, WipeError};
use crate::logger::jsonl::{ActivityLog, EventType, LogEntry, Severity};
use crate::wiper::overwrite::{PassReport, overwrite_file};
use crate::wiper::pattern::PatternSequence;

/// Engine switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct WipeOptions {
    /// Overwrite only; suppress every deletion. Leaves the tree in
    /// place with file contents replaced by the final pattern byte.
    pub preserve: bool,
}

/// How processing of a single node ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOutcome {
    /// Node was removed from the filesystem.
    Deleted,
    /// Overwrite ran but the node could not be removed.
    DeleteFailed,
    /// Node was left untouched (permission-denied leaf, or preserve
    /// mode).
    Skipped,
}

/// A single per-node failure record.
#[derive(Debug, Clone, Serialize)]
pub struct NodeError {
    pub path: PathBuf,
    pub error: String,
    pub error_code: String,
    pub outcome: NodeOutcome,
}

/// Summary of one top-level wipe invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WipeReport {
    /// Leaf files fully processed (overwritten and, unless preserved,
    /// unlinked).
    pub files_wiped: usize,
    /// Directories removed after their children.
    pub dirs_removed: usize,
    /// Nodes whose deletion failed and were left in place.
    pub delete_failures: usize,
    /// Leaves skipped wholesale (permission denied on every pass).
    pub leaves_skipped: usize,
    /// Overwrite passes that ran to completion, across all leaves.
    pub passes_completed: usize,
    /// Overwrite passes skipped due to per-pass errors.
    pub passes_skipped: usize,
    /// Total bytes written by completed passes.
    pub bytes_overwritten: u64,
    /// Wall-clock duration of the invocation in milliseconds.
    pub duration_ms: u64,
    /// Per-node failure records, in traversal order.
    pub errors: Vec<NodeError>,
    /// Whether deletions were suppressed.
    pub preserve: bool,
}

impl WipeReport {
    /// True when every node was deleted and every pass completed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.passes_skipped == 0
    }
}

/// The wipe engine. One instance carries one pattern sequence, shared
/// unmutated by every node of the invocation.
pub struct Wiper {
    patterns: PatternSequence,
    options: WipeOptions,
    log: Option<ActivityLog>,
}

impl Wiper {
    /// Engine with the given pattern sequence and default options.
    #[must_use]
    pub fn new(patterns: PatternSequence) -> Self {
        Self {
            patterns,
            options: WipeOptions::default(),
            log: None,
        }
    }

    /// Replace the engine options.
    #[must_use]
    pub fn with_options(mut self, options: WipeOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach an activity log.
    #[must_use]
    pub fn with_log(mut self, log: ActivityLog) -> Self {
        self.log = Some(log);
        self
    }

    /// The pattern sequence this engine applies.
    #[must_use]
    pub fn patterns(&self) -> &PatternSequence {
        &self.patterns
    }

    /// Wipe `target`, which the caller has already validated to exist.
    ///
    /// Returns `Err` only for a fatal listing failure; every other
    /// error is contained in the report. The engine trusts the listing
    /// it obtained from each parent and does not re-validate children.
    pub fn wipe(&mut self, target: &Path) -> Result<WipeReport> {
        let start = Instant::now();
        let mut report = WipeReport {
            preserve: self.options.preserve,
            ..WipeReport::default()
        };

        let mut entry = LogEntry::new(EventType::WipeStart, Severity::Info).with_path(target);
        entry.pass_count = Some(self.patterns.len());
        self.log_event(entry);

        let walk = self.wipe_node(target, &mut report);

        #[allow(clippy::cast_possible_truncation)]
        {
            report.duration_ms = start.elapsed().as_millis() as u64;
        }

        match walk {
            Ok(()) => {
                let mut entry =
                    LogEntry::new(EventType::WipeComplete, Severity::Info).with_path(target);
                entry.duration_ms = Some(report.duration_ms);
                entry.details = Some(format!(
                    "files={} dirs={} delete_failures={} passes_skipped={}",
                    report.files_wiped,
                    report.dirs_removed,
                    report.delete_failures,
                    report.passes_skipped
                ));
                self.log_event(entry);
                self.flush_log();
                Ok(report)
            }
            Err(fatal) => {
                self.flush_log();
                Err(fatal)
            }
        }
    }

    /// Process one node: resolve its kind lazily, then dispatch.
    fn wipe_node(&mut self, path: &Path, report: &mut WipeReport) -> Result<()> {
        let meta = match path.symlink_metadata() {
            Ok(meta) => meta,
            Err(e) => {
                // Vanished between listing and operation: skip it.
                let err = WipeError::from_io_kind(path, e);
                self.log_event(
                    LogEntry::new(EventType::LeafSkipped, Severity::Warning)
                        .with_path(path)
                        .with_error(err.code(), err.to_string()),
                );
                report.leaves_skipped += 1;
                report.errors.push(NodeError {
                    path: path.to_path_buf(),
                    error: err.to_string(),
                    error_code: err.code().to_string(),
                    outcome: NodeOutcome::Skipped,
                });
                return Ok(());
            }
        };

        if meta.is_dir() {
            self.wipe_dir(path, report)
        } else {
            self.wipe_leaf(path, meta.file_type().is_symlink(), report);
            Ok(())
        }
    }

    /// Directory: children first, then the directory itself.
    ///
    /// A failed listing is the one fatal condition. An empty but
    /// readable listing is an ordinary state, not a failure; the two
    /// are never conflated.
    fn wipe_dir(&mut self, path: &Path, report: &mut WipeReport) -> Result<()> {
        let entries = fs::read_dir(path).map_err(|e| self.listing_failure(path, &e))?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.listing_failure(path, &e))?;
            children.push(entry.path());
        }

        for child in &children {
            self.wipe_node(child, report)?;
        }

        if self.options.preserve {
            return Ok(());
        }

        match fs::remove_dir(path) {
            Ok(()) => {
                report.dirs_removed += 1;
                self.log_event(LogEntry::new(EventType::DirRemoved, Severity::Info).with_path(path));
            }
            Err(e) => {
                let err = WipeError::from_io_kind(path, e);
                self.record_delete_failure(path, &err, report);
            }
        }
        Ok(())
    }

    /// Leaf: overwrite first (always), then unlink. Deletion is
    /// strictly ordered after the overwrite attempt, even when passes
    /// were skipped.
    ///
    /// A symlink leaf has no content of its own: opening it would
    /// follow the link and rewrite whatever it points at, possibly
    /// outside the wipe target. Links skip the overwrite entirely and
    /// only the link entry is unlinked.
    fn wipe_leaf(&mut self, path: &Path, is_link: bool, report: &mut WipeReport) {
        let pass_count = self.patterns.len();
        let start = Instant::now();
        let passes = if is_link {
            PassReport::default()
        } else {
            overwrite_file(path, &self.patterns, self.log.as_mut())
        };

        report.passes_completed += passes.completed;
        report.passes_skipped += passes.skipped;
        report.bytes_overwritten += passes.bytes_written;

        // Every pass was refused outright: treat the leaf as
        // unauthorized and leave it un-deleted.
        if passes.denied == pass_count && passes.size > 0 {
            let err = WipeError::PermissionDenied {
                path: path.to_path_buf(),
            };
            self.log_event(
                LogEntry::new(EventType::LeafSkipped, Severity::Warning)
                    .with_path(path)
                    .with_error(err.code(), err.to_string()),
            );
            report.leaves_skipped += 1;
            report.errors.push(NodeError {
                path: path.to_path_buf(),
                error: err.to_string(),
                error_code: err.code().to_string(),
                outcome: NodeOutcome::Skipped,
            });
            return;
        }

        if self.options.preserve {
            report.files_wiped += 1;
            return;
        }

        match fs::remove_file(path) {
            Ok(()) => {
                report.files_wiped += 1;
                let mut entry =
                    LogEntry::new(EventType::FileWiped, Severity::Info).with_path(path);
                entry.size = Some(passes.size);
                entry.pass_count = Some(pass_count);
                #[allow(clippy::cast_possible_truncation)]
                {
                    entry.duration_ms = Some(start.elapsed().as_millis() as u64);
                }
                self.log_event(entry);
            }
            Err(e) => {
                let err = WipeError::from_io_kind(path, e);
                self.record_delete_failure(path, &err, report);
            }
        }
    }

    fn record_delete_failure(&mut self, path: &Path, err: &WipeError, report: &mut WipeReport) {
        report.delete_failures += 1;
        self.log_event(
            LogEntry::new(EventType::DeleteFailed, Severity::Warning)
                .with_path(path)
                .with_error(err.code(), err.to_string()),
        );
        report.errors.push(NodeError {
            path: path.to_path_buf(),
            error: err.to_string(),
            error_code: err.code().to_string(),
            outcome: NodeOutcome::DeleteFailed,
        });
    }

    fn listing_failure(&mut self, path: &Path, source: &std::io::Error) -> WipeError {
        let err = WipeError::Listing {
            path: path.to_path_buf(),
            details: source.to_string(),
        };
        self.log_event(
            LogEntry::new(EventType::ListingFailed, Severity::Error)
                .with_path(path)
                .with_error(err.code(), err.to_string()),
        );
        err
    }

    fn log_event(&mut self, entry: LogEntry) {
        if let Some(log) = self.log.as_mut() {
            log.write_entry(&entry);
        }
    }

    fn flush_log(&mut self) {
        if let Some(log) = self.log.as_mut() {
            log.flush();
        }
    }
}
