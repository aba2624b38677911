//! Multi-pass overwrite of a single leaf file.
//!
//! One pass = one full rewrite of the file's byte range with a single
//! fill byte. The file's size is sampled once before the first pass
//! and every pass writes exactly that many bytes, so the file neither
//! grows nor shrinks between passes. Each pass reopens the file at
//! offset zero without truncation; the handle is scoped to the pass
//! and released on every exit path.
//!
//! Failure policy is best-effort per pass: an error skips the pass,
//! is logged with its category, and the remaining passes are still
//! attempted. Nothing here propagates to the traversal.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::core::errors::WipeError;
use crate::logger::jsonl::{ActivityLog, EventType, LogEntry, Severity};
use crate::wiper::pattern::PatternSequence;

/// Fill-buffer size for a single write call.
const CHUNK_SIZE: usize = 64 * 1024;

/// What happened across all passes of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Passes that rewrote the full byte range.
    pub completed: usize,
    /// Passes skipped because of an error.
    pub skipped: usize,
    /// Of the skipped passes, how many were permission failures. The
    /// traversal uses this to convert a fully-denied leaf into a skip
    /// rather than attempting deletion.
    pub denied: usize,
    /// Total bytes written across completed passes.
    pub bytes_written: u64,
    /// File size observed before the first pass.
    pub size: u64,
}

impl PassReport {
    /// True when every pass in the sequence ran to completion.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped == 0
    }
}

/// Overwrite `path` once per pattern byte, in sequence order.
///
/// A zero-length file has nothing to fill: the report comes back with
/// zero completed passes and no errors, and the caller proceeds
/// straight to deletion.
pub fn overwrite_file(
    path: &Path,
    patterns: &PatternSequence,
    mut log: Option<&mut ActivityLog>,
) -> PassReport {
    let mut report = PassReport::default();

    let size = match path.metadata() {
        Ok(meta) => meta.len(),
        Err(e) => {
            // Cannot even stat the file: every pass is skipped.
            let err = WipeError::from_io_kind(path, e);
            report.skipped = patterns.len();
            if matches!(err, WipeError::PermissionDenied { .. }) {
                report.denied = patterns.len();
            }
            for (index, byte) in patterns.iter().enumerate() {
                log_pass_skip(log.as_deref_mut(), path, index, byte, &err);
            }
            return report;
        }
    };
    report.size = size;
    if size == 0 {
        return report;
    }

    for (index, byte) in patterns.iter().enumerate() {
        match run_pass(path, byte, size) {
            Ok(()) => {
                report.completed += 1;
                report.bytes_written += size;
            }
            Err(err) => {
                report.skipped += 1;
                if matches!(err, WipeError::PermissionDenied { .. }) {
                    report.denied += 1;
                }
                log_pass_skip(log.as_deref_mut(), path, index, byte, &err);
            }
        }
    }

    report
}

/// One pass: open at offset zero without truncating, write `size`
/// copies of `byte`, flush. The handle drops on every exit path.
fn run_pass(path: &Path, byte: u8, size: u64) -> Result<(), WipeError> {
    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|e| WipeError::from_io_kind(path, e))?;

    let chunk = vec![byte; CHUNK_SIZE.min(usize::try_from(size).unwrap_or(CHUNK_SIZE))];
    let mut remaining = size;
    while remaining > 0 {
        let take = usize::try_from(remaining.min(chunk.len() as u64)).unwrap_or(chunk.len());
        file.write_all(&chunk[..take])
            .map_err(|e| WipeError::from_io_kind(path, e))?;
        remaining -= take as u64;
    }
    file.flush().map_err(|e| WipeError::from_io_kind(path, e))?;
    Ok(())
}

fn log_pass_skip(
    log: Option<&mut ActivityLog>,
    path: &Path,
    index: usize,
    byte: u8,
    err: &WipeError,
) {
    if let Some(log) = log {
        let mut entry = LogEntry::new(EventType::PassSkipped, Severity::Warning)
            .with_path(path)
            .with_error(err.code(), err.to_string());
        entry.pass_index = Some(index);
        entry.pass_byte = Some(byte);
        log.write_entry(&entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use proptest::prelude::*;

    #[test]
    fn final_content_is_last_pattern_byte() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("victim.txt");
        fs::write(&path, "Overwrite me!").unwrap();

        let patterns: PatternSequence = "overwriters".parse().unwrap();
        let report = overwrite_file(&path, &patterns, None);

        assert!(report.is_clean());
        assert_eq!(report.completed, 11);
        assert_eq!(report.size, 13);

        let content = fs::read(&path).unwrap();
        assert_eq!(content.len(), 13);
        assert!(content.iter().all(|&b| b == b's'));
    }

    #[test]
    fn zero_length_file_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, "").unwrap();

        let report = overwrite_file(&path, &PatternSequence::default(), None);
        assert!(report.is_clean());
        assert_eq!(report.completed, 0);
        assert_eq!(report.size, 0);
        assert!(path.exists());
    }

    #[test]
    fn size_is_fixed_across_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixed.bin");
        fs::write(&path, vec![0xAA; 4097]).unwrap();

        let report = overwrite_file(&path, &PatternSequence::default(), None);
        assert_eq!(report.size, 4097);
        assert_eq!(fs::metadata(&path).unwrap().len(), 4097);
        assert_eq!(report.bytes_written, 3 * 4097);
    }

    #[test]
    fn missing_file_skips_every_pass() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone");

        let patterns: PatternSequence = "abc".parse().unwrap();
        let report = overwrite_file(&path, &patterns, None);
        assert_eq!(report.completed, 0);
        assert_eq!(report.skipped, 3);
    }

    #[test]
    fn large_file_spans_multiple_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        let len = CHUNK_SIZE * 2 + 17;
        fs::write(&path, vec![0x11; len]).unwrap();

        let patterns = PatternSequence::from_bytes(vec![0x5A]).unwrap();
        let report = overwrite_file(&path, &patterns, None);

        assert!(report.is_clean());
        let content = fs::read(&path).unwrap();
        assert_eq!(content.len(), len);
        assert!(content.iter().all(|&b| b == 0x5A));
    }

    #[cfg(unix)]
    #[test]
    fn readonly_file_skips_passes_without_panicking() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.txt");
        fs::write(&path, "secret").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();

        let patterns: PatternSequence = "ab".parse().unwrap();
        let report = overwrite_file(&path, &patterns, None);

        // Root can open read-only files for writing; everyone else
        // skips both passes with a permission error.
        assert_eq!(report.completed + report.skipped, 2);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn any_content_ends_as_last_byte(
            content in proptest::collection::vec(any::<u8>(), 1..2048),
            pattern in proptest::collection::vec(any::<u8>(), 1..5),
        ) {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("prop.bin");
            fs::write(&path, &content).unwrap();

            let last = *pattern.last().unwrap();
            let patterns = PatternSequence::from_bytes(pattern).unwrap();
            let report = overwrite_file(&path, &patterns, None);

            prop_assert!(report.is_clean());
            prop_assert_eq!(report.completed, patterns.len());
            let written = fs::read(&path).unwrap();
            prop_assert_eq!(written.len(), content.len());
            prop_assert!(written.iter().all(|&b| b == last));
        }
    }
}
