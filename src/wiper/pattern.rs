//! Overwrite pattern sequences.
//!
//! A pattern sequence is an ordered, non-empty list of fill bytes.
//! Each byte is one full overwrite pass over a leaf file, applied in
//! sequence order; the last byte is the content left on disk
//! immediately before the file is unlinked.

use std::fmt;
use std::str::FromStr;

use crate::core::errors::{Result, WipeError};

/// Built-in pass bytes used when the caller supplies none:
/// max-signed-byte, zero, max-signed-byte.
pub const DEFAULT_PATTERN: [u8; 3] = [0x7F, 0x00, 0x7F];

/// Pattern lengths above this are worth a run-time warning, since run
/// time is linear in pattern length, file size, and node count.
pub const WARN_LENGTH: usize = 3;

/// An ordered, non-empty sequence of overwrite fill bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSequence {
    bytes: Vec<u8>,
}

impl PatternSequence {
    /// Build a sequence from raw bytes; empty input is rejected since
    /// a zero-pass overwrite is undefined.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(WipeError::InvalidPattern {
                details: "pattern sequence must contain at least one byte".to_string(),
            });
        }
        Ok(Self { bytes })
    }

    /// Number of overwrite passes this sequence implies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// A pattern sequence is never empty; kept for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the fill bytes in pass order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.bytes.iter().copied()
    }

    /// The final pass byte: what every byte of a wiped file equals
    /// right before deletion.
    #[must_use]
    pub fn last(&self) -> u8 {
        *self.bytes.last().unwrap_or(&0)
    }

    /// Whether this sequence exceeds `warn_len` and deserves the
    /// run-time warning.
    #[must_use]
    pub fn is_long(&self, warn_len: usize) -> bool {
        self.bytes.len() > warn_len
    }
}

impl Default for PatternSequence {
    fn default() -> Self {
        Self {
            bytes: DEFAULT_PATTERN.to_vec(),
        }
    }
}

impl FromStr for PatternSequence {
    type Err = WipeError;

    /// The UTF-8 bytes of the string become the pass sequence.
    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(s.as_bytes().to_vec())
    }
}

impl fmt::Display for PatternSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex: Vec<String> = self.bytes.iter().map(|b| format!("{b:02x}")).collect();
        write!(f, "[{}]", hex.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_three_nontrivial_passes() {
        let p = PatternSequence::default();
        assert_eq!(p.len(), 3);
        assert_eq!(p.last(), 0x7F);
        let bytes: Vec<u8> = p.iter().collect();
        assert_eq!(bytes, vec![0x7F, 0x00, 0x7F]);
    }

    #[test]
    fn rejects_empty_byte_vector() {
        let err = PatternSequence::from_bytes(Vec::new()).unwrap_err();
        assert_eq!(err.code(), "FWP-1003");
    }

    #[test]
    fn rejects_empty_string() {
        let err = "".parse::<PatternSequence>().unwrap_err();
        assert_eq!(err.code(), "FWP-1003");
    }

    #[test]
    fn string_bytes_become_passes() {
        let p: PatternSequence = "overwriters".parse().unwrap();
        assert_eq!(p.len(), 11);
        assert_eq!(p.last(), b's');
    }

    #[test]
    fn long_detection_uses_threshold() {
        let short: PatternSequence = "abc".parse().unwrap();
        let long: PatternSequence = "abcd".parse().unwrap();
        assert!(!short.is_long(WARN_LENGTH));
        assert!(long.is_long(WARN_LENGTH));
        assert!(!long.is_long(10));
    }

    #[test]
    fn display_is_hex() {
        let p = PatternSequence::from_bytes(vec![0x00, 0xFF]).unwrap();
        assert_eq!(p.to_string(), "[00 ff]");
    }

    proptest! {
        #[test]
        fn any_nonempty_bytes_round_trip(bytes in proptest::collection::vec(any::<u8>(), 1..64)) {
            let p = PatternSequence::from_bytes(bytes.clone()).unwrap();
            prop_assert_eq!(p.len(), bytes.len());
            prop_assert_eq!(p.last(), *bytes.last().unwrap());
            let collected: Vec<u8> = p.iter().collect();
            prop_assert_eq!(collected, bytes);
        }
    }
}
