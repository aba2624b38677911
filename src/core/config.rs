//! Configuration: optional TOML file with smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, WipeError};

/// Full fwipe configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub wipe: WipeSection,
    pub log: LogSection,
}

/// Defaults for the overwrite procedure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WipeSection {
    /// Default overwrite pattern string; its UTF-8 bytes become the
    /// pass sequence. Empty string means the built-in byte sequence.
    pub pattern: String,
    /// Pattern lengths above this trigger the run-time warning.
    pub pattern_warn_len: usize,
}

/// Activity-log settings (JSONL).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogSection {
    /// Log file path. `None` disables the activity log unless the CLI
    /// supplies `--log-file`.
    pub path: Option<PathBuf>,
    /// Maximum log size before rotation (bytes).
    pub max_size_bytes: u64,
    /// Number of rotated files to keep.
    pub max_rotated_files: u32,
}

impl Default for WipeSection {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            pattern_warn_len: 3,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            path: None,
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
        }
    }
}

impl Config {
    /// Default configuration path: `~/.config/fwipe/config.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home = env::var_os("HOME").map_or_else(|| PathBuf::from("/tmp"), PathBuf::from);
        home.join(".config").join("fwipe").join("config.toml")
    }

    /// Load config from the default or an explicit path.
    ///
    /// A missing file is only an error when the path was explicit;
    /// otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let explicit = path.is_some();

        let cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| WipeError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if explicit {
            return Err(WipeError::ConfigParse {
                context: "load",
                details: format!("config file not found: {}", path_buf.display()),
            });
        } else {
            Self::default()
        };

        cfg.validate()?;
        Ok(cfg)
    }

    /// Sanity-check values that would otherwise misbehave at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.wipe.pattern_warn_len == 0 {
            return Err(WipeError::ConfigParse {
                context: "wipe.pattern_warn_len",
                details: "must be at least 1".to_string(),
            });
        }
        if self.log.max_size_bytes == 0 {
            return Err(WipeError::ConfigParse {
                context: "log.max_size_bytes",
                details: "must be nonzero".to_string(),
            });
        }
        if self.log.max_rotated_files == 0 {
            return Err(WipeError::ConfigParse {
                context: "log.max_rotated_files",
                details: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
