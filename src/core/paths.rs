//! Target validation and shared path manipulation utilities.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::core::errors::{Result, WipeError};

/// Validate a user-supplied wipe target.
///
/// "Valid" means the supplied string is not empty, not composed
/// entirely of whitespace, and names a node that exists right now.
/// This is the single up-front existence check: the engine trusts the
/// directory listings it obtains from its parent thereafter and does
/// not re-validate on every recursive step.
pub fn validate_target(raw: &str) -> Result<PathBuf> {
    if raw.trim().is_empty() {
        return Err(WipeError::InvalidTarget {
            details: "path is empty or blank".to_string(),
        });
    }
    let resolved = resolve_absolute_path(Path::new(raw));
    if resolved.symlink_metadata().is_err() {
        return Err(WipeError::InvalidTarget {
            details: format!("no such file or directory: {}", resolved.display()),
        });
    }
    Ok(resolved)
}

/// Resolve a path to an absolute, normalized path.
///
/// If `fs::canonicalize` succeeds (path exists), it is used to resolve
/// symlinks and normalize components. If it fails, the path is made
/// absolute relative to CWD and `..`/`.` components are resolved
/// syntactically.
pub fn resolve_absolute_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };

    // Symlink targets are wiped as links, never followed, so only
    // canonicalize non-link paths.
    if !absolute
        .symlink_metadata()
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
    {
        if let Ok(canonical) = std::fs::canonicalize(&absolute) {
            return canonical;
        }
    }

    normalize_syntactic(&absolute)
}

fn normalize_syntactic(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(_) => {
                components.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                }
            }
        }
    }
    components.into_iter().collect()
}
