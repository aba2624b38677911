//! Shared harness for end-to-end tests that drive the `fwipe` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use serde_json::Value;

/// Captured output of one `fwipe` invocation.
pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

impl CmdResult {
    /// Process exit code; -1 when the process died on a signal.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    /// Parse stdout as the `--json` report payload.
    pub fn json_report(&self) -> Value {
        serde_json::from_str(&self.stdout).unwrap_or_else(|e| {
            panic!("stdout is not JSON ({e}); log: {}", self.log_path.display())
        })
    }
}

/// Run `fwipe` with stdin closed, so the run is a batch context and no
/// confirmation prompt can block. A per-case transcript is written for
/// post-mortem inspection when an assertion fails.
pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    let log_dir = std::env::temp_dir().join("fwipe-test-logs");
    fs::create_dir_all(&log_dir).expect("create test transcript dir");
    let log_path = log_dir.join(format!("{case_name}-{}.log", std::process::id()));

    let output = Command::new(env!("CARGO_BIN_EXE_fwipe"))
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("execute fwipe");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let transcript = format!(
        "case={case_name}\nargs={args:?}\nstatus={}\n\
         --- stdout ---\n{stdout}\n--- stderr ---\n{stderr}\n",
        output.status
    );
    fs::write(&log_path, transcript).expect("write test transcript");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

/// Lay down a fixture tree: each entry is a relative path and its
/// content, with intermediate directories created as needed.
pub fn fixture_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dir");
        }
        fs::write(&path, content).expect("write fixture file");
    }
}

/// Probe whether mode bits actually deny this process. Privileged
/// users (root, CAP_DAC_OVERRIDE) ignore them, which would make the
/// denial-based tests vacuous.
#[cfg(unix)]
pub fn permission_bits_enforced() -> bool {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("probe tempdir");
    let probe_dir = dir.path().join("probe");
    fs::create_dir(&probe_dir).expect("probe dir");
    let victim = probe_dir.join("victim");
    fs::write(&victim, "x").expect("probe file");
    fs::set_permissions(&probe_dir, fs::Permissions::from_mode(0o555)).expect("probe chmod");
    let enforced = fs::remove_file(&victim).is_err();
    fs::set_permissions(&probe_dir, fs::Permissions::from_mode(0o755)).expect("probe restore");
    enforced
}
