//! Top-level CLI definition and dispatch.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::json;
use thiserror::Error;

use filewiper::core::config::Config;
use filewiper::core::paths::validate_target;
use filewiper::logger::jsonl::ActivityLog;
use filewiper::wiper::engine::{WipeOptions, WipeReport, Wiper};
use filewiper::wiper::pattern::PatternSequence;

/// Secure file wiper — overwrite contents before deletion.
#[derive(Debug, Parser)]
#[command(
    name = "fwipe",
    author,
    version,
    about = "fwipe - overwrite file contents with byte patterns, then delete",
    long_about = "Overwrites each file with one pass per pattern byte before \
                  unlinking it; directories are wiped recursively, children first.\n\
                  NOT a disk-level sanitizer: does not meet DoD 5220.22 or NIST 800-88.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// File or directory to wipe.
    #[arg(value_name = "PATH", required_unless_present = "completions")]
    path: Option<String>,
    /// Overwrite pattern string; its UTF-8 bytes become the pass
    /// sequence (one full rewrite per byte). Defaults to a built-in
    /// three-byte sequence.
    #[arg(value_name = "PATTERN")]
    pattern: Option<String>,
    /// Skip interactive confirmation prompts.
    #[arg(short, long)]
    yes: bool,
    /// Overwrite only; leave files and directories in place.
    #[arg(long)]
    no_delete: bool,
    /// Write a JSONL activity log to this path.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Override config file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Emit the final report as JSON.
    #[arg(long)]
    json: bool,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
    /// Generate shell completions and exit.
    #[arg(long, value_name = "SHELL")]
    completions: Option<CompletionShell>,
}

/// CLI error type. Every failure maps to exit code 1: malformed
/// invocation, target validation, config parse, or a fatal
/// listing failure mid-run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input.
    #[error("{0}")]
    User(String),
    /// Engine or environment failure.
    #[error("{0}")]
    Runtime(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract: completed operations exit 0 even
    /// when individual nodes were skipped; everything else exits 1.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) | Self::Runtime(_) | Self::Json(_) | Self::Io(_) => 1,
        }
    }
}

/// Dispatch the CLI.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        let binary_name = command.get_name().to_string();
        generate(shell, &mut command, binary_name, &mut io::stdout());
        return Ok(());
    }

    let raw_path = cli.path.as_deref().unwrap_or_default();

    let config =
        Config::load(cli.config.as_deref()).map_err(|e| CliError::User(e.to_string()))?;

    let target = validate_target(raw_path).map_err(|e| CliError::User(e.to_string()))?;

    let patterns = build_patterns(cli, &config)?;

    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();

    if target.is_dir() && !cli.yes && interactive {
        match confirm_directory(&target)? {
            Confirmation::Proceed => {}
            Confirmation::Declined => {
                println!("Response is not 'yes'. Exiting.");
                return Ok(());
            }
        }
    }

    if patterns.is_long(config.wipe.pattern_warn_len) {
        let warning = format!(
            "WARNING: the supplied pattern has {} bytes (more than {}), \
             which may significantly increase run time.",
            patterns.len(),
            config.wipe.pattern_warn_len
        );
        eprintln!("{}", warning.yellow());
        if !cli.yes && interactive {
            match confirm_long_pattern()? {
                Confirmation::Proceed => {}
                Confirmation::Declined => {
                    println!("Response is not 'y'. Exiting.");
                    return Ok(());
                }
            }
        }
    }

    let mut wiper = Wiper::new(patterns).with_options(WipeOptions {
        preserve: cli.no_delete,
    });

    let log_path = cli.log_file.clone().or_else(|| config.log.path.clone());
    if let Some(path) = log_path {
        wiper = wiper.with_log(ActivityLog::open(path, &config.log));
    }

    if !cli.json {
        println!("Wiping {} ...", target.display());
    }

    let report = wiper
        .wipe(&target)
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    if cli.json {
        emit_json_report(&report)?;
    } else {
        print_summary(&report);
    }

    Ok(())
}

enum Confirmation {
    Proceed,
    Declined,
}

/// Directory targets need an explicit affirmative "yes" on a terminal.
/// An empty response is an error (exit 1), any other non-"yes" answer
/// is a clean abort (exit 0).
fn confirm_directory(target: &std::path::Path) -> Result<Confirmation, CliError> {
    print!(
        "Warning: {} is a directory. The directory, and all of the files it \
         contains, will be wiped. Do you wish to continue? (yes/no): ",
        target.display()
    );
    io::stdout().flush()?;

    let answer = read_trimmed_line()?;
    if answer.is_empty() {
        return Err(CliError::User("empty response".to_string()));
    }
    if answer.eq_ignore_ascii_case("yes") {
        Ok(Confirmation::Proceed)
    } else {
        Ok(Confirmation::Declined)
    }
}

fn confirm_long_pattern() -> Result<Confirmation, CliError> {
    print!("Do you wish to continue? (y/n): ");
    io::stdout().flush()?;

    let answer = read_trimmed_line()?;
    if answer.eq_ignore_ascii_case("y") {
        Ok(Confirmation::Proceed)
    } else {
        Ok(Confirmation::Declined)
    }
}

fn read_trimmed_line() -> Result<String, CliError> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Pick the pass sequence: CLI argument wins, then the configured
/// default pattern string, then the built-in bytes.
fn build_patterns(cli: &Cli, config: &Config) -> Result<PatternSequence, CliError> {
    if let Some(raw) = &cli.pattern {
        return raw
            .parse::<PatternSequence>()
            .map_err(|e| CliError::User(e.to_string()));
    }
    if !config.wipe.pattern.is_empty() {
        return config
            .wipe
            .pattern
            .parse::<PatternSequence>()
            .map_err(|e| CliError::User(e.to_string()));
    }
    Ok(PatternSequence::default())
}

fn print_summary(report: &WipeReport) {
    let headline = if report.is_clean() {
        "done".green().to_string()
    } else {
        "done with skips".yellow().to_string()
    };
    println!("...{headline}");
    println!(
        "  files wiped: {}  dirs removed: {}  bytes overwritten: {}",
        report.files_wiped,
        report.dirs_removed,
        format_bytes(report.bytes_overwritten)
    );
    if report.preserve {
        println!("  (no-delete mode: nothing was removed)");
    }
    if report.passes_skipped > 0 || report.delete_failures > 0 || report.leaves_skipped > 0 {
        println!(
            "  passes skipped: {}  delete failures: {}  leaves skipped: {}",
            report.passes_skipped, report.delete_failures, report.leaves_skipped
        );
        for err in &report.errors {
            println!(
                "    {} {} ({})",
                "skip".yellow(),
                err.path.display(),
                err.error_code
            );
        }
    }
}

fn emit_json_report(report: &WipeReport) -> Result<(), CliError> {
    let payload = json!({
        "ok": report.is_clean(),
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} {}", UNITS[0])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
