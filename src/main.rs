#![forbid(unsafe_code)]

//! fwipe — secure file-wipe CLI entry point.

use clap::Parser;
use clap::error::ErrorKind;

mod cli_app;

fn main() {
    // Malformed invocations exit 1; --help/--version stay 0.
    let args = match cli_app::Cli::try_parse() {
        Ok(args) => args,
        Err(e)
            if matches!(
                e.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = e.print();
            std::process::exit(0);
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if let Err(e) = cli_app::run(&args) {
        eprintln!("fwipe: {e}");
        std::process::exit(e.exit_code());
    }
}
