//! `rw-corpus` binary entry point.

use clap::Parser;

use rw_core::cli::{self, Cli};
use rw_core::logging;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.verbosity());
    cli::run(&cli).into()
}
