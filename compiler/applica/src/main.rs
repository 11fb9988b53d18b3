//! The executable of the constraint applicability checker.

use std::process::ExitCode;

use applica_driver::Arguments;
use clap::Parser;

fn main() -> ExitCode {
    let arguments = Arguments::parse();

    let default_filter = if arguments.verbose { "trace" } else { "warn" };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .init();

    applica_driver::run(arguments)
}
