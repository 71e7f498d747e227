use dypl_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Log to the state-dir file; fall back to stderr if it cannot be created.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", err);
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("dypl error: {:#}", err);
        std::process::exit(1);
    }
}
