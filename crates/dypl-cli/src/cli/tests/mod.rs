//! CLI tests: argument parsing, layout resolution, handlers.

use super::{resolve_layout, Cli};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

mod commands;
mod run;
