//! CLI command handlers, one file per subcommand.

mod download;
mod fetch;
mod parse;
mod playlist;
mod session;

pub use download::run_download;
pub use fetch::run_fetch;
pub use parse::run_parse;
pub use playlist::run_playlist;
