//! Tracing init for the `dypl` binary: file under the XDG state dir, or stderr.
//!
//! Pipeline components report through a `LogSink` (see `log_sink`); this module
//! only wires the process-wide `tracing` subscriber those sinks forward to.

use anyhow::Result;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "dypl.log";

/// Used when `RUST_LOG` is unset or invalid. Chrome's DevTools chatter stays quiet.
const DEFAULT_FILTER: &str = "info,dypl=debug,dypl_core=debug,headless_chrome=warn";

/// Per-event writer: a handle on the shared log file, or stderr when the
/// handle cannot be duplicated.
enum LogWriter {
    File(File),
    Stderr,
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogWriter::File(f) => f.write(buf),
            LogWriter::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogWriter::File(f) => f.flush(),
            LogWriter::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct SharedFile(File);

impl<'a> MakeWriter<'a> for SharedFile {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(f) => LogWriter::File(f),
            Err(_) => LogWriter::Stderr,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Directory holding `dypl.log` (`$XDG_STATE_HOME/dypl`).
pub fn log_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dypl")?;
    Ok(xdg_dirs.get_state_home())
}

/// Append-mode logging to `~/.local/state/dypl/dypl.log`.
///
/// Returns Err when the file cannot be opened; callers fall back to
/// `init_logging_stderr`.
pub fn init_logging() -> Result<()> {
    let dir = log_dir()?;
    fs::create_dir_all(&dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(BoxMakeWriter::new(SharedFile(file)))
        .with_ansi(false)
        .with_thread_names(true)
        .init();

    tracing::info!("dypl {} logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    Ok(())
}

/// Stderr-only logging, for when the state dir is unusable.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_thread_names(true)
        .init();
}
