//! CLI for the DYPL share-link downloader.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dypl_core::config::{self, DyplConfig};
use dypl_core::library::LibraryLayout;
use std::path::PathBuf;

use commands::{run_download, run_fetch, run_parse, run_playlist};

/// Top-level CLI for the DYPL share-link downloader.
#[derive(Debug, Parser)]
#[command(name = "dypl")]
#[command(about = "DYPL: save shared short videos and covers into a local playlist", long_about = None)]
pub struct Cli {
    /// Library folder holding MP4/, albumArt/ and playlist.json
    /// (default: `library_dir` from config, else the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub library_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Find the link in a share text and read the item's metadata.
    Parse {
        /// Share text as copied from the app (quote it).
        text: String,

        /// Also write the parsed metadata as JSON to FILE for `download`.
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
    },

    /// Download video and cover from a saved parse result.
    Download {
        /// JSON file written by `parse --save`.
        #[arg(long, value_name = "FILE")]
        details: PathBuf,

        /// Override the author used for the file name and playlist.
        #[arg(long)]
        author: Option<String>,

        /// Override the title used for the file name and playlist.
        #[arg(long)]
        title: Option<String>,
    },

    /// Parse a share text and download the item in one go.
    Fetch {
        /// Share text as copied from the app (quote it).
        text: String,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        title: Option<String>,
    },

    /// List the entries of the library's playlist.
    Playlist,
}

/// Library root: flag, then config, then the current directory.
fn resolve_layout(flag: Option<PathBuf>, cfg: &DyplConfig) -> Result<LibraryLayout> {
    match flag.or_else(|| cfg.library_dir.clone()) {
        Some(dir) => Ok(LibraryLayout::new(dir)),
        None => LibraryLayout::current_dir().context("cannot determine current directory"),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let layout = resolve_layout(cli.library_dir, &cfg)?;
        tracing::debug!("library root: {}", layout.root.display());

        match cli.command {
            CliCommand::Parse { text, save } => run_parse(&cfg, layout, &text, save.as_deref())?,
            CliCommand::Download {
                details,
                author,
                title,
            } => run_download(&cfg, layout, &details, author, title)?,
            CliCommand::Fetch {
                text,
                author,
                title,
            } => run_fetch(&cfg, layout, &text, author, title)?,
            CliCommand::Playlist => run_playlist(&layout)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
