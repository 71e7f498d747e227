//! Error taxonomy for the parse and download pipeline.
//!
//! Every failure a worker can report back to the presentation layer is a
//! `PipelineError`. A malformed playlist file is deliberately absent: it is
//! recovered in place and only surfaces as a warning on the log sink.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::downloader::AssetKind;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The share text did not contain an http(s) URL.
    #[error("no URL found in the supplied text")]
    NoLinkFound,

    /// A required field was empty; raised before any network activity.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// The browser could not be launched or a tab could not be opened.
    #[error("browser error: {0}")]
    Browser(String),

    /// Navigation exceeded its budget and the detail response never arrived.
    #[error("navigation timed out after {0:?} without capturing the detail response")]
    InterceptionTimeout(Duration),

    /// The detail response was captured but its body is not valid JSON.
    #[error("detail response from {url} is not valid JSON: {reason}")]
    InterceptionParse { url: String, reason: String },

    /// Navigation failed outright before the detail response was captured.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// The page settled without ever issuing a matching detail request.
    #[error("page loaded but no detail response was captured")]
    DetailNotCaptured,

    /// The server answered a download with a non-success status.
    #[error("{asset} download returned HTTP {status}")]
    DownloadHttp { asset: AssetKind, status: u32 },

    /// Connection, timeout or protocol failure during a download.
    #[error("{asset} download failed: {reason}")]
    DownloadTransport { asset: AssetKind, reason: String },

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A pipeline operation panicked; caught at the worker boundary.
    #[error("worker panicked: {0}")]
    WorkerPanicked(String),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
