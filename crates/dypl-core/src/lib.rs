//! DYPL core: share link → detail payload → video, cover and playlist entry.

pub mod config;
pub mod logging;

pub mod detail;
pub mod downloader;
mod error;
pub mod intercept;
pub mod library;
pub mod link;
pub mod log_sink;
pub mod naming;
pub mod pipeline;
pub mod playlist;
pub mod storage;
pub mod worker;

pub use error::{PipelineError, Result};
