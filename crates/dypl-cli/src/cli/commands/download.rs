//! `dypl download` – fetch assets for a previously saved parse result.

use anyhow::{Context, Result};
use dypl_core::config::DyplConfig;
use dypl_core::detail::VideoDetails;
use dypl_core::library::LibraryLayout;
use std::path::Path;

use super::session::{finish_report, request_from, Session};

pub fn run_download(
    cfg: &DyplConfig,
    layout: LibraryLayout,
    details_path: &Path,
    author: Option<String>,
    title: Option<String>,
) -> Result<()> {
    let data = std::fs::read_to_string(details_path)
        .with_context(|| format!("failed to read {}", details_path.display()))?;
    let details: VideoDetails = serde_json::from_str(&data)
        .with_context(|| format!("{} is not a saved parse result", details_path.display()))?;

    let session = Session::new(cfg, layout);
    let report = session.download(request_from(details, author, title))?;
    finish_report(&report)
}
