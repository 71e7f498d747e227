//! `dypl fetch` – parse and download in one command.

use anyhow::Result;
use dypl_core::config::DyplConfig;
use dypl_core::library::LibraryLayout;

use super::session::{finish_report, print_details, request_from, Session};

pub fn run_fetch(
    cfg: &DyplConfig,
    layout: LibraryLayout,
    text: &str,
    author: Option<String>,
    title: Option<String>,
) -> Result<()> {
    let session = Session::new(cfg, layout);
    let details = session.parse(text)?;
    print_details(&details);
    let report = session.download(request_from(details, author, title))?;
    finish_report(&report)
}
