//! `dypl parse` – read an item's metadata from a share text.

use anyhow::{Context, Result};
use dypl_core::config::DyplConfig;
use dypl_core::library::LibraryLayout;
use std::path::Path;

use super::session::{print_details, Session};

pub fn run_parse(cfg: &DyplConfig, layout: LibraryLayout, text: &str, save: Option<&Path>) -> Result<()> {
    let session = Session::new(cfg, layout);
    let details = session.parse(text)?;
    print_details(&details);
    if let Some(path) = save {
        let json = serde_json::to_string_pretty(&details)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("saved:  {}", path.display());
    }
    Ok(())
}
