//! `dypl playlist` – list the library's playlist entries.

use anyhow::Result;
use dypl_core::library::LibraryLayout;
use dypl_core::log_sink::TracingSink;
use dypl_core::playlist::load_entries;

pub fn run_playlist(layout: &LibraryLayout) -> Result<()> {
    let path = layout.playlist_path();
    let entries = load_entries(&path, &TracingSink);
    if entries.is_empty() {
        println!("No entries in {}.", path.display());
        return Ok(());
    }
    println!("{:<4} {:<20} {:<30} {}", "#", "ARTIST", "TITLE", "SRC");
    for (i, e) in entries.iter().enumerate() {
        println!("{:<4} {:<20} {:<30} {}", i + 1, e.artist, e.title, e.src);
    }
    Ok(())
}
