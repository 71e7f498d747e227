//! Playlist state: a JSON array of entries consumed by the downstream player.
//!
//! Every update is read-modify-write of the whole file. Entries already on
//! disk are carried through as raw JSON so fields this tool does not know
//! about survive a rewrite. There is no locking; one running instance is
//! assumed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::log_sink::LogSink;
use crate::naming::normalize_separators;
use crate::storage;

pub const ENTRY_TYPE_VIDEO: &str = "video";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    pub entry_type: String,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(rename = "albumArt", default)]
    pub album_art: String,
    #[serde(default)]
    pub lyrics: String,
}

fn default_entry_type() -> String {
    ENTRY_TYPE_VIDEO.to_string()
}

impl PlaylistEntry {
    /// New video entry; `src` and `albumArt` get `/` separators.
    pub fn new(
        title: &str,
        artist: &str,
        video_path: &str,
        cover_path: &str,
        description: Option<&str>,
    ) -> Self {
        Self {
            entry_type: default_entry_type(),
            src: normalize_separators(video_path),
            title: title.to_string(),
            artist: artist.to_string(),
            album_art: normalize_separators(cover_path),
            lyrics: description.unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Entry written; carries the new playlist length.
    Appended { total: usize },
    /// An entry with the same `src` exists; file untouched.
    Duplicate,
}

/// Reads the raw entries. Absent, unreadable, or non-array files yield an
/// empty list plus a warning on the sink; they are never fatal.
fn load_raw(path: &Path, sink: &dyn LogSink) -> Vec<Value> {
    if !path.exists() {
        return Vec::new();
    }
    let data = match fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) => {
            sink.warn(&format!(
                "Could not read {} ({}); starting a new list.",
                path.display(),
                e
            ));
            return Vec::new();
        }
    };
    match serde_json::from_str::<Value>(&data) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            sink.warn(&format!(
                "{} is not a JSON array; starting a new list.",
                path.display()
            ));
            Vec::new()
        }
        Err(e) => {
            sink.warn(&format!(
                "Could not parse {} ({}); starting a new list.",
                path.display(),
                e
            ));
            Vec::new()
        }
    }
}

/// Appends `entry` unless an entry with the same `src` already exists.
///
/// The whole array is rewritten, pretty-printed with non-ASCII text kept
/// verbatim. A failed write is returned as an error; nothing is retried.
pub fn append_entry(path: &Path, entry: &PlaylistEntry, sink: &dyn LogSink) -> Result<AppendOutcome> {
    sink.info(&format!("Updating playlist {}", path.display()));
    let mut items = load_raw(path, sink);

    let duplicate = items
        .iter()
        .any(|item| item.get("src").and_then(Value::as_str) == Some(entry.src.as_str()));
    if duplicate {
        sink.info(&format!(
            "Entry '{}' is already in the playlist, skipping.",
            entry.src
        ));
        return Ok(AppendOutcome::Duplicate);
    }

    items.push(serde_json::to_value(entry)?);
    let json = serde_json::to_string_pretty(&items)?;
    if let Err(e) = storage::write_replace(path, json.as_bytes()) {
        sink.error(&format!("Failed to write {}: {}", path.display(), e));
        return Err(e);
    }
    sink.info(&format!("Added '{}' to {}", entry.src, path.display()));
    Ok(AppendOutcome::Appended { total: items.len() })
}

/// Entries for display. Items that are not entry-shaped are skipped.
pub fn load_entries(path: &Path, sink: &dyn LogSink) -> Vec<PlaylistEntry> {
    load_raw(path, sink)
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}
