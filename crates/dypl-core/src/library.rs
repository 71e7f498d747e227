//! On-disk layout of a library: asset folders and the playlist file.

use std::path::{Path, PathBuf};

pub const VIDEO_DIR: &str = "MP4";
pub const COVER_DIR: &str = "albumArt";
pub const PLAYLIST_FILE: &str = "playlist.json";

pub const VIDEO_EXT: &str = "mp4";
pub const COVER_EXT: &str = "jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLayout {
    pub root: PathBuf,
}

impl LibraryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library rooted at the process working directory.
    pub fn current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn video_dir(&self) -> PathBuf {
        self.root.join(VIDEO_DIR)
    }

    pub fn cover_dir(&self) -> PathBuf {
        self.root.join(COVER_DIR)
    }

    pub fn playlist_path(&self) -> PathBuf {
        self.root.join(PLAYLIST_FILE)
    }

    /// Video path relative to the root, as stored in the playlist.
    pub fn relative_video_path(stem: &str) -> PathBuf {
        Path::new(VIDEO_DIR).join(format!("{}.{}", stem, VIDEO_EXT))
    }

    /// Cover path relative to the root, as stored in the playlist.
    pub fn relative_cover_path(stem: &str) -> PathBuf {
        Path::new(COVER_DIR).join(format!("{}.{}", stem, COVER_EXT))
    }
}
