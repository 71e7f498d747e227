//! File lifecycle for downloads and the playlist.
//!
//! Data is written to `<final>.part` and renamed into place only once
//! complete, so a file at its final path is always a finished one. Failed
//! transfers leave the `.part` file behind for inspection.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.mp4` → `a.mp4.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Renames the finished temp file onto `final_path`, replacing any file there.
pub fn finalize(temp_path: &Path, final_path: &Path) -> Result<()> {
    fs::rename(temp_path, final_path).map_err(|e| PipelineError::io(final_path, e))
}

/// Creates `dir` (and parents) if missing. Returns true if it had to be created.
pub fn ensure_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))?;
    Ok(true)
}

/// Writes `data` to `final_path` through a `.part` file and a rename.
pub fn write_replace(final_path: &Path, data: &[u8]) -> Result<()> {
    let tp = temp_path(final_path);
    fs::write(&tp, data).map_err(|e| PipelineError::io(&tp, e))?;
    finalize(&tp, final_path)
}
