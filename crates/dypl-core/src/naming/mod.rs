//! Local naming: filename stems for downloaded assets and playlist paths.
//!
//! Both the video and its cover share one stem, `"<author>-<title>"`, built
//! from user-editable strings and sanitized so it is safe on Linux and Windows.

mod sanitize;

pub use sanitize::sanitize_component;

use std::path::Path;

/// Upper bound for a stem in bytes. Leaves room for `.mp4.part` under NAME_MAX.
const STEM_MAX: usize = 200;

/// Builds the shared filename stem from author and title.
///
/// Returns `None` when both parts sanitize to nothing, since a stem of just
/// `"-"` would collide across unrelated items.
///
/// # Examples
///
/// - `filename_stem("A", "My Clip")` → `Some("A-My Clip")`
/// - `filename_stem("a/b", "what?")` → `Some("ab-what")`
pub fn filename_stem(author: &str, title: &str) -> Option<String> {
    let author = sanitize_component(author);
    let title = sanitize_component(title);
    if author.is_empty() && title.is_empty() {
        return None;
    }
    let stem = format!("{}-{}", author, title);
    Some(sanitize::truncate_on_char_boundary(&stem, STEM_MAX).to_string())
}

/// Renders a relative path with `/` separators regardless of host convention.
pub fn to_playlist_path(path: &Path) -> String {
    normalize_separators(&path.to_string_lossy())
}

/// Replaces `\` and the host separator with `/`.
pub fn normalize_separators(path: &str) -> String {
    let replaced = path.replace('\\', "/");
    if std::path::MAIN_SEPARATOR == '/' {
        replaced
    } else {
        replaced.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn stem_joins_author_and_title() {
        assert_eq!(filename_stem("A", "My Clip").as_deref(), Some("A-My Clip"));
        assert_eq!(filename_stem("a/b", "what?").as_deref(), Some("ab-what"));
    }

    #[test]
    fn stem_requires_some_content() {
        assert_eq!(filename_stem("", ""), None);
        assert_eq!(filename_stem("///", "?"), None);
        assert_eq!(filename_stem("only", "").as_deref(), Some("only-"));
    }

    #[test]
    fn stem_is_bounded() {
        let long = "长".repeat(200);
        let stem = filename_stem("A", &long).unwrap();
        assert!(stem.len() <= STEM_MAX);
        assert!(stem.starts_with("A-"));
    }

    #[test]
    fn playlist_paths_use_forward_slashes() {
        assert_eq!(normalize_separators(r"MP4\A-My Clip.mp4"), "MP4/A-My Clip.mp4");
        assert_eq!(normalize_separators("albumArt/x.jpg"), "albumArt/x.jpg");
        let joined: PathBuf = Path::new("MP4").join("A-My Clip.mp4");
        assert_eq!(to_playlist_path(&joined), "MP4/A-My Clip.mp4");
    }
}
