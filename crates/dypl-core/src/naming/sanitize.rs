//! Filename-component sanitization for author and title strings.

/// Characters rejected by at least one common filesystem.
const FORBIDDEN: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Removes path separators, wildcard/reserved punctuation and control
/// characters, then trims surrounding whitespace.
///
/// Inner spaces and non-ASCII text are kept as-is.
pub fn sanitize_component(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| !FORBIDDEN.contains(c) && !c.is_control())
        .collect();
    kept.trim().to_string()
}

/// Truncates `s` to at most `max` bytes without splitting a UTF-8 sequence.
pub(super) fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut take = max;
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
