//! Shared utility functions.

/// Byte offset of the `n`th character of `s`.
///
/// Returns `s.len()` when `s` has `n` characters or fewer, so the result is
/// always a valid split point.
pub fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(idx, _)| idx)
}

/// Shorten `s` to at most `max_chars` characters for log lines.
///
/// Newlines are flattened so a preview always fits on one line.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let end = char_offset(&flat, max_chars);
    format!("{}...", &flat[..end])
}
