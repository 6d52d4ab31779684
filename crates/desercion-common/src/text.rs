//! Display label helpers.

/// Marker appended to labels shortened by [`truncate_label`].
pub const ELLIPSIS: &str = "...";

/// Shortens a label to `width` characters followed by [`ELLIPSIS`].
///
/// Labels at or under `width` characters are returned unchanged. Counting is
/// by `char`, so accented faculty names are never split mid-codepoint. This is
/// a display concern only: callers keep the original value as the key.
///
/// # Examples
///
/// ```
/// use desercion_common::truncate_label;
///
/// assert_eq!(truncate_label("INGENIERIA", 20), "INGENIERIA");
/// assert_eq!(truncate_label("FACULTAD DE CIENCIAS", 8), "FACULTAD...");
/// ```
pub fn truncate_label(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    let mut shortened: String = label.chars().take(width).collect();
    shortened.push_str(ELLIPSIS);
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_short_labels() {
        assert_eq!(truncate_label("", 5), "");
        assert_eq!(truncate_label("ABCDE", 5), "ABCDE");
    }

    #[test]
    fn truncates_by_char_not_byte() {
        assert_eq!(truncate_label("EDUCACIÓN FÍSICA", 9), "EDUCACIÓN...");
    }
}
