/// Longest slug kept, in characters.
pub const MAX_SLUG_LEN: usize = 96;
const FALLBACK_SLUG: &str = "molecule";

/// Derives a directory-safe slug from an input string.
///
/// The text is lower-cased, every run of characters outside `[a-z0-9]`
/// becomes a single `-`, and leading/trailing dashes are removed. The result
/// is cut to [`MAX_SLUG_LEN`] characters and trimmed again; an empty slug
/// becomes `molecule`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    let truncated: String = slug.chars().take(MAX_SLUG_LEN).collect();
    let trimmed = truncated.trim_matches('-');
    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}
