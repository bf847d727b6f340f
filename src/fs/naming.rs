//! Filename generation from post titles.

/// Characters that are unsafe in filenames on at least one supported
/// filesystem. These are removed from titles, not replaced, so that
/// `My: Pic` becomes `My Pic` rather than `My_ Pic`.
const UNSAFE_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Strip filesystem-unsafe characters from a post title.
pub fn sanitize_title(title: &str) -> String {
    title.chars().filter(|c| !UNSAFE_CHARS.contains(c)).collect()
}

/// Build the destination filename for a single-media post.
pub fn media_filename(title: &str, extension: &str) -> String {
    format!("{}.{}", sanitize_title(title), extension)
}

/// Build the destination filename for one gallery item.
///
/// `index` is 1-based so that multi-image posts stay unique and sort in
/// gallery order.
pub fn gallery_filename(title: &str, index: usize, extension: &str) -> String {
    format!("{}_{}.{}", sanitize_title(title), index, extension)
}
