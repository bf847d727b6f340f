//! Saved-post and download-target representations.

/// One item of a gallery post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    /// Host-assigned media ID.
    pub media_id: String,

    /// Media subtype as reported by the listing metadata (e.g. `jpg`),
    /// used for both the item URL and the file extension.
    pub media_kind: String,
}

/// A saved post as read from the feed.
///
/// Immutable once parsed; the feed is the source of truth and this is an
/// ephemeral per-iteration copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPost {
    pub title: String,
    pub url: String,
    pub is_gallery: bool,
    pub gallery_items: Vec<GalleryItem>,
}

/// One unit of download work, derived deterministically from a post (or one
/// gallery item). Lives only for the duration of a dispatch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub source_url: String,
    pub filename: String,

    /// Whether an existing destination file must be size-checked against the
    /// remote content length before being skipped. Enabled for video hosts
    /// whose encodings may change between polls; off for immutable images.
    pub verify_size: bool,
}
