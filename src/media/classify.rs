//! Post classification by URL shape.

use url::Url;

use crate::fs::{gallery_filename, media_filename};
use crate::media::post::{DownloadTarget, SavedPost};

/// Direct-image hosts whose URLs point straight at an immutable file.
const DIRECT_IMAGE_HOSTS: &[&str] = &["i.redd.it", "i.imgur.com"];

/// External video host resolved through its own API.
const VIDEO_HOST: &str = "redgifs.com";

/// Image extensions accepted from direct-image hosts.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Base URL for gallery item files.
const GALLERY_MEDIA_BASE: &str = "https://i.redd.it";

/// What a saved post resolves to, decided once by [`classify`] and
/// pattern-matched by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostKind {
    /// Gallery post expanded into one target per item.
    Gallery(Vec<DownloadTarget>),

    /// Single direct-image download.
    DirectImage(DownloadTarget),

    /// Post on the external video host; the media URL still has to be
    /// resolved through the host API.
    ExternalVideo { post_url: String, filename: String },

    /// Post type out of scope. Not an error.
    Unrecognized,
}

/// Classify a saved post, evaluated in fixed priority order: gallery flag,
/// direct-image host, external video host, otherwise unrecognized.
pub fn classify(post: &SavedPost) -> PostKind {
    if post.is_gallery {
        let targets = post
            .gallery_items
            .iter()
            .enumerate()
            .map(|(i, item)| DownloadTarget {
                source_url: format!(
                    "{}/{}.{}",
                    GALLERY_MEDIA_BASE, item.media_id, item.media_kind
                ),
                filename: gallery_filename(&post.title, i + 1, &item.media_kind),
                verify_size: false,
            })
            .collect();
        return PostKind::Gallery(targets);
    }

    let Ok(url) = Url::parse(&post.url) else {
        return PostKind::Unrecognized;
    };
    let Some(host) = url.host_str() else {
        return PostKind::Unrecognized;
    };

    if DIRECT_IMAGE_HOSTS.contains(&host) {
        let extension = url.path().rsplit('.').next().unwrap_or("").to_lowercase();
        if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return PostKind::DirectImage(DownloadTarget {
                source_url: post.url.clone(),
                filename: media_filename(&post.title, &extension),
                verify_size: false,
            });
        }
        return PostKind::Unrecognized;
    }

    if host == VIDEO_HOST || host.ends_with(&format!(".{}", VIDEO_HOST)) {
        return PostKind::ExternalVideo {
            post_url: post.url.clone(),
            filename: media_filename(&post.title, "mp4"),
        };
    }

    PostKind::Unrecognized
}
