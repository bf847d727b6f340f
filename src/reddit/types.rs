//! Reddit API response type definitions.

use serde::Deserialize;
use std::collections::HashMap;

use crate::media::{GalleryItem, SavedPost};

/// OAuth token response from the password grant.
#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

/// Generic listing wrapper.
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    /// Cursor for the next page; absent on the last page.
    pub after: Option<String>,

    #[serde(default)]
    pub children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
pub struct ListingChild {
    /// Thing kind; saved listings mix links (`t3`) and comments (`t1`).
    pub kind: String,

    pub data: RawSavedPost,
}

/// A saved post as it appears in the listing JSON. Fields default so that
/// comments and exotic post types deserialize instead of failing the page.
#[derive(Debug, Deserialize)]
pub struct RawSavedPost {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub is_gallery: bool,

    pub gallery_data: Option<GalleryData>,

    pub media_metadata: Option<HashMap<String, MediaMetadata>>,
}

#[derive(Debug, Deserialize)]
pub struct GalleryData {
    #[serde(default)]
    pub items: Vec<GalleryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GalleryEntry {
    pub media_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MediaMetadata {
    /// MIME type of the item, e.g. `image/jpg`.
    #[serde(default)]
    pub m: String,
}

impl RawSavedPost {
    /// Join gallery entries with their metadata into the post model.
    ///
    /// The media kind is the MIME subtype (`image/jpg` → `jpg`), which the
    /// host also uses as the file extension. Items without metadata are
    /// dropped.
    pub fn into_saved_post(self) -> SavedPost {
        let metadata = self.media_metadata.unwrap_or_default();
        let gallery_items = self
            .gallery_data
            .map(|gallery| {
                gallery
                    .items
                    .into_iter()
                    .filter_map(|entry| {
                        let kind = metadata
                            .get(&entry.media_id)?
                            .m
                            .rsplit('/')
                            .next()?
                            .to_string();
                        Some(GalleryItem {
                            media_id: entry.media_id,
                            media_kind: kind,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        SavedPost {
            title: self.title,
            url: self.url,
            is_gallery: self.is_gallery,
            gallery_items,
        }
    }
}
