//! Filesystem module.
//!
//! Filename derivation from post titles. The download directory itself is
//! flat: existence of a file is the completion record, there is no manifest.

pub mod naming;

pub use naming::{gallery_filename, media_filename, sanitize_title};
