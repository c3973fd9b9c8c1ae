//! The manifest schema shared by every stage.
//!
//! `scan` writes these, `manifest` reads them back, and every page renderer
//! consumes them. The JSON field names are the public contract of
//! `media-manifest.json` and must not change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of media an entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Download extension used when `src` carries none.
    pub fn default_extension(self) -> &'static str {
        match self {
            MediaType::Image => "webp",
            MediaType::Video => "mp4",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Image => f.write_str("image"),
            MediaType::Video => f.write_str("video"),
        }
    }
}

/// One entry of `media-manifest.json`.
///
/// `src` is optional on purpose: an entry without it still parses, and the
/// gallery renderer skips it with a warning instead of rejecting the whole
/// manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl MediaItem {
    /// The source path, if present and non-blank.
    pub fn source(&self) -> Option<&str> {
        self.src.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn is_video(&self) -> bool {
        self.media_type == MediaType::Video
    }

    pub fn category_is(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}
