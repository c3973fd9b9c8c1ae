//! Shared test utilities for the showreel test suite.
//!
//! Item builders for manifest entries, a fixture writer for asset trees, and
//! lookup helpers that fail with the list of what *was* there.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_site_assets(tmp.path(), &["assets/images/a.jpg", "stickers/0.png"]);
//!
//! let items = vec![image("assets/images/a.jpg", "nature"), video("b.mp4", "app")];
//! let entry = find_item(&items, "b.mp4");
//! ```

use std::fs;
use std::path::Path;

use crate::naming::format_title;
use crate::types::{MediaItem, MediaType};

// =========================================================================
// Item builders
// =========================================================================

/// Image entry with a title derived from `src` and the given category.
pub fn image(src: &str, category: &str) -> MediaItem {
    item(MediaType::Image, src, Some(category))
}

/// Video entry with a title derived from `src`, no thumbnail.
pub fn video(src: &str, category: &str) -> MediaItem {
    item(MediaType::Video, src, Some(category))
}

/// Entry with only `type` and `src`, as in a hand-written manifest.
pub fn bare(media_type: MediaType, src: &str) -> MediaItem {
    MediaItem {
        media_type,
        src: Some(src.to_string()),
        title: None,
        category: None,
        thumbnail: None,
    }
}

fn item(media_type: MediaType, src: &str, category: Option<&str>) -> MediaItem {
    let filename = src.rsplit('/').next().unwrap_or(src);
    MediaItem {
        media_type,
        src: Some(src.to_string()),
        title: Some(format_title(filename.trim())),
        category: category.map(str::to_string),
        thumbnail: None,
    }
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Create each relative path under `root` as a small placeholder file,
/// creating parent directories as needed.
pub fn write_site_assets(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, b"fixture").unwrap();
    }
}

/// Write a manifest file at `root/media-manifest.json`.
pub fn write_manifest_json(root: &Path, json: &str) {
    fs::write(root.join("media-manifest.json"), json).unwrap();
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Find an entry by `src`. Panics with available sources if not found.
pub fn find_item<'a>(items: &'a [MediaItem], src: &str) -> &'a MediaItem {
    items
        .iter()
        .find(|i| i.src.as_deref() == Some(src))
        .unwrap_or_else(|| {
            let available: Vec<_> = items.iter().filter_map(|i| i.src.as_deref()).collect();
            panic!("item '{src}' not found. Available: {available:?}")
        })
}

/// Read a generated file as a string. Panics with the directory listing if missing.
pub fn read_output(dist: &Path, rel: &str) -> String {
    let path = dist.join(rel);
    fs::read_to_string(&path).unwrap_or_else(|_| {
        let available: Vec<_> = walkdir::WalkDir::new(dist)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                e.path()
                    .strip_prefix(dist)
                    .ok()
                    .map(|p| p.to_string_lossy().into_owned())
            })
            .collect();
        panic!("output '{rel}' not found. Available: {available:?}")
    })
}
