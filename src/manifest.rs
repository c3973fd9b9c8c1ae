//! Manifest loading.
//!
//! `media-manifest.json` is read exactly once per build. A failure here is not
//! fatal to the build: the caller renders the error inline in every gallery
//! container and carries on. Individual malformed entries are dropped with a
//! warning so one bad line cannot blank the whole site.

use crate::types::MediaItem;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("manifest not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("manifest must be a JSON array of media items")]
    NotAnArray,
}

/// Result of a successful load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedManifest {
    /// Valid entries in manifest order.
    pub items: Vec<MediaItem>,
    /// Entries that could not be read as a media item.
    pub skipped: usize,
}

/// Read and parse the manifest at `path`.
pub fn load(path: &Path) -> Result<LoadedManifest, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ManifestError::NotFound(path.to_path_buf()),
        _ => ManifestError::Io(e),
    })?;
    let loaded = parse(&content)?;
    debug!(
        items = loaded.items.len(),
        skipped = loaded.skipped,
        "loaded {}",
        path.display()
    );
    Ok(loaded)
}

/// Parse manifest JSON text.
pub fn parse(content: &str) -> Result<LoadedManifest, ManifestError> {
    let Value::Array(entries) = serde_json::from_str::<Value>(content)? else {
        return Err(ManifestError::NotAnArray);
    };

    let mut loaded = LoadedManifest::default();
    for (pos, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<MediaItem>(entry) {
            Ok(item) => loaded.items.push(item),
            Err(e) => {
                warn!("skipping manifest entry {pos}: {e}");
                loaded.skipped += 1;
            }
        }
    }
    Ok(loaded)
}

/// Serialize items as the pretty-printed manifest format written by `scan`.
pub fn to_json(items: &[MediaItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(items)
}
