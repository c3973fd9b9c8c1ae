//! Asset scanning and manifest generation.
//!
//! `showreel scan` builds `media-manifest.json` from the asset directories so
//! nobody has to maintain it by hand. The site builder never scans; it only
//! reads the manifest back.
//!
//! ## Directory Structure
//!
//! ```text
//! site/
//! ├── config.toml                  # Site configuration (optional)
//! ├── media-manifest.json          # Written by `showreel scan`
//! ├── assets/
//! │   ├── images/                  # type=image, category from filename rules
//! │   │   ├── by_charlie_sunset.webp
//! │   │   └── video-placeholder.jpg   # skipped, used as fallback thumbnail
//! │   ├── memes/                   # type=image, category=meme
//! │   └── videos/                  # type=video, thumbnail borrowed from images/
//! └── stickers/                    # sticker-rain images, not in the manifest
//! ```
//!
//! Only files directly inside each directory are considered, in filename
//! order. A missing directory is reported and skipped.
//!
//! ## Rules
//!
//! - Image extensions: jpg, jpeg, png, webp, gif, svg. Video: mp4, webm, ogg.
//! - In the images directory, `<name> - Copy.<ext>` duplicates and the video
//!   placeholder are skipped.
//! - Video `n` (0-based, filename order) borrows image `n % image_count` as its
//!   thumbnail, or the placeholder path when there are no images.
//! - The final list is shuffled unless `scan.shuffle = false`.

use crate::config::{CategoryConfig, SiteConfig};
use crate::manifest;
use crate::naming::format_title;
use crate::types::{MediaItem, MediaType};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "svg"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg"];

const COPY_MARKER: &str = " - copy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `<name> - Copy.<ext>` duplicate.
    Copy,
    /// The video placeholder image.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
}

/// Counts and notes collected while scanning, for the CLI report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub images: usize,
    pub memes: usize,
    pub videos: usize,
    pub skipped: Vec<SkippedFile>,
    /// Configured directories that do not exist.
    pub missing_dirs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub items: Vec<MediaItem>,
    pub report: ScanReport,
}

/// Scan the asset directories under `root` into manifest entries.
pub fn scan<R: Rng + ?Sized>(
    root: &Path,
    config: &SiteConfig,
    rng: &mut R,
) -> Result<ScanResult, ScanError> {
    let paths = &config.paths;
    let categories = &config.categories;
    let placeholder_name = Path::new(&paths.video_placeholder)
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase());

    let mut report = ScanReport::default();
    let mut items = Vec::new();
    let mut image_srcs: Vec<String> = Vec::new();

    info!("scanning {} for images", paths.images_dir);
    match list_media(root, &paths.images_dir, IMAGE_EXTENSIONS)? {
        None => missing_dir(&mut report, &paths.images_dir),
        Some(files) => {
            for (name, src) in files {
                let lower = name.to_lowercase();
                if lower.contains(COPY_MARKER) {
                    debug!("skipping copy file: {name}");
                    report.skipped.push(SkippedFile {
                        path: src,
                        reason: SkipReason::Copy,
                    });
                    continue;
                }
                if placeholder_name.as_deref() == Some(lower.as_str()) {
                    debug!("skipping placeholder: {name}");
                    report.skipped.push(SkippedFile {
                        path: src,
                        reason: SkipReason::Placeholder,
                    });
                    continue;
                }
                image_srcs.push(src.clone());
                items.push(MediaItem {
                    media_type: MediaType::Image,
                    title: Some(format_title(&name)),
                    category: Some(category_for(&name, categories)),
                    src: Some(src),
                    thumbnail: None,
                });
                report.images += 1;
            }
        }
    }

    info!("scanning {} for memes", paths.memes_dir);
    match list_media(root, &paths.memes_dir, IMAGE_EXTENSIONS)? {
        None => missing_dir(&mut report, &paths.memes_dir),
        Some(files) => {
            for (name, src) in files {
                items.push(MediaItem {
                    media_type: MediaType::Image,
                    title: Some(format_title(&name)),
                    category: Some(categories.meme.clone()),
                    src: Some(src),
                    thumbnail: None,
                });
                report.memes += 1;
            }
        }
    }

    info!("scanning {} for videos", paths.videos_dir);
    match list_media(root, &paths.videos_dir, VIDEO_EXTENSIONS)? {
        None => missing_dir(&mut report, &paths.videos_dir),
        Some(files) => {
            for (name, src) in files {
                let thumbnail = if image_srcs.is_empty() {
                    paths.video_placeholder.clone()
                } else {
                    image_srcs[report.videos % image_srcs.len()].clone()
                };
                items.push(MediaItem {
                    media_type: MediaType::Video,
                    title: Some(format_title(&name)),
                    category: Some(category_for(&name, categories)),
                    src: Some(src),
                    thumbnail: Some(thumbnail),
                });
                report.videos += 1;
            }
        }
    }

    if config.scan.shuffle {
        items.shuffle(rng);
    }

    Ok(ScanResult { items, report })
}

/// Write `items` to the configured manifest path. Returns the path written.
pub fn write_manifest(
    root: &Path,
    config: &SiteConfig,
    items: &[MediaItem],
) -> Result<PathBuf, ScanError> {
    let path = root.join(&config.paths.manifest);
    let json = manifest::to_json(items)?;
    fs::write(&path, json + "\n")?;
    info!("wrote {} items to {}", items.len(), path.display());
    Ok(path)
}

/// Category from the first rule whose keyword occurs in the lowercased filename.
pub fn category_for(filename: &str, categories: &CategoryConfig) -> String {
    let lower = filename.to_lowercase();
    categories
        .rules
        .iter()
        .find(|rule| lower.contains(&rule.keyword.to_lowercase()))
        .map(|rule| rule.category.clone())
        .unwrap_or_else(|| categories.default.clone())
}

fn missing_dir(report: &mut ScanReport, dir: &str) {
    warn!("directory '{dir}' not found");
    report.missing_dirs.push(dir.to_string());
}

/// Files directly inside `root/dir` with one of `extensions`, as
/// `(filename, "<dir>/<filename>")` pairs in filename order.
/// `None` if the directory does not exist.
fn list_media(
    root: &Path,
    dir: &str,
    extensions: &[&str],
) -> Result<Option<Vec<(String, String)>>, ScanError> {
    let full = root.join(dir);
    if !full.is_dir() {
        return Ok(None);
    }
    let prefix = dir.trim_end_matches('/');
    let mut files = Vec::new();
    for entry in WalkDir::new(&full)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            warn!("skipping non-UTF-8 filename in {dir}");
            continue;
        };
        if has_extension(name, extensions) {
            files.push((name.to_string(), format!("{prefix}/{name}")));
        }
    }
    Ok(Some(files))
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(&e.to_ascii_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    fn unshuffled() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.scan.shuffle = false;
        config
    }

    fn run(root: &Path, config: &SiteConfig) -> ScanResult {
        scan(root, config, &mut StdRng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn scans_images_memes_videos_in_order() {
        let tmp = TempDir::new().unwrap();
        write_site_assets(
            tmp.path(),
            &[
                "assets/images/b_charlie.webp",
                "assets/images/a_corn.png",
                "assets/memes/lol.gif",
                "assets/videos/couch2.mp4",
            ],
        );
        let result = run(tmp.path(), &unshuffled());
        let srcs: Vec<_> = result.items.iter().map(|i| i.source().unwrap()).collect();
        assert_eq!(
            srcs,
            vec![
                "assets/images/a_corn.png",
                "assets/images/b_charlie.webp",
                "assets/memes/lol.gif",
                "assets/videos/couch2.mp4",
            ]
        );
        assert_eq!(result.report.images, 2);
        assert_eq!(result.report.memes, 1);
        assert_eq!(result.report.videos, 1);
    }

    #[test]
    fn assigns_titles_and_categories() {
        let tmp = TempDir::new().unwrap();
        write_site_assets(
            tmp.path(),
            &[
                "assets/images/by_charlie_sunset.webp",
                "assets/images/random.jpg",
                "assets/memes/by_charlie_meme.png",
                "assets/videos/couch2.mp4",
            ],
        );
        let items = run(tmp.path(), &unshuffled()).items;
        let charlie = find_item(&items, "assets/images/by_charlie_sunset.webp");
        assert_eq!(charlie.title.as_deref(), Some("Charlie Sunset"));
        assert_eq!(charlie.category.as_deref(), Some("abstract"));

        let other = find_item(&items, "assets/images/random.jpg");
        assert_eq!(other.category.as_deref(), Some("other"));

        let meme = find_item(&items, "assets/memes/by_charlie_meme.png");
        assert_eq!(meme.category.as_deref(), Some("meme"));

        let video = find_item(&items, "assets/videos/couch2.mp4");
        assert_eq!(video.media_type, MediaType::Video);
        assert_eq!(video.title.as_deref(), Some("Couch 2"));
        assert_eq!(video.category.as_deref(), Some("tutorials"));
    }

    #[test]
    fn skips_copies_placeholder_and_other_extensions() {
        let tmp = TempDir::new().unwrap();
        write_site_assets(
            tmp.path(),
            &[
                "assets/images/a.jpg",
                "assets/images/a - Copy.jpg",
                "assets/images/Video-Placeholder.JPG",
                "assets/images/notes.txt",
                "assets/videos/clip.mov",
            ],
        );
        let result = run(tmp.path(), &unshuffled());
        assert_eq!(result.items.len(), 1);
        assert_eq!(
            result.report.skipped,
            vec![
                SkippedFile {
                    path: "assets/images/Video-Placeholder.JPG".into(),
                    reason: SkipReason::Placeholder,
                },
                SkippedFile {
                    path: "assets/images/a - Copy.jpg".into(),
                    reason: SkipReason::Copy,
                },
            ]
        );
    }

    #[test]
    fn videos_borrow_image_thumbnails_round_robin() {
        let tmp = TempDir::new().unwrap();
        write_site_assets(
            tmp.path(),
            &[
                "assets/images/a.jpg",
                "assets/images/b.jpg",
                "assets/memes/m.jpg",
                "assets/videos/1.mp4",
                "assets/videos/2.webm",
                "assets/videos/3.ogg",
            ],
        );
        let items = run(tmp.path(), &unshuffled()).items;
        let thumbs: Vec<_> = items
            .iter()
            .filter(|i| i.is_video())
            .map(|i| i.thumbnail.as_deref().unwrap())
            .collect();
        assert_eq!(
            thumbs,
            vec!["assets/images/a.jpg", "assets/images/b.jpg", "assets/images/a.jpg"]
        );
    }

    #[test]
    fn videos_without_images_get_placeholder() {
        let tmp = TempDir::new().unwrap();
        write_site_assets(tmp.path(), &["assets/videos/1.mp4"]);
        let items = run(tmp.path(), &unshuffled()).items;
        assert_eq!(
            items[0].thumbnail.as_deref(),
            Some("assets/images/video-placeholder.jpg")
        );
    }

    #[test]
    fn missing_dirs_are_reported_not_errors() {
        let tmp = TempDir::new().unwrap();
        write_site_assets(tmp.path(), &["assets/images/a.jpg"]);
        let result = run(tmp.path(), &unshuffled());
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.report.missing_dirs, vec!["assets/memes", "assets/videos"]);
    }

    #[test]
    fn nested_directories_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write_site_assets(tmp.path(), &["assets/images/a.jpg", "assets/images/old/b.jpg"]);
        assert_eq!(run(tmp.path(), &unshuffled()).items.len(), 1);
    }

    #[test]
    fn shuffle_keeps_every_item() {
        let tmp = TempDir::new().unwrap();
        let files: Vec<String> = (0..12).map(|i| format!("assets/images/{i:02}.jpg")).collect();
        let refs: Vec<&str> = files.iter().map(String::as_str).collect();
        write_site_assets(tmp.path(), &refs);

        let result = run(tmp.path(), &SiteConfig::default());
        let mut srcs: Vec<_> = result.items.iter().map(|i| i.source().unwrap().to_string()).collect();
        srcs.sort();
        assert_eq!(srcs, files);
    }

    #[test]
    fn category_rules_first_match_wins() {
        let cats = CategoryConfig::default();
        assert_eq!(category_for("Trump_on_the_couch.mp4", &cats), "projects");
        assert_eq!(category_for("CORNFIELD.jpg", &cats), "travel");
        assert_eq!(category_for("plain.jpg", &cats), "other");
    }

    #[test]
    fn write_manifest_roundtrips_through_loader() {
        let tmp = TempDir::new().unwrap();
        write_site_assets(tmp.path(), &["assets/images/a.jpg", "assets/videos/v.mp4"]);
        let config = unshuffled();
        let result = run(tmp.path(), &config);
        let path = write_manifest(tmp.path(), &config, &result.items).unwrap();
        assert_eq!(path, tmp.path().join("media-manifest.json"));
        let loaded = manifest::load(&path).unwrap();
        assert_eq!(loaded.items, result.items);
    }
}
