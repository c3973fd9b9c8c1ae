//! Gallery model: which manifest items land on which page, and in what order.
//!
//! Every page kind filters the manifest by type and category, then drops
//! entries without a usable `src`. Survivors get a 0-based display index that
//! is only meaningful inside that one gallery; the lightbox navigates by it
//! and viewer pages are named after it.

use crate::config::CategoryConfig;
use crate::naming::slugify;
use crate::types::{MediaItem, MediaType};
use tracing::warn;

/// The four gallery pages of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Images,
    Videos,
    Memes,
    Apps,
}

impl PageKind {
    pub const ALL: [PageKind; 4] = [
        PageKind::Images,
        PageKind::Videos,
        PageKind::Memes,
        PageKind::Apps,
    ];

    /// Page filename stem and URL segment.
    pub fn slug(self) -> &'static str {
        match self {
            PageKind::Images => "images",
            PageKind::Videos => "videos",
            PageKind::Memes => "memes",
            PageKind::Apps => "apps",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PageKind::Images => "Images",
            PageKind::Videos => "Videos",
            PageKind::Memes => "Memes",
            PageKind::Apps => "Apps",
        }
    }

    /// DOM id of the gallery container.
    pub fn container_id(self) -> String {
        format!("{}-gallery", self.slug())
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            PageKind::Images => "No images found.",
            PageKind::Videos => "No videos found.",
            PageKind::Memes => "No memes found.",
            PageKind::Apps => "App demos coming soon!",
        }
    }

    /// Whether the page gets a category filter bar.
    pub fn has_category_filters(self) -> bool {
        matches!(self, PageKind::Images | PageKind::Videos)
    }

    pub fn accepts(self, item: &MediaItem, categories: &CategoryConfig) -> bool {
        match self {
            PageKind::Images => {
                item.media_type == MediaType::Image && !item.category_is(&categories.meme)
            }
            PageKind::Videos => item.media_type == MediaType::Video,
            PageKind::Memes => {
                item.media_type == MediaType::Image && item.category_is(&categories.meme)
            }
            PageKind::Apps => item.category_is(&categories.app),
        }
    }
}

/// One cell of a gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryEntry {
    /// 0-based position within the gallery.
    pub index: usize,
    pub item: MediaItem,
    /// Trimmed, non-blank `src` of the item.
    pub src: String,
}

impl GalleryEntry {
    /// Image shown in the cell. `None` for a video without a thumbnail, which
    /// renders its first frame instead.
    pub fn thumbnail(&self) -> Option<&str> {
        let explicit = self
            .item
            .thumbnail
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        match (explicit, self.item.media_type) {
            (Some(t), _) => Some(t),
            (None, MediaType::Image) => Some(&self.src),
            (None, MediaType::Video) => None,
        }
    }

    /// Title for captions and alt text. Falls back to the kind and 1-based number.
    pub fn display_title(&self) -> String {
        match self.item.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => format!("{} {}", capitalize_first(&self.item.media_type.to_string()), self.index + 1),
        }
    }
}

/// A filtered, indexed list of entries for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Gallery {
    pub kind: PageKind,
    /// Category filter for category pages, `None` for the "All" page.
    pub category: Option<String>,
    pub entries: Vec<GalleryEntry>,
}

impl Gallery {
    /// Page filename stem: `images` or `images-<category-slug>`.
    pub fn slug(&self) -> String {
        match &self.category {
            Some(c) => format!("{}-{}", self.kind.slug(), slugify(c)),
            None => self.kind.slug().to_string(),
        }
    }

    pub fn title(&self) -> String {
        match &self.category {
            Some(c) => format!("{} · {}", self.kind.title(), capitalize_first(c)),
            None => self.kind.title().to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Filter `items` for a page, skipping entries without a `src`.
pub fn build_gallery(
    kind: PageKind,
    items: &[MediaItem],
    category: Option<&str>,
    categories: &CategoryConfig,
) -> Gallery {
    let mut entries = Vec::new();
    for item in items {
        if !kind.accepts(item, categories) {
            continue;
        }
        if let Some(c) = category
            && !item.category_is(c)
        {
            continue;
        }
        let Some(src) = item.source() else {
            warn!(
                "{}: skipping {} entry without src (title: {:?})",
                kind.slug(),
                item.media_type,
                item.title.as_deref().unwrap_or("")
            );
            continue;
        };
        entries.push(GalleryEntry {
            index: entries.len(),
            src: src.to_string(),
            item: item.clone(),
        });
    }
    Gallery {
        kind,
        category: category.map(str::to_string),
        entries,
    }
}

/// Distinct categories of a page's renderable items, in first-seen order.
///
/// Categories whose slug would be empty, or collide with an earlier one,
/// are left out so every filter page gets a unique filename.
pub fn categories(kind: PageKind, items: &[MediaItem], config: &CategoryConfig) -> Vec<String> {
    let mut seen_slugs: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for item in items {
        if !kind.accepts(item, config) || item.source().is_none() {
            continue;
        }
        let Some(category) = item.category.as_deref().map(str::trim).filter(|c| !c.is_empty())
        else {
            continue;
        };
        let slug = slugify(category);
        if slug.is_empty() || seen_slugs.contains(&slug) {
            continue;
        }
        seen_slugs.push(slug);
        out.push(category.to_string());
    }
    out
}

pub(crate) fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn cfg() -> CategoryConfig {
        CategoryConfig::default()
    }

    // =========================================================================
    // Page filters
    // =========================================================================

    #[test]
    fn images_page_gets_only_non_meme_images() {
        let items = vec![
            image("a.webp", "nature"),
            video("b.mp4", "nature"),
            image("c.webp", "meme"),
            image("d.webp", "urban"),
        ];
        let g = build_gallery(PageKind::Images, &items, None, &cfg());
        let srcs: Vec<&str> = g.entries.iter().map(|e| e.src.as_str()).collect();
        assert_eq!(srcs, vec!["a.webp", "d.webp"]);
    }

    #[test]
    fn videos_page_gets_all_videos() {
        let items = vec![image("a.webp", "x"), video("b.mp4", "meme"), video("c.mp4", "app")];
        let g = build_gallery(PageKind::Videos, &items, None, &cfg());
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn memes_page_gets_meme_images_only() {
        let items = vec![image("a.webp", "meme"), video("b.mp4", "meme"), image("c.webp", "x")];
        let g = build_gallery(PageKind::Memes, &items, None, &cfg());
        assert_eq!(g.len(), 1);
        assert_eq!(g.entries[0].src, "a.webp");
    }

    #[test]
    fn apps_page_gets_app_category_of_any_type() {
        let items = vec![image("a.webp", "app"), video("b.mp4", "app"), image("c.webp", "x")];
        let g = build_gallery(PageKind::Apps, &items, None, &cfg());
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn example_manifest_on_images_page() {
        let items = vec![bare(MediaType::Image, "a.webp"), bare(MediaType::Video, "b.mp4")];
        let g = build_gallery(PageKind::Images, &items, None, &cfg());
        assert_eq!(g.len(), 1);
        assert_eq!(g.entries[0].src, "a.webp");
        assert_eq!(g.entries[0].index, 0);
    }

    #[test]
    fn uncategorized_image_is_not_a_meme() {
        let items = vec![bare(MediaType::Image, "a.webp")];
        assert_eq!(build_gallery(PageKind::Memes, &items, None, &cfg()).len(), 0);
        assert_eq!(build_gallery(PageKind::Images, &items, None, &cfg()).len(), 1);
    }

    // =========================================================================
    // Missing src + indexing
    // =========================================================================

    #[test]
    fn missing_src_is_skipped_and_indices_stay_dense() {
        let mut broken = image("x", "nature");
        broken.src = None;
        let mut blank = image("y", "nature");
        blank.src = Some("   ".into());
        let items = vec![image("a.webp", "nature"), broken, blank, image("b.webp", "nature")];
        let g = build_gallery(PageKind::Images, &items, None, &cfg());
        let indices: Vec<usize> = g.entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(g.entries[1].src, "b.webp");
    }

    #[test]
    fn src_is_trimmed() {
        let items = vec![image("  a.webp ", "x")];
        let g = build_gallery(PageKind::Images, &items, None, &cfg());
        assert_eq!(g.entries[0].src, "a.webp");
    }

    // =========================================================================
    // Category pages
    // =========================================================================

    #[test]
    fn category_filter_restricts_and_reindexes() {
        let items = vec![
            image("a.webp", "nature"),
            image("b.webp", "urban"),
            image("c.webp", "nature"),
        ];
        let g = build_gallery(PageKind::Images, &items, Some("nature"), &cfg());
        assert_eq!(g.len(), 2);
        assert_eq!(g.entries[1].src, "c.webp");
        assert_eq!(g.entries[1].index, 1);
        assert_eq!(g.slug(), "images-nature");
        assert_eq!(g.title(), "Images · Nature");
    }

    #[test]
    fn categories_first_seen_order_and_deduped() {
        let items = vec![
            image("a.webp", "urban"),
            image("b.webp", "nature"),
            image("c.webp", "urban"),
            image("m.webp", "meme"),
            bare(MediaType::Image, "d.webp"),
            video("v.mp4", "travel"),
        ];
        assert_eq!(categories(PageKind::Images, &items, &cfg()), vec!["urban", "nature"]);
        assert_eq!(categories(PageKind::Videos, &items, &cfg()), vec!["travel"]);
    }

    #[test]
    fn categories_skip_colliding_and_empty_slugs() {
        let items = vec![
            image("a.webp", "Street Art"),
            image("b.webp", "street-art"),
            image("c.webp", "日本"),
        ];
        assert_eq!(categories(PageKind::Images, &items, &cfg()), vec!["Street Art"]);
    }

    // =========================================================================
    // Entry helpers
    // =========================================================================

    #[test]
    fn thumbnail_fallbacks() {
        let items = vec![image("a.webp", "x"), video("b.mp4", "x")];
        let images = build_gallery(PageKind::Images, &items, None, &cfg());
        assert_eq!(images.entries[0].thumbnail(), Some("a.webp"));

        let videos = build_gallery(PageKind::Videos, &items, None, &cfg());
        assert_eq!(videos.entries[0].thumbnail(), None);

        let mut with_thumb = video("c.mp4", "x");
        with_thumb.thumbnail = Some("t.jpg".into());
        let g = build_gallery(PageKind::Videos, &[with_thumb], None, &cfg());
        assert_eq!(g.entries[0].thumbnail(), Some("t.jpg"));
    }

    #[test]
    fn display_title_falls_back_to_kind_and_number() {
        let items = vec![bare(MediaType::Video, "b.mp4")];
        let g = build_gallery(PageKind::Videos, &items, None, &cfg());
        assert_eq!(g.entries[0].display_title(), "Video 1");
    }

    #[test]
    fn empty_messages() {
        assert_eq!(PageKind::Images.empty_message(), "No images found.");
        assert_eq!(PageKind::Apps.empty_message(), "App demos coming soon!");
        assert_eq!(PageKind::Memes.container_id(), "memes-gallery");
    }
}
