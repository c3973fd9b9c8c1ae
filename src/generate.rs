//! HTML site generation.
//!
//! Reads the manifest once, builds every gallery from it, and renders the
//! final static site. All interactivity the pages need is decided here:
//! shuffles, grid sizing, sticker trajectories, lightbox navigation targets.
//! The browser only runs CSS plus a few lines of keyboard handling.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): infinite-scroll grid of all media, sticker rain
//! - **Galleries** (`/images.html`, `/videos.html`, `/memes.html`, `/apps.html`)
//! - **Category galleries** (`/images-<category>.html`, `/videos-<category>.html`)
//! - **Viewer pages** (`/<gallery>/<n>.html`): the lightbox opened on entry `n`
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── images.html
//! ├── images/
//! │   ├── 1.html
//! │   └── 2.html
//! ├── images-nature.html
//! ├── images-nature/1.html
//! ├── videos.html, memes.html, apps.html (+ viewer dirs)
//! ├── assets/                 # copied from the site root
//! └── stickers/
//! ```
//!
//! ## Failure handling
//!
//! A manifest that cannot be loaded does not fail the build. Every gallery
//! container and the home grid show `Error loading media gallery: <reason>`
//! instead of cells. Entries without `src` are skipped by the gallery model;
//! entries whose file is missing render as a "Load Error" cell when
//! `performance.verify_assets` is on.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors and grid sizes injected from config)
//! - `static/nav.js`: Keyboard bindings for viewer pages

use crate::config::{self, SiteConfig};
use crate::gallery::{self, Gallery, GalleryEntry, PageKind, build_gallery, capitalize_first};
use crate::grid::{self, GridLayout, InfiniteGrid};
use crate::hints::{self, Loading};
use crate::lightbox::{Lightbox, Overflow};
use crate::manifest;
use crate::stickers::{self, StickerPlan};
use crate::types::{MediaItem, MediaType};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rand::Rng;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/nav.js");

const ERROR_PREFIX: &str = "Error loading media gallery: ";

/// Outcome of reading the manifest.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestStatus {
    Loaded { items: usize, skipped: usize },
    Failed(String),
}

/// One gallery page and how many cells it got.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub kind: PageKind,
    pub category: Option<String>,
    /// Output filename, e.g. `images-nature.html`.
    pub file: String,
    pub title: String,
    pub entries: usize,
}

/// What the site would contain, without writing anything.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSummary {
    pub manifest: ManifestStatus,
    pub pages: Vec<PageSummary>,
    /// Local asset paths referenced by galleries but missing on disk.
    pub broken_assets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub summary: SiteSummary,
    /// Home grid layout, `None` when the grid has no media.
    pub grid: Option<GridLayout>,
    pub sticker_slots: usize,
    pub copied_files: usize,
}

/// Load the manifest and build every gallery, as the builder would.
pub fn check(root: &Path, config: &SiteConfig) -> SiteSummary {
    let (status, items) = load_items(root, config);
    let galleries = collect_galleries(&items, config);
    let assets = AssetCheck::new(root, config);
    summarize(status, &galleries, &assets)
}

/// Render the whole site from `root` into `output_dir`.
pub fn generate<R: Rng + ?Sized>(
    root: &Path,
    output_dir: &Path,
    config: &SiteConfig,
    rng: &mut R,
) -> Result<BuildReport, GenerateError> {
    let (status, items) = load_items(root, config);
    let failure = match &status {
        ManifestStatus::Failed(reason) => Some(reason.as_str()),
        ManifestStatus::Loaded { .. } => None,
    };

    let css = [
        config::generate_color_css(&config.colors),
        config::generate_grid_css(&config.grid),
        CSS_STATIC.to_string(),
        hints::acceleration_css().to_string(),
    ]
    .join("\n\n");
    let site = Site {
        config,
        css,
        assets: AssetCheck::new(root, config),
    };

    fs::create_dir_all(output_dir)?;
    let copied_files = copy_assets(root, output_dir, config)?;

    // Home
    let grid = grid::build(&items, &config.grid, rng);
    let design = config.grid.viewport.map(f64::from);
    debug!(
        columns = grid.layout.columns,
        rows = grid.layout.rows,
        "grid section {:.0}px tall at design viewport",
        grid.layout.section_height(&config.grid, design)
    );
    let sticker_images = stickers::discover(
        &root.join(&config.paths.stickers_dir),
        &config.paths.stickers_dir,
    )?;
    let sticker_plan = stickers::plan(&config.stickers, sticker_images, config.grid.viewport, rng);
    let index_html = render_index(&site, &grid, sticker_plan.as_ref(), failure);
    fs::write(output_dir.join("index.html"), index_html.into_string())?;
    info!("generated index.html");

    // Galleries and their viewer pages
    let galleries = collect_galleries(&items, config);
    for gallery in &galleries {
        let slug = gallery.slug();
        let page = render_gallery_page(&site, gallery, &galleries, failure);
        fs::write(output_dir.join(format!("{slug}.html")), page.into_string())?;

        if !gallery.is_empty() {
            let viewer_dir = output_dir.join(&slug);
            fs::create_dir_all(&viewer_dir)?;
            let mut lightbox = Lightbox::new(&gallery.entries);
            for entry in &gallery.entries {
                if lightbox.open(entry.index).is_err() {
                    continue;
                }
                let html = render_viewer_page(&site, gallery, &lightbox);
                fs::write(
                    viewer_dir.join(format!("{}.html", entry.index + 1)),
                    html.into_string(),
                )?;
            }
            lightbox.close();
        }
        debug!("generated {slug}.html with {} viewer pages", gallery.len());
    }
    info!("generated {} gallery pages", galleries.len());

    let summary = summarize(status, &galleries, &site.assets);
    Ok(BuildReport {
        summary,
        grid: (!grid.is_empty()).then_some(grid.layout),
        sticker_slots: sticker_plan.map_or(0, |p| p.desktop.len()),
        copied_files,
    })
}

fn load_items(root: &Path, config: &SiteConfig) -> (ManifestStatus, Vec<MediaItem>) {
    match manifest::load(&root.join(&config.paths.manifest)) {
        Ok(loaded) => (
            ManifestStatus::Loaded {
                items: loaded.items.len(),
                skipped: loaded.skipped,
            },
            loaded.items,
        ),
        Err(e) => {
            warn!("could not load media manifest: {e}");
            (ManifestStatus::Failed(e.to_string()), Vec::new())
        }
    }
}

/// Every gallery page: the four main pages, each followed by its category pages.
pub fn collect_galleries(items: &[MediaItem], config: &SiteConfig) -> Vec<Gallery> {
    let cats = &config.categories;
    let mut galleries = Vec::new();
    for kind in PageKind::ALL {
        galleries.push(build_gallery(kind, items, None, cats));
        if kind.has_category_filters() {
            for category in gallery::categories(kind, items, cats) {
                galleries.push(build_gallery(kind, items, Some(&category), cats));
            }
        }
    }
    galleries
}

fn summarize(status: ManifestStatus, galleries: &[Gallery], assets: &AssetCheck) -> SiteSummary {
    let broken: BTreeSet<String> = galleries
        .iter()
        .flat_map(|g| &g.entries)
        .filter(|e| assets.is_missing(&e.src))
        .map(|e| e.src.clone())
        .collect();
    SiteSummary {
        manifest: status,
        pages: galleries
            .iter()
            .map(|g| PageSummary {
                kind: g.kind,
                category: g.category.clone(),
                file: format!("{}.html", g.slug()),
                title: g.title(),
                entries: g.len(),
            })
            .collect(),
        broken_assets: broken.into_iter().collect(),
    }
}

/// Copy the configured asset directories (and the video placeholder) into
/// the output, keeping their relative paths. Returns the number of files.
fn copy_assets(root: &Path, output_dir: &Path, config: &SiteConfig) -> Result<usize, GenerateError> {
    let paths = &config.paths;
    let mut copied = 0;
    for dir in [
        &paths.images_dir,
        &paths.videos_dir,
        &paths.memes_dir,
        &paths.stickers_dir,
    ] {
        let src = root.join(dir);
        if src.is_dir() {
            copied += copy_dir_recursive(&src, &output_dir.join(dir))?;
        }
    }
    let placeholder = root.join(&paths.video_placeholder);
    let placeholder_dst = output_dir.join(&paths.video_placeholder);
    if placeholder.is_file() && !placeholder_dst.exists() {
        if let Some(parent) = placeholder_dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&placeholder, &placeholder_dst)?;
        copied += 1;
    }
    debug!("copied {copied} asset files");
    Ok(copied)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry?;
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Answers "is this gallery asset missing on disk?" when verification is on.
struct AssetCheck<'a> {
    root: Option<&'a Path>,
}

impl<'a> AssetCheck<'a> {
    fn new(root: &'a Path, config: &SiteConfig) -> Self {
        Self {
            root: config.performance.verify_assets.then_some(root),
        }
    }

    fn is_missing(&self, src: &str) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        if is_remote(src) {
            return false;
        }
        !root.join(src.trim_start_matches('/')).is_file()
    }
}

struct Site<'a> {
    config: &'a SiteConfig,
    css: String,
    assets: AssetCheck<'a>,
}

fn is_remote(src: &str) -> bool {
    src.contains("://") || src.starts_with("data:")
}

/// Make a site-relative path usable from a page `prefix` levels deep.
fn asset_url(prefix: &str, src: &str) -> String {
    if is_remote(src) || src.starts_with('/') {
        src.to_string()
    } else {
        format!("{prefix}{src}")
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    site: &Site,
    extra_css: Option<&str>,
    body_class: Option<&str>,
    overflow: Overflow,
    content: Markup,
) -> Markup {
    let classes: Vec<&str> = body_class.into_iter().chain(overflow.body_class()).collect();
    let page_title = if title == site.config.site.title {
        title.to_string()
    } else {
        format!("{title} · {}", site.config.site.title)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (page_title) }
                (hints::resource_hints(&site.config.performance.preconnect))
                style { (PreEscaped(&site.css)) }
                @if let Some(extra) = extra_css {
                    style { (PreEscaped(extra)) }
                }
            }
            body class=[(!classes.is_empty()).then(|| classes.join(" "))] {
                (content)
            }
        }
    }
}

/// Renders the site header with breadcrumb and navigation
fn site_header(breadcrumb: Markup, nav: Markup) -> Markup {
    html! {
        header.site-header {
            nav.breadcrumb {
                (breadcrumb)
            }
            nav.site-nav {
                (nav)
            }
        }
    }
}

/// Renders the navigation menu (hamburger style, slides from right).
///
/// `current` is `None` on the home page. `prefix` is `""` for top-level
/// pages and `"../"` for viewer pages.
pub fn render_nav(current: Option<PageKind>, prefix: &str) -> Markup {
    html! {
        input.nav-toggle type="checkbox" id="nav-toggle";
        label.nav-hamburger for="nav-toggle" aria-label="Menu" {
            span.hamburger-line {}
            span.hamburger-line {}
            span.hamburger-line {}
        }
        label.nav-backdrop for="nav-toggle" aria-hidden="true" {}
        div.nav-panel {
            label.nav-close for="nav-toggle" { "×" }
            ul {
                li class=[current.is_none().then_some("current")] {
                    a href={ (prefix) "index.html" } { "Home" }
                }
                @for kind in PageKind::ALL {
                    li class=[(current == Some(kind)).then_some("current")] {
                        a href={ (prefix) (kind.slug()) ".html" } { (kind.title()) }
                    }
                }
            }
        }
    }
}

fn breadcrumb(site: &Site, prefix: &str, trail: Option<Markup>) -> Markup {
    html! {
        a href={ (prefix) "index.html" } { (site.config.site.title) }
        @if let Some(trail) = trail {
            " › "
            (trail)
        }
    }
}

fn error_message(class: &str, reason: &str) -> Markup {
    html! {
        p class=(class) role="alert" { (ERROR_PREFIX) (reason) }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page: infinite grid plus sticker rain.
fn render_index(
    site: &Site,
    grid: &InfiniteGrid,
    stickers: Option<&StickerPlan>,
    failure: Option<&str>,
) -> Markup {
    let sticker_css = stickers.map(StickerPlan::to_css);
    let content = html! {
        (site_header(breadcrumb(site, "", None), render_nav(None, "")))
        main.home-page {
            @if !site.config.site.tagline.is_empty() {
                p.tagline { (site.config.site.tagline) }
            }
            div.image-grid-container {
                @if let Some(reason) = failure {
                    (error_message("grid-error", reason))
                } @else if grid.is_empty() {
                    p.grid-empty { "No media yet." }
                } @else {
                    div.image-grid {
                        div.grid-section {
                            @for item in &grid.section {
                                (grid_cell(item))
                            }
                        }
                        div.grid-section aria-hidden="true" {
                            @for item in &grid.section {
                                (grid_cell(item))
                            }
                        }
                    }
                }
            }
        }
        @if let Some(plan) = stickers {
            div.stickers-container aria-hidden="true" {
                @for (slot, src) in plan.slot_images().enumerate() {
                    img class={ "sticker sticker-" (slot) } src=(asset_url("", src)) alt="" decoding="async";
                }
            }
        }
    };
    base_document(
        &site.config.site.title,
        site,
        sticker_css.as_deref(),
        Some("home"),
        Overflow::Auto,
        content,
    )
}

fn grid_cell(item: &MediaItem) -> Markup {
    let src = asset_url("", item.source().unwrap_or_default());
    html! {
        div.grid-item {
            @match item.media_type {
                MediaType::Image => {
                    img src=(src) alt=(item.title.as_deref().unwrap_or("Creative Image")) loading="lazy" decoding="async";
                }
                MediaType::Video => {
                    video src=(src) muted autoplay loop playsinline preload="metadata" {}
                }
            }
        }
    }
}

/// Renders a gallery page from a closed lightbox.
fn render_gallery_page(
    site: &Site,
    gallery: &Gallery,
    all: &[Gallery],
    failure: Option<&str>,
) -> Markup {
    let lightbox = Lightbox::new(&gallery.entries);
    let slug = gallery.slug();
    let kind = gallery.kind;

    let trail = match &gallery.category {
        Some(c) => html! {
            a href={ (kind.slug()) ".html" } { (kind.title()) }
            " › "
            (capitalize_first(c))
        },
        None => html! { (kind.title()) },
    };

    let content = html! {
        (site_header(breadcrumb(site, "", Some(trail)), render_nav(Some(kind), "")))
        main.gallery-page {
            header.page-header {
                h1 { (gallery.title()) }
            }
            @if kind.has_category_filters() && failure.is_none() {
                (filter_bar(gallery, all))
            }
            div.gallery-grid id=(kind.container_id()) {
                @if let Some(reason) = failure {
                    (error_message("gallery-error", reason))
                } @else if gallery.is_empty() {
                    p.gallery-empty { (kind.empty_message()) }
                } @else {
                    @for entry in &gallery.entries {
                        (gallery_cell(site, &slug, entry))
                    }
                }
            }
        }
    };

    base_document(
        &gallery.title(),
        site,
        None,
        Some("gallery-view"),
        lightbox.overflow(),
        content,
    )
}

/// "All" plus one link per category page of the same kind.
fn filter_bar(gallery: &Gallery, all: &[Gallery]) -> Markup {
    let kind = gallery.kind;
    let siblings: Vec<&Gallery> = all
        .iter()
        .filter(|g| g.kind == kind && g.category.is_some())
        .collect();
    html! {
        @if !siblings.is_empty() {
            nav.filter-bar aria-label="Filter by category" {
                a.filter-btn.active[gallery.category.is_none()] href={ (kind.slug()) ".html" } { "All" }
                @for sibling in siblings {
                    @let label = sibling.category.as_deref().unwrap_or_default();
                    a.filter-btn.active[sibling.category == gallery.category]
                        href={ (sibling.slug()) ".html" } { (capitalize_first(label)) }
                }
            }
        }
    }
}

fn gallery_cell(site: &Site, slug: &str, entry: &GalleryEntry) -> Markup {
    let title = entry.display_title();
    let stagger = format!("--stagger: {}", entry.index);
    let category = entry.item.category.as_deref().filter(|c| !c.is_empty());

    if site.assets.is_missing(&entry.src) {
        warn!("asset not found: {}, rendering load error", entry.src);
        return html! {
            div.gallery-item.load-error style=(stagger) data-index=(entry.index) {
                div.item-image {
                    span.load-error-label { "Load Error" }
                }
                div.item-details {
                    h3.item-title { (title) }
                }
            }
        };
    }

    let loading = Loading::for_position(entry.index, site.config.performance.eager_thumbnails);
    html! {
        a.gallery-item href={ (slug) "/" (entry.index + 1) ".html" }
            style=(stagger) data-index=(entry.index) data-category=[category] {
            div.item-image {
                @if let Some(thumb) = entry.thumbnail() {
                    img src=(asset_url("", thumb)) alt=(title) loading=(loading.as_attr()) decoding="async";
                } @else {
                    video src=(asset_url("", &entry.src)) muted playsinline preload="metadata" {}
                }
                @if entry.item.is_video() {
                    span.play-button aria-hidden="true" { "▶" }
                }
            }
            div.item-details {
                h3.item-title { (title) }
                @if let Some(c) = category {
                    p.item-category { (capitalize_first(c)) }
                }
            }
        }
    }
}

/// Renders a viewer page from a lightbox opened on one entry.
fn render_viewer_page(site: &Site, gallery: &Gallery, lightbox: &Lightbox) -> Markup {
    let (Some(entry), Some((prev, next)), Some(download)) =
        (lightbox.current(), lightbox.neighbors(), lightbox.download())
    else {
        return html! {};
    };
    let prefix = "../";
    let slug = gallery.slug();
    let kind = gallery.kind;
    let title = entry.display_title();
    let close_url = format!("{prefix}{slug}.html");
    let prev_url = format!("{}.html", prev + 1);
    let next_url = format!("{}.html", next + 1);
    let src = asset_url(prefix, &entry.src);
    let modal_id = match entry.item.media_type {
        MediaType::Image => "image-modal",
        MediaType::Video => "video-modal",
    };

    let trail = html! {
        a href=(close_url) { (gallery.title()) }
        " › "
        (entry.index + 1) " / " (lightbox.len())
    };

    let content = html! {
        (site_header(breadcrumb(site, prefix, Some(trail)), render_nav(Some(kind), prefix)))
        div.modal id=(modal_id) role="dialog" aria-modal="true" aria-label=(title) {
            a.modal-close href=(close_url) aria-label="Close" { "×" }
            a.modal-prev href=(prev_url) aria-label="Previous" { "‹" }
            figure.modal-content {
                @match entry.item.media_type {
                    MediaType::Image => {
                        img.modal-media src=(src) alt=(title);
                    }
                    MediaType::Video => {
                        video.modal-media src=(src) controls autoplay playsinline
                            poster=[entry.thumbnail().map(|t| asset_url(prefix, t))] {}
                    }
                }
                figcaption {
                    h2.modal-title { (title) }
                    @if let Some(c) = entry.item.category.as_deref().filter(|c| !c.is_empty()) {
                        p.modal-category { (capitalize_first(c)) }
                    }
                }
            }
            a.modal-next href=(next_url) aria-label="Next" { "›" }
            a.modal-download href=(asset_url(prefix, &download.href)) download=(download.filename) {
                "Download"
            }
        }
        div.nav-zones data-prev=(prev_url) data-next=(next_url) data-close=(close_url) {}
        script { (PreEscaped(JS)) }
    };

    base_document(
        &format!("{} - {}", gallery.title(), entry.index + 1),
        site,
        None,
        Some("viewer"),
        lightbox.overflow(),
        content,
    )
}

// ============================================================================
// Tests
// ============================================================================
