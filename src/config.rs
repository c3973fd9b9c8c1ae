//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the site root next to `media-manifest.json`; stock defaults are the base
//! layer and the user file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown by `showreel gen-config`
//!
//! [site]
//! title = "Creative Portfolio"
//!
//! [paths]
//! manifest = "media-manifest.json"
//! images_dir = "assets/images"
//!
//! [grid]
//! item_width = 220          # px, home grid cell
//! viewport = [1920, 1080]   # design viewport the grid is sized for
//!
//! [stickers.desktop]
//! count = 16
//! frame_budget_ms = 16
//!
//! [build]
//! seed = 7                  # reproducible shuffles (omit for random)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::grid::GridLayout;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity shown in the header and `<title>`.
    pub site: SiteInfo,
    /// Where the manifest and asset directories live, relative to the site root.
    pub paths: PathsConfig,
    /// Manifest generation settings.
    pub scan: ScanConfig,
    /// Category names and filename keyword rules.
    pub categories: CategoryConfig,
    /// Home page infinite grid.
    pub grid: GridConfig,
    /// Sticker-rain decoration.
    pub stickers: StickersConfig,
    /// Lazy loading, resource hints, asset verification.
    pub performance: PerformanceConfig,
    /// Build-wide settings.
    pub build: BuildConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.item_width == 0 {
            return Err(ConfigError::Validation(
                "grid.item_width must be non-zero".into(),
            ));
        }
        if grid.viewport[0] == 0 || grid.viewport[1] == 0 {
            return Err(ConfigError::Validation(
                "grid.viewport values must be non-zero".into(),
            ));
        }
        if grid.fill_factor <= 0.0 || !grid.fill_factor.is_finite() {
            return Err(ConfigError::Validation(
                "grid.fill_factor must be a positive number".into(),
            ));
        }
        if grid.scroll_seconds == 0 {
            return Err(ConfigError::Validation(
                "grid.scroll_seconds must be non-zero".into(),
            ));
        }
        let stickers = &self.stickers;
        if !stickers.rotation_speed.is_finite() || stickers.rotation_speed < 0.0 {
            return Err(ConfigError::Validation(
                "stickers.rotation_speed must be a finite, non-negative number".into(),
            ));
        }
        if !stickers.drift.is_finite() || stickers.drift < 0.0 {
            return Err(ConfigError::Validation(
                "stickers.drift must be a finite, non-negative number".into(),
            ));
        }
        if stickers.mobile_breakpoint == 0 {
            return Err(ConfigError::Validation(
                "stickers.mobile_breakpoint must be non-zero".into(),
            ));
        }
        self.stickers.desktop.validate("stickers.desktop")?;
        self.stickers.mobile.validate("stickers.mobile")?;
        if self.stickers.mobile.count > self.stickers.desktop.count {
            return Err(ConfigError::Validation(
                "stickers.mobile.count must not exceed stickers.desktop.count".into(),
            ));
        }
        if self.categories.meme.trim().is_empty() || self.categories.app.trim().is_empty() {
            return Err(ConfigError::Validation(
                "categories.meme and categories.app must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    pub tagline: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Creative Portfolio".to_string(),
            tagline: "Images, videos, memes and apps".to_string(),
        }
    }
}

/// Paths relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub manifest: String,
    pub images_dir: String,
    pub videos_dir: String,
    pub memes_dir: String,
    pub stickers_dir: String,
    /// Thumbnail for videos when the site has no images at all.
    /// Skipped by the scanner so it never shows up as a gallery item.
    pub video_placeholder: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            manifest: "media-manifest.json".to_string(),
            images_dir: "assets/images".to_string(),
            videos_dir: "assets/videos".to_string(),
            memes_dir: "assets/memes".to_string(),
            stickers_dir: "stickers".to_string(),
            video_placeholder: "assets/images/video-placeholder.jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Shuffle the manifest after scanning.
    pub shuffle: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { shuffle: true }
    }
}

/// A filename keyword that assigns a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryRule {
    pub keyword: String,
    pub category: String,
}

impl CategoryRule {
    fn new(keyword: &str, category: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            category: category.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryConfig {
    /// Category for files no rule matches.
    pub default: String,
    /// Category assigned to everything in the memes directory.
    pub meme: String,
    /// Category that places an item on the apps page.
    pub app: String,
    /// Checked in order; the first keyword contained in the lowercased filename wins.
    pub rules: Vec<CategoryRule>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            default: "other".to_string(),
            meme: "meme".to_string(),
            app: "app".to_string(),
            rules: vec![
                CategoryRule::new("charlie", "abstract"),
                CategoryRule::new("lordworldpeace", "nature"),
                CategoryRule::new("memedeck", "urban"),
                CategoryRule::new("simmer", "landscape"),
                CategoryRule::new("trump", "projects"),
                CategoryRule::new("couch", "tutorials"),
                CategoryRule::new("corn", "travel"),
            ],
        }
    }
}

/// Home page infinite grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Cell width in px.
    pub item_width: u32,
    /// Gap between cells in px.
    pub gap: u32,
    /// Design viewport `[width, height]` the section size is computed for.
    pub viewport: [u32; 2],
    /// How many viewport heights one section must cover.
    pub fill_factor: f64,
    /// Duration of one full loop of the scroll animation.
    pub scroll_seconds: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            item_width: 220,
            gap: 8,
            viewport: [1920, 1080],
            fill_factor: 1.5,
            scroll_seconds: 60,
        }
    }
}

/// Per-device sticker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StickerProfileConfig {
    pub count: usize,
    pub min_size: f64,
    pub max_size: f64,
    /// px per frame
    pub min_speed: f64,
    pub max_speed: f64,
    pub frame_budget_ms: u32,
}

impl StickerProfileConfig {
    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        let floats = [self.min_size, self.max_size, self.min_speed, self.max_speed];
        if floats.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "{section}: sizes and speeds must be finite numbers"
            )));
        }
        if self.min_size <= 0.0 || self.min_size > self.max_size {
            return Err(ConfigError::Validation(format!(
                "{section}: min_size must be positive and not exceed max_size"
            )));
        }
        if self.min_speed <= 0.0 || self.min_speed > self.max_speed {
            return Err(ConfigError::Validation(format!(
                "{section}: min_speed must be positive and not exceed max_speed"
            )));
        }
        if self.frame_budget_ms == 0 {
            return Err(ConfigError::Validation(format!(
                "{section}: frame_budget_ms must be non-zero"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StickersConfig {
    pub enabled: bool,
    /// Max rotation in degrees per frame, either direction.
    pub rotation_speed: f64,
    /// Max horizontal drift in px per frame, either direction.
    pub drift: f64,
    /// Delay between consecutive sticker spawns at start.
    pub stagger_ms: u32,
    /// Viewport width at or below which the mobile profile applies.
    pub mobile_breakpoint: u32,
    pub desktop: StickerProfileConfig,
    pub mobile: StickerProfileConfig,
}

impl Default for StickersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rotation_speed: 0.5,
            drift: 0.25,
            stagger_ms: 100,
            mobile_breakpoint: 768,
            desktop: StickerProfileConfig {
                count: 16,
                min_size: 30.0,
                max_size: 80.0,
                min_speed: 1.0,
                max_speed: 3.0,
                frame_budget_ms: 16,
            },
            mobile: StickerProfileConfig {
                count: 8,
                min_size: 20.0,
                max_size: 50.0,
                min_speed: 1.0,
                max_speed: 2.0,
                frame_budget_ms: 33,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PerformanceConfig {
    /// Origins that get `dns-prefetch` and `preconnect` hints.
    pub preconnect: Vec<String>,
    /// Gallery thumbnails loaded eagerly before switching to `loading="lazy"`.
    pub eager_thumbnails: usize,
    /// Replace cells whose local asset is missing with a load-error placeholder.
    pub verify_assets: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            preconnect: vec![
                "https://cdnjs.cloudflare.com".to_string(),
                "https://fonts.googleapis.com".to_string(),
                "https://fonts.gstatic.com".to_string(),
            ],
            eager_thumbnails: 6,
            verify_assets: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Seed for shuffles and sticker trajectories. Random when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Build the random source for a run.
///
/// - `Some(seed)` → deterministic output, same site on every build
/// - `None` → seeded from OS entropy
pub fn build_rng(build: &BuildConfig) -> StdRng {
    match build.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    /// Cards, modal backdrop panels, nav drawer.
    pub surface: String,
    pub text: String,
    /// Captions, categories, placeholders.
    pub text_muted: String,
    /// Active nav item, filter chips, play button.
    pub accent: String,
    pub border: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#fafafa".to_string(),
            surface: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            accent: "#ff3e6c".to_string(),
            border: "#e0e0e0".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0b0b0f".to_string(),
            surface: "#17171d".to_string(),
            text: "#f2f2f2".to_string(),
            text_muted: "#9a9aa5".to_string(),
            accent: "#ff3e6c".to_string(),
            border: "#2a2a33".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value (arrays included)
/// replaces the base value wholesale.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the site config from `<root>/config.toml` over stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`. Used by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Showreel Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

[site]
title = "Creative Portfolio"
tagline = "Images, videos, memes and apps"

# ---------------------------------------------------------------------------
# Paths, relative to the site root
# ---------------------------------------------------------------------------
[paths]
manifest = "media-manifest.json"
images_dir = "assets/images"
videos_dir = "assets/videos"
memes_dir = "assets/memes"
stickers_dir = "stickers"
# Video thumbnail used when there are no images to borrow one from.
video_placeholder = "assets/images/video-placeholder.jpg"

# ---------------------------------------------------------------------------
# Manifest generation (`showreel scan`)
# ---------------------------------------------------------------------------
[scan]
# Shuffle entries so the home grid starts in a different order each scan.
shuffle = true

# ---------------------------------------------------------------------------
# Categories
# ---------------------------------------------------------------------------
[categories]
default = "other"
# Everything in memes_dir gets this category and lands on the memes page.
meme = "meme"
# Items with this category land on the apps page.
app = "app"

# First keyword found in the lowercased filename wins.
[[categories.rules]]
keyword = "charlie"
category = "abstract"

[[categories.rules]]
keyword = "lordworldpeace"
category = "nature"

[[categories.rules]]
keyword = "memedeck"
category = "urban"

[[categories.rules]]
keyword = "simmer"
category = "landscape"

[[categories.rules]]
keyword = "trump"
category = "projects"

[[categories.rules]]
keyword = "couch"
category = "tutorials"

[[categories.rules]]
keyword = "corn"
category = "travel"

# ---------------------------------------------------------------------------
# Home page infinite grid
# ---------------------------------------------------------------------------
[grid]
item_width = 220
gap = 8
# The viewport one grid section is sized to overfill.
viewport = [1920, 1080]
fill_factor = 1.5
scroll_seconds = 60

# ---------------------------------------------------------------------------
# Sticker rain
# ---------------------------------------------------------------------------
[stickers]
enabled = true
rotation_speed = 0.5
drift = 0.25
stagger_ms = 100
mobile_breakpoint = 768

[stickers.desktop]
count = 16
min_size = 30.0
max_size = 80.0
min_speed = 1.0
max_speed = 3.0
frame_budget_ms = 16

[stickers.mobile]
count = 8
min_size = 20.0
max_size = 50.0
min_speed = 1.0
max_speed = 2.0
frame_budget_ms = 33

# ---------------------------------------------------------------------------
# Performance
# ---------------------------------------------------------------------------
[performance]
preconnect = [
    "https://cdnjs.cloudflare.com",
    "https://fonts.googleapis.com",
    "https://fonts.gstatic.com",
]
eager_thumbnails = 6
verify_assets = true

# ---------------------------------------------------------------------------
# Build
# ---------------------------------------------------------------------------
[build]
# Fix the shuffle and sticker trajectories across builds.
# seed = 7

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors.light]
background = "#fafafa"
surface = "#ffffff"
text = "#111111"
text_muted = "#666666"
accent = "#ff3e6c"
border = "#e0e0e0"

[colors.dark]
background = "#0b0b0f"
surface = "#17171d"
text = "#f2f2f2"
text_muted = "#9a9aa5"
accent = "#ff3e6c"
border = "#2a2a33"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    let vars = |scheme: &ColorScheme, pad: &str| {
        format!(
            "{pad}--color-bg: {};\n{pad}--color-surface: {};\n{pad}--color-text: {};\n\
             {pad}--color-text-muted: {};\n{pad}--color-accent: {};\n{pad}--color-border: {};",
            scheme.background,
            scheme.surface,
            scheme.text,
            scheme.text_muted,
            scheme.accent,
            scheme.border,
        )
    };
    format!(
        ":root {{\n{}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}\n    }}\n}}",
        vars(&colors.light, "    "),
        vars(&colors.dark, "        "),
    )
}

/// Generate CSS custom properties for the home grid.
///
/// Column and row counts come from the design viewport; the stylesheet
/// derives row height from them and the live viewport.
pub fn generate_grid_css(grid: &GridConfig) -> String {
    let layout = GridLayout::compute(grid, 0);
    format!(
        ":root {{\n    --grid-columns: {};\n    --grid-rows: {};\n    --grid-fill: {};\n    \
         --grid-gap: {}px;\n    --grid-scroll-duration: {}s;\n}}",
        layout.columns, layout.rows, grid.fill_factor, grid.gap, grid.scroll_seconds,
    )
}
