//! # Showreel
//!
//! A static site generator for personal media portfolios: image, video, meme
//! and app galleries, an endlessly scrolling home grid, and a layer of falling
//! stickers. The asset directories are the data source and a single JSON
//! manifest sits between them and the site.
//!
//! # Architecture: Two Stages Around One Manifest
//!
//! ```text
//! 1. Scan      assets/   →  media-manifest.json   (filesystem → structured data)
//! 2. Generate  manifest  →  dist/                 (final HTML site)
//! ```
//!
//! The manifest is plain JSON and can be edited by hand between the stages.
//! Generation tolerates a broken one: the build still succeeds and the pages
//! show the load error where the galleries would be.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the asset directories, titles and categorizes files, writes the manifest |
//! | [`manifest`] | Lenient manifest reader: bad entries are skipped, not fatal |
//! | [`generate`] | Stage 2: renders every page with Maud |
//! | [`gallery`] | Page kinds, type/category filtering, category discovery |
//! | [`lightbox`] | Open/close/navigate state for the media viewer |
//! | [`grid`] | Home grid sizing and cyclic fill |
//! | [`stickers`] | Sticker rain simulation and its baked CSS animation |
//! | [`hints`] | Resource hints, thumbnail loading priority, GPU hints |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Manifest entry types shared by both stages |
//! | [`naming`] | Titles, slugs and download filenames derived from file names |
//! | [`output`] | CLI output formatting for each command |
//!
//! # Design Decisions
//!
//! ## Decide at Build Time
//!
//! Work a portfolio page would normally do with timers and event handlers is
//! decided once during generation: shuffle order, grid size, sticker paths, lightbox
//! neighbours. Each lightbox position is its own page, so opening, closing and
//! navigating are plain links. The only script is a keyboard binding for the
//! viewer pages.
//!
//! ## Reproducible Randomness
//!
//! Shuffles and sticker trajectories draw from one `StdRng`. Setting
//! `build.seed` in `config.toml` makes two builds byte-identical.

pub mod config;
pub mod gallery;
pub mod generate;
pub mod grid;
pub mod hints;
pub mod lightbox;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod scan;
pub mod stickers;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
