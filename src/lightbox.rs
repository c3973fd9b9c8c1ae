//! Full-size viewer state machine.
//!
//! A [`Lightbox`] borrows one gallery's entries and is either closed or open
//! on one index of that list. Navigation wraps at both ends. Page scroll is
//! locked exactly while the viewer is open.
//!
//! The generator renders every gallery page from a closed lightbox and every
//! viewer page from one opened on that entry, so the prev/next/close links
//! and the download action in the HTML all come from here.

use crate::gallery::GalleryEntry;
use crate::naming::download_filename;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LightboxError {
    #[error("index {index} out of range for gallery of {len} items")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxState {
    Closed,
    Open(usize),
}

/// Page-level `overflow` the viewer imposes on `<body>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Hidden,
    Auto,
}

impl Overflow {
    /// Body class carrying the lock. `Auto` adds none, so stylesheet rules
    /// such as the open-menu lock still apply.
    pub fn body_class(self) -> Option<&'static str> {
        match self {
            Overflow::Hidden => Some("scroll-locked"),
            Overflow::Auto => None,
        }
    }
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

/// Link target and suggested filename for the download button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadAction {
    pub href: String,
    pub filename: String,
}

#[derive(Debug, Clone)]
pub struct Lightbox<'a> {
    entries: &'a [GalleryEntry],
    state: LightboxState,
}

impl<'a> Lightbox<'a> {
    pub fn new(entries: &'a [GalleryEntry]) -> Self {
        Self {
            entries,
            state: LightboxState::Closed,
        }
    }

    pub fn state(&self) -> LightboxState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open(_))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Show the entry at `index`. An invalid index leaves the state untouched.
    pub fn open(&mut self, index: usize) -> Result<&'a GalleryEntry, LightboxError> {
        let entries = self.entries;
        let entry = entries.get(index).ok_or(LightboxError::OutOfRange {
            index,
            len: entries.len(),
        })?;
        self.state = LightboxState::Open(index);
        Ok(entry)
    }

    /// Hide the viewer and release the current media.
    pub fn close(&mut self) {
        self.state = LightboxState::Closed;
    }

    /// Move by `delta` positions, wrapping around either end.
    /// Does nothing while closed.
    pub fn navigate(&mut self, delta: isize) -> Option<&'a GalleryEntry> {
        let LightboxState::Open(index) = self.state else {
            return None;
        };
        let next = self.offset(index, delta);
        self.state = LightboxState::Open(next);
        self.entries.get(next)
    }

    /// Apply a key press. Returns whether the viewer consumed it.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            Key::Escape => {
                self.close();
                true
            }
            Key::ArrowLeft => {
                self.navigate(-1);
                true
            }
            Key::ArrowRight => {
                self.navigate(1);
                true
            }
            Key::Other => false,
        }
    }

    pub fn current(&self) -> Option<&'a GalleryEntry> {
        match self.state {
            LightboxState::Open(index) => self.entries.get(index),
            LightboxState::Closed => None,
        }
    }

    pub fn overflow(&self) -> Overflow {
        if self.is_open() {
            Overflow::Hidden
        } else {
            Overflow::Auto
        }
    }

    /// Download action for the current entry.
    pub fn download(&self) -> Option<DownloadAction> {
        let entry = self.current()?;
        Some(DownloadAction {
            href: entry.src.clone(),
            filename: download_filename(
                entry.item.title.as_deref(),
                entry.item.media_type,
                entry.index,
                &entry.src,
            ),
        })
    }

    /// Indices `(previous, next)` of the current entry, without moving.
    pub fn neighbors(&self) -> Option<(usize, usize)> {
        let LightboxState::Open(index) = self.state else {
            return None;
        };
        Some((self.offset(index, -1), self.offset(index, 1)))
    }

    fn offset(&self, index: usize, delta: isize) -> usize {
        let len = self.entries.len() as isize;
        (index as isize + delta).rem_euclid(len) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryConfig;
    use crate::gallery::{PageKind, build_gallery};
    use crate::test_helpers::*;
    use crate::types::MediaType;

    fn entries(n: usize) -> Vec<GalleryEntry> {
        let items: Vec<_> = (0..n).map(|i| image(&format!("{i}.webp"), "x")).collect();
        build_gallery(PageKind::Images, &items, None, &CategoryConfig::default()).entries
    }

    #[test]
    fn starts_closed_with_scroll() {
        let e = entries(3);
        let lb = Lightbox::new(&e);
        assert_eq!(lb.state(), LightboxState::Closed);
        assert_eq!(lb.overflow(), Overflow::Auto);
        assert!(lb.current().is_none());
        assert!(lb.download().is_none());
    }

    #[test]
    fn open_locks_scroll_and_sets_current() {
        let e = entries(3);
        let mut lb = Lightbox::new(&e);
        let entry = lb.open(1).unwrap();
        assert_eq!(entry.src, "1.webp");
        assert_eq!(lb.state(), LightboxState::Open(1));
        assert_eq!(lb.overflow(), Overflow::Hidden);
    }

    #[test]
    fn only_the_lock_adds_a_body_class() {
        assert_eq!(Overflow::Hidden.body_class(), Some("scroll-locked"));
        assert_eq!(Overflow::Auto.body_class(), None);
    }

    #[test]
    fn open_out_of_range_is_error_and_keeps_state() {
        let e = entries(2);
        let mut lb = Lightbox::new(&e);
        lb.open(0).unwrap();
        assert_eq!(lb.open(2).unwrap_err(), LightboxError::OutOfRange { index: 2, len: 2 });
        assert_eq!(lb.state(), LightboxState::Open(0));
    }

    #[test]
    fn open_on_empty_gallery_fails() {
        let mut lb = Lightbox::new(&[]);
        assert!(lb.open(0).is_err());
        assert!(!lb.is_open());
    }

    #[test]
    fn close_restores_scroll_from_any_state() {
        let e = entries(3);
        let mut lb = Lightbox::new(&e);
        lb.close();
        assert_eq!(lb.overflow(), Overflow::Auto);
        for i in 0..3 {
            lb.open(i).unwrap();
            lb.close();
            assert_eq!(lb.state(), LightboxState::Closed);
            assert_eq!(lb.overflow(), Overflow::Auto);
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[test]
    fn navigate_wraps_forward_and_back() {
        for n in 1..6 {
            let e = entries(n);
            let mut lb = Lightbox::new(&e);
            lb.open(n - 1).unwrap();
            lb.navigate(1);
            assert_eq!(lb.state(), LightboxState::Open(0), "n={n}");
            lb.navigate(-1);
            assert_eq!(lb.state(), LightboxState::Open(n - 1), "n={n}");
        }
    }

    #[test]
    fn navigate_while_closed_is_noop() {
        let e = entries(3);
        let mut lb = Lightbox::new(&e);
        assert!(lb.navigate(1).is_none());
        assert_eq!(lb.state(), LightboxState::Closed);
    }

    #[test]
    fn single_item_wraps_to_itself() {
        let e = entries(1);
        let mut lb = Lightbox::new(&e);
        lb.open(0).unwrap();
        assert_eq!(lb.navigate(1).unwrap().index, 0);
        assert_eq!(lb.neighbors(), Some((0, 0)));
    }

    #[test]
    fn neighbors_do_not_move() {
        let e = entries(4);
        let mut lb = Lightbox::new(&e);
        assert_eq!(lb.neighbors(), None);
        lb.open(0).unwrap();
        assert_eq!(lb.neighbors(), Some((3, 1)));
        assert_eq!(lb.state(), LightboxState::Open(0));
    }

    // =========================================================================
    // Keys
    // =========================================================================

    #[test]
    fn keys_ignored_while_closed() {
        let e = entries(3);
        let mut lb = Lightbox::new(&e);
        assert!(!lb.handle_key(Key::ArrowRight));
        assert!(!lb.handle_key(Key::Escape));
        assert_eq!(lb.state(), LightboxState::Closed);
    }

    #[test]
    fn keys_navigate_and_close() {
        let e = entries(3);
        let mut lb = Lightbox::new(&e);
        lb.open(2).unwrap();
        assert!(lb.handle_key(Key::ArrowRight));
        assert_eq!(lb.state(), LightboxState::Open(0));
        assert!(lb.handle_key(Key::ArrowLeft));
        assert_eq!(lb.state(), LightboxState::Open(2));
        assert!(!lb.handle_key(Key::Other));
        assert!(lb.handle_key(Key::Escape));
        assert_eq!(lb.overflow(), Overflow::Auto);
    }

    #[test]
    fn dom_key_names() {
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_dom("Right"), Key::ArrowRight);
        assert_eq!(Key::from_dom("a"), Key::Other);
    }

    #[test]
    fn example_open_right_left_returns_to_same_item() {
        let items = vec![bare(MediaType::Image, "a.webp"), bare(MediaType::Video, "b.mp4")];
        let gallery = build_gallery(PageKind::Images, &items, None, &CategoryConfig::default());
        let mut lb = Lightbox::new(&gallery.entries);
        lb.open(0).unwrap();
        lb.handle_key(Key::ArrowRight);
        lb.handle_key(Key::ArrowLeft);
        assert_eq!(lb.current().unwrap().src, "a.webp");
    }

    // =========================================================================
    // Download
    // =========================================================================

    #[test]
    fn download_uses_src_and_derived_name() {
        let mut item = image("assets/images/gh.png", "x");
        item.title = Some("Golden Hour".into());
        let g = build_gallery(PageKind::Images, &[item], None, &CategoryConfig::default());
        let mut lb = Lightbox::new(&g.entries);
        lb.open(0).unwrap();
        assert_eq!(
            lb.download(),
            Some(DownloadAction {
                href: "assets/images/gh.png".into(),
                filename: "golden-hour.png".into(),
            })
        );
    }
}
