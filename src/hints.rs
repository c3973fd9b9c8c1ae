//! Page-load performance hints.
//!
//! All of these are decided at build time and land in the markup: resource
//! hints in `<head>`, `loading`/`decoding` attributes on thumbnails, and a
//! small block of `will-change` rules.

use maud::{Markup, html};

/// `loading` attribute for a thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loading {
    Eager,
    Lazy,
}

impl Loading {
    /// The first `eager` thumbnails of a page load immediately, the rest lazily.
    pub fn for_position(index: usize, eager: usize) -> Self {
        if index < eager {
            Loading::Eager
        } else {
            Loading::Lazy
        }
    }

    pub fn as_attr(self) -> &'static str {
        match self {
            Loading::Eager => "eager",
            Loading::Lazy => "lazy",
        }
    }
}

/// `dns-prefetch` and `preconnect` links for each origin.
pub fn resource_hints(origins: &[String]) -> Markup {
    html! {
        @for origin in origins {
            link rel="dns-prefetch" href=(origin);
            link rel="preconnect" href=(origin) crossorigin;
        }
    }
}

/// Compositor hints for the elements that animate, plus smooth scrolling
/// when the user has not asked for reduced motion.
pub fn acceleration_css() -> &'static str {
    r#".gallery-item, .grid-section, .sticker { will-change: transform; }
.modal, .modal-content { will-change: opacity, transform; }
@media (prefers-reduced-motion: no-preference) {
    html { scroll-behavior: smooth; }
}
@media (prefers-reduced-motion: reduce) {
    .image-grid { animation: none; }
    .gallery-item { animation: none; opacity: 1; }
}"#
}
