//! Filename and title conventions.
//!
//! Three conversions live here so every stage agrees on them:
//!
//! - **Display titles** from asset filenames (`format_title`), used by `scan`:
//!   - `By_charlie-sunset.webp` → "Charlie Sunset"
//!   - `couch2.mp4` → "Couch 2"
//!   - `post-cat-a1b2c3d4e5f6.png` → "Cat"
//! - **Slugs** for category page names (`slugify`): `Street Art!` → `street-art`
//! - **Download filenames** for the lightbox download action (`download_filename`)

use crate::types::MediaType;
use std::path::Path;

/// Words longer than this that are purely alphanumeric are treated as hashes.
const HASH_WORD_LEN: usize = 10;

const MAX_SLUG_LEN: usize = 80;

/// Build a readable title from an asset filename.
///
/// The extension is dropped, `_` and `-` become spaces, and every word is
/// capitalized (first letter upper, rest lower). Then:
/// - a leading `By ` or `Post ` is removed
/// - a trailing alphanumeric word of more than 10 chars is dropped, unless it
///   is the only word
/// - a single trailing digit glued to a word is split off (`Couch2` → `Couch 2`)
pub fn format_title(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let mut words: Vec<String> = stem
        .replace(['_', '-'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect();

    if words.first().is_some_and(|w| w == "By") {
        words.remove(0);
    }
    if words.first().is_some_and(|w| w == "Post") {
        words.remove(0);
    }

    if words.len() > 1
        && let Some(last) = words.last()
        && last.chars().count() > HASH_WORD_LEN
        && last.chars().all(char::is_alphanumeric)
    {
        words.pop();
    }

    let mut title = words.join(" ");
    let chars: Vec<char> = title.chars().collect();
    if let [.., before, last] = chars.as_slice()
        && last.is_ascii_digit()
        && !before.is_ascii_digit()
        && !before.is_whitespace()
    {
        let digit = *last;
        title.pop();
        title.push(' ');
        title.push(digit);
    }
    title
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Lowercase, URL-safe slug: ASCII alphanumerics kept, everything else
/// collapsed into single dashes, trimmed, capped at a word boundary.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_dash = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    let trimmed = slug.trim_end_matches('-');

    if trimmed.len() <= MAX_SLUG_LEN {
        return trimmed.to_string();
    }
    let cut = &trimmed[..MAX_SLUG_LEN];
    match cut.rfind('-') {
        Some(pos) if pos > 0 => cut[..pos].to_string(),
        _ => cut.to_string(),
    }
}

/// Filename offered by the lightbox download action.
///
/// `title` (or `"<media_type>-<index>"` when absent) is lowercased with
/// whitespace runs turned into single dashes, then the extension of `src`
/// is appended. A `src` without an extension falls back to the media type's
/// default (`webp` / `mp4`).
pub fn download_filename(
    title: Option<&str>,
    media_type: MediaType,
    index: usize,
    src: &str,
) -> String {
    let base = match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => t
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase(),
        None => format!("{media_type}-{index}"),
    };
    let ext = Path::new(src)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .unwrap_or(media_type.default_extension());
    format!("{base}.{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // format_title
    // =========================================================================

    #[test]
    fn title_replaces_separators_and_capitalizes() {
        assert_eq!(format_title("golden_hour-at-the_lake.jpg"), "Golden Hour At The Lake");
    }

    #[test]
    fn title_lowercases_rest_of_word() {
        assert_eq!(format_title("LOUD-NOISES.png"), "Loud Noises");
    }

    #[test]
    fn title_strips_by_prefix() {
        assert_eq!(format_title("by_charlie-sunset.webp"), "Charlie Sunset");
    }

    #[test]
    fn title_strips_post_prefix() {
        assert_eq!(format_title("post-late-night.jpg"), "Late Night");
    }

    #[test]
    fn title_strips_both_prefixes_in_order() {
        assert_eq!(format_title("By_post_cat.jpg"), "Cat");
    }

    #[test]
    fn title_drops_trailing_hash() {
        assert_eq!(format_title("memedeck-a1b2c3d4e5f6.png"), "Memedeck");
    }

    #[test]
    fn title_keeps_exactly_ten_char_word() {
        assert_eq!(format_title("cat-abcdefghij.png"), "Cat Abcdefghij");
    }

    #[test]
    fn title_keeps_single_long_word() {
        assert_eq!(format_title("lordworldpeace.jpg"), "Lordworldpeace");
    }

    #[test]
    fn title_splits_trailing_digit() {
        assert_eq!(format_title("couch2.mp4"), "Couch 2");
    }

    #[test]
    fn title_leaves_multi_digit_suffix() {
        assert_eq!(format_title("couch22.mp4"), "Couch22");
    }

    #[test]
    fn title_leaves_spaced_digit() {
        assert_eq!(format_title("couch_2.mp4"), "Couch 2");
    }

    #[test]
    fn title_of_single_char_is_unchanged() {
        assert_eq!(format_title("7.png"), "7");
        assert_eq!(format_title("x.png"), "X");
    }

    #[test]
    fn title_of_empty_stem_is_empty() {
        assert_eq!(format_title("__.png"), "");
    }

    // =========================================================================
    // slugify
    // =========================================================================

    #[test]
    fn slug_lowercases_and_dashes() {
        assert_eq!(slugify("Street Art!"), "street-art");
        assert_eq!(slugify("landscape"), "landscape");
    }

    #[test]
    fn slug_collapses_and_trims() {
        assert_eq!(slugify("  --a   b--  "), "a-b");
        assert_eq!(slugify("@#$"), "");
    }

    #[test]
    fn slug_drops_non_ascii() {
        assert_eq!(slugify("café"), "caf");
    }

    #[test]
    fn slug_truncates_at_word_boundary() {
        let long = "word ".repeat(30);
        let slug = slugify(&long);
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(slug.ends_with("word"));
    }

    // =========================================================================
    // download_filename
    // =========================================================================

    #[test]
    fn download_uses_title_and_src_extension() {
        assert_eq!(
            download_filename(Some("Golden  Hour"), MediaType::Image, 0, "assets/images/gh.JPG"),
            "golden-hour.JPG"
        );
    }

    #[test]
    fn download_falls_back_to_kind_and_index() {
        assert_eq!(
            download_filename(None, MediaType::Video, 3, "assets/videos/clip.webm"),
            "video-3.webm"
        );
        assert_eq!(
            download_filename(Some("   "), MediaType::Image, 1, "a.png"),
            "image-1.png"
        );
    }

    #[test]
    fn download_defaults_extension_by_type() {
        assert_eq!(download_filename(Some("A"), MediaType::Image, 0, "noext"), "a.webp");
        assert_eq!(download_filename(Some("B"), MediaType::Video, 0, "dir/noext"), "b.mp4");
    }
}
