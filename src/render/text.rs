//! Fitting cell text into its content box, and caching text widths.

use std::borrow::Cow;
use std::collections::HashMap;

use super::backend::Surface;

pub const ELLIPSIS: &str = "...";

/// Fit `text` into `max_width` pixels.
///
/// Text that fits is borrowed as is. Otherwise the longest whole-char prefix
/// that fits next to an ellipsis is kept, and when not even one char fits the
/// result is the bare ellipsis.
pub fn fit_text<'a>(
    surface: &mut dyn Surface,
    text: &'a str,
    max_width: f64,
    font: &str,
) -> Cow<'a, str> {
    if surface.measure_text(text, font) <= max_width {
        return Cow::Borrowed(text);
    }
    let room = max_width - surface.measure_text(ELLIPSIS, font);
    if room <= 0.0 {
        return Cow::Borrowed(ELLIPSIS);
    }

    // Byte offset just past each char; prefix widths grow with the offset
    let ends: Vec<usize> = text
        .char_indices()
        .map(|(at, ch)| at + ch.len_utf8())
        .collect();
    let fitting = ends.partition_point(|&end| {
        text.get(..end)
            .is_some_and(|prefix| surface.measure_text(prefix, font) <= room)
    });
    let prefix = fitting
        .checked_sub(1)
        .and_then(|i| ends.get(i))
        .and_then(|&end| text.get(..end))
        .unwrap_or("");
    Cow::Owned(format!("{prefix}{ELLIPSIS}"))
}

/// Text widths per font, flushed wholesale once `capacity` entries are held.
///
/// A paint pass measures the same labels over and over, so a flush only costs
/// one pass worth of re-measuring.
#[derive(Debug, Default)]
pub struct WidthCache {
    fonts: HashMap<String, HashMap<String, f64>>,
    entries: usize,
    capacity: usize,
}

impl WidthCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn width(&self, font: &str, text: &str) -> Option<f64> {
        self.fonts.get(font)?.get(text).copied()
    }

    /// Remember a width. The first width stored for a (font, text) pair wins.
    pub fn remember(&mut self, font: &str, text: &str, width: f64) {
        if self.capacity == 0 || self.width(font, text).is_some() {
            return;
        }
        if self.entries >= self.capacity {
            self.clear();
        }
        self.fonts
            .entry(font.to_string())
            .or_default()
            .insert(text.to_string(), width);
        self.entries += 1;
    }

    pub fn clear(&mut self) {
        self.fonts.clear();
        self.entries = 0;
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::render::recording::RecordingSurface;
    use proptest::prelude::*;

    const FONT: &str = "12px Arial";

    #[test]
    fn fitting_text_is_borrowed() {
        let mut surface = RecordingSurface::with_char_advance(10.0);
        let out = fit_text(&mut surface, "abcd", 40.0, FONT);
        assert!(matches!(out, Cow::Borrowed("abcd")));
    }

    #[test]
    fn keeps_the_longest_prefix_beside_the_ellipsis() {
        let mut surface = RecordingSurface::with_char_advance(10.0);
        // 65px: ellipsis takes 30, leaving room for 3 chars
        assert_eq!(fit_text(&mut surface, "abcdefgh", 65.0, FONT), "abc...");
        // Multi-byte chars are kept whole
        assert_eq!(fit_text(&mut surface, "Zürich Nord", 55.0, FONT), "Zü...");
    }

    #[test]
    fn degrades_to_bare_ellipsis() {
        let mut surface = RecordingSurface::with_char_advance(10.0);
        assert_eq!(fit_text(&mut surface, "abcdefgh", 20.0, FONT), ELLIPSIS);
        assert_eq!(fit_text(&mut surface, "abcdefgh", 0.0, FONT), ELLIPSIS);
        assert_eq!(fit_text(&mut surface, "abcdefgh", 35.0, FONT), ELLIPSIS);
        assert_eq!(fit_text(&mut surface, "", 0.0, FONT), "");
    }

    #[test]
    fn width_cache_keeps_the_first_width() {
        let mut cache = WidthCache::new(2);
        assert_eq!(cache.width("11px Arial", "hello"), None);
        cache.remember("11px Arial", "hello", 12.0);
        cache.remember("11px Arial", "hello", 22.0);
        assert_eq!(cache.width("11px Arial", "hello"), Some(12.0));
        assert_eq!(cache.width("bold 11px Arial", "hello"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn width_cache_flushes_when_full() {
        let mut cache = WidthCache::new(2);
        cache.remember("11px Arial", "a", 1.0);
        cache.remember("bold 11px Arial", "b", 2.0);
        assert_eq!(cache.len(), 2);
        cache.remember("11px Arial", "c", 3.0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.width("11px Arial", "a"), None);
        assert_eq!(cache.width("bold 11px Arial", "b"), None);
        assert_eq!(cache.width("11px Arial", "c"), Some(3.0));
    }

    #[test]
    fn zero_capacity_never_stores() {
        let mut cache = WidthCache::new(0);
        cache.remember("11px Arial", "a", 1.0);
        assert!(cache.is_empty());
    }

    proptest! {
        #[test]
        fn fitted_text_fits_or_is_ellipsis(text in "[a-zé ]{0,40}", max in 0.0f64..300.0) {
            let mut surface = RecordingSurface::with_char_advance(7.0);
            let out = fit_text(&mut surface, &text, max, FONT);
            let width = surface.measure_text(&out, FONT);
            prop_assert!(width <= max || out == ELLIPSIS);
            if out != text {
                prop_assert!(out.ends_with(ELLIPSIS));
                prop_assert!(text.starts_with(out.trim_end_matches('.')));
            }
        }
    }
}
