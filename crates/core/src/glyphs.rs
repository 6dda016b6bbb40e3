//! Glyph-geometry extraction.
//!
//! Turns a text selection into glyph records: every glyph of every word in
//! line order, with a synthetic `" "` record between consecutive words of a
//! line. The record count is known in closed form before anything is
//! emitted, so page arrays in text mode are streamed without buffering.

use crate::layout::{SelectionLine, TextSelection};
use crate::record::GlyphRecord;
use crate::utils::{HasBBox, Rect};

/// Box of the synthetic space between two words of a line: from the right
/// edge of `cur` to the left edge of `next`, with the vertical extent of `cur`.
pub fn space_between(cur: &Rect, next: &Rect) -> Rect {
    (cur.2, cur.1, next.0, cur.3)
}

#[derive(Debug, Clone, Copy)]
pub struct WordGeometryExtractor<'s, 'p> {
    lines: &'s [SelectionLine<'p>],
}

impl<'s, 'p> WordGeometryExtractor<'s, 'p> {
    pub fn new(selection: &'s TextSelection<'p>) -> Self {
        Self {
            lines: selection.lines(),
        }
    }

    /// Number of records [`Self::records`] yields: all glyphs plus one space
    /// per pair of adjacent words in a line.
    pub fn count_records(&self) -> usize {
        self.lines
            .iter()
            .map(|line| {
                let words = line.words();
                let glyphs: usize = words.iter().map(|w| w.glyph_count()).sum();
                glyphs + words.len().saturating_sub(1)
            })
            .sum()
    }

    pub fn records(&self) -> impl Iterator<Item = GlyphRecord<'p>> + 's {
        self.lines.iter().flat_map(|line| {
            let words = line.words();
            words.iter().enumerate().flat_map(move |(i, &word)| {
                let glyphs = word.glyphs().iter().map(|g| GlyphRecord {
                    bbox: g.bbox,
                    text: &g.text,
                });
                let space = words.get(i + 1).map(|next| GlyphRecord {
                    bbox: space_between(&word.bbox(), &next.bbox()),
                    text: " ",
                });
                glyphs.chain(space)
            })
        })
    }
}
