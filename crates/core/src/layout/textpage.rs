//! Text layout: glyphs grouped into words and lines, and rectangle selection.
//!
//! Glyphs are grouped in content-stream order. A glyph continues the current
//! line when it is horizontally aligned with the previous glyph:
//!
//! ```text
//!   +------+ - - -
//!   | obj0 | - - +------+   -
//!   |      |     | obj1 |   | (line_overlap)
//!   +------+ - - |      |   -
//!          - - - +------+
//!          |<--->|
//!        (char_margin)
//! ```
//!
//! Within a line a new word starts after a whitespace glyph, when the gap to
//! the previous glyph exceeds `word_margin` times the glyph size, or when the
//! text moves backwards. Whitespace glyphs only separate words; they are not
//! kept.

use super::params::LAParams;
use crate::interp::device::{Device, RenderedChar};
use crate::utils::{HasBBox, Matrix, Rect, rect_contains, union_rect};

/// A glyph with its device-space box.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub bbox: Rect,
    pub text: String,
}

impl HasBBox for Glyph {
    fn bbox(&self) -> Rect {
        self.bbox
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextWord {
    glyphs: Vec<Glyph>,
    bbox: Rect,
}

impl TextWord {
    fn new(glyph: Glyph) -> Self {
        Self {
            bbox: glyph.bbox,
            glyphs: vec![glyph],
        }
    }

    fn push(&mut self, glyph: Glyph) {
        self.bbox = union_rect(self.bbox, glyph.bbox);
        self.glyphs.push(glyph);
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn text(&self) -> String {
        self.glyphs.iter().map(|g| g.text.as_str()).collect()
    }
}

impl HasBBox for TextWord {
    fn bbox(&self) -> Rect {
        self.bbox
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    words: Vec<TextWord>,
}

impl TextLine {
    pub fn words(&self) -> &[TextWord] {
        &self.words
    }
}

/// Layout result of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPage {
    lines: Vec<TextLine>,
}

impl TextPage {
    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Words having at least one glyph centre inside `rect`, grouped by line.
    /// Lines without selected words are left out.
    pub fn select(&self, rect: Rect) -> TextSelection<'_> {
        let lines = self
            .lines
            .iter()
            .filter_map(|line| {
                let words: Vec<&TextWord> = line
                    .words
                    .iter()
                    .filter(|word| word.glyphs.iter().any(|g| rect_contains(rect, g.center())))
                    .collect();
                (!words.is_empty()).then_some(SelectionLine { words })
            })
            .collect();
        TextSelection { lines }
    }
}

/// Words selected from a [`TextPage`], by line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSelection<'p> {
    lines: Vec<SelectionLine<'p>>,
}

impl<'p> TextSelection<'p> {
    pub fn lines(&self) -> &[SelectionLine<'p>] {
        &self.lines
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionLine<'p> {
    words: Vec<&'p TextWord>,
}

impl<'p> SelectionLine<'p> {
    pub fn words(&self) -> &[&'p TextWord] {
        &self.words
    }
}

/// Device building a [`TextPage`] from shown glyphs.
#[derive(Debug, Default)]
pub struct TextOutputDevice {
    laparams: LAParams,
    lines: Vec<TextLine>,
    line: Vec<TextWord>,
    word: Option<TextWord>,
    /// Box of the previous glyph, whitespace included
    prev: Option<Rect>,
}

impl TextOutputDevice {
    pub fn new(laparams: LAParams) -> Self {
        Self {
            laparams,
            ..Self::default()
        }
    }

    /// Returns the page built so far and resets the device.
    pub fn take_page(&mut self) -> TextPage {
        self.finish_line();
        self.prev = None;
        TextPage {
            lines: std::mem::take(&mut self.lines),
        }
    }

    fn finish_word(&mut self) {
        if let Some(word) = self.word.take() {
            self.line.push(word);
        }
    }

    fn finish_line(&mut self) {
        self.finish_word();
        if !self.line.is_empty() {
            self.lines.push(TextLine {
                words: std::mem::take(&mut self.line),
            });
        }
    }

    fn is_halign(&self, prev: &Rect, bbox: &Rect) -> bool {
        prev.height().min(bbox.height()) * self.laparams.line_overlap < prev.voverlap(bbox)
            && prev.hdistance(bbox) < prev.width().max(bbox.width()) * self.laparams.char_margin
    }

    fn add_glyph(&mut self, bbox: Rect, text: &str) {
        if text.is_empty() {
            return;
        }
        let whitespace = text.chars().all(char::is_whitespace);
        match self.prev {
            Some(prev) if self.is_halign(&prev, &bbox) => {
                let margin = self.laparams.word_margin * bbox.width().max(bbox.height());
                if bbox.0 - prev.2 > margin || bbox.0 < prev.0 {
                    self.finish_word();
                }
            }
            Some(_) => self.finish_line(),
            None => {}
        }
        self.prev = Some(bbox);

        if whitespace {
            self.finish_word();
            return;
        }
        let glyph = Glyph {
            bbox,
            text: text.to_string(),
        };
        match &mut self.word {
            Some(word) => word.push(glyph),
            None => self.word = Some(TextWord::new(glyph)),
        }
    }
}

impl Device for TextOutputDevice {
    fn begin_page(&mut self, _bbox: Rect, _ctm: Matrix) {
        self.lines.clear();
        self.line.clear();
        self.word = None;
        self.prev = None;
    }

    fn end_page(&mut self) {
        self.finish_line();
    }

    fn draw_char(&mut self, glyph: &RenderedChar) {
        self.add_glyph(glyph.bbox, &glyph.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::WHOLE_PLANE;

    fn page_of(glyphs: &[(Rect, &str)]) -> TextPage {
        let mut device = TextOutputDevice::new(LAParams::default());
        for (bbox, text) in glyphs {
            device.add_glyph(*bbox, text);
        }
        device.take_page()
    }

    fn words(page: &TextPage) -> Vec<Vec<String>> {
        page.lines()
            .iter()
            .map(|l| l.words().iter().map(TextWord::text).collect())
            .collect()
    }

    #[test]
    fn test_adjacent_glyphs_form_one_word() {
        let page = page_of(&[
            ((0.0, 0.0, 5.0, 10.0), "a"),
            ((5.0, 0.0, 10.0, 10.0), "b"),
            ((10.0, 0.0, 15.0, 10.0), "c"),
        ]);
        assert_eq!(words(&page), vec![vec!["abc".to_string()]]);
        assert_eq!(page.lines()[0].words()[0].bbox(), (0.0, 0.0, 15.0, 10.0));
    }

    #[test]
    fn test_space_glyph_splits_words_and_is_dropped() {
        let page = page_of(&[
            ((0.0, 0.0, 5.0, 10.0), "a"),
            ((5.0, 0.0, 8.0, 10.0), " "),
            ((8.0, 0.0, 13.0, 10.0), "b"),
        ]);
        assert_eq!(words(&page), vec![vec!["a".to_string(), "b".to_string()]]);
        assert_eq!(page.lines()[0].words()[1].glyph_count(), 1);
    }

    #[test]
    fn test_gap_splits_words() {
        let page = page_of(&[((0.0, 0.0, 5.0, 10.0), "a"), ((8.0, 0.0, 13.0, 10.0), "b")]);
        assert_eq!(words(&page), vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_vertical_move_starts_new_line() {
        let page = page_of(&[((0.0, 0.0, 5.0, 10.0), "a"), ((0.0, 20.0, 5.0, 30.0), "b")]);
        assert_eq!(words(&page), vec![vec!["a".to_string()], vec!["b".to_string()]]);
    }

    #[test]
    fn test_selection_keeps_words_with_centre_inside() {
        let page = page_of(&[
            ((0.0, 0.0, 5.0, 10.0), "a"),
            ((12.0, 0.0, 17.0, 10.0), "b"),
        ]);
        let all = page.select(WHOLE_PLANE);
        assert_eq!(all.lines().len(), 1);
        assert_eq!(all.lines()[0].words().len(), 2);

        let left = page.select((0.0, 0.0, 10.0, 10.0));
        assert_eq!(left.lines()[0].words().len(), 1);
        assert_eq!(left.lines()[0].words()[0].text(), "a");

        assert!(page.select((100.0, 100.0, 200.0, 200.0)).lines().is_empty());
    }

    #[test]
    fn test_empty_page() {
        let page = page_of(&[]);
        assert!(page.lines().is_empty());
        assert!(page.select(WHOLE_PLANE).lines().is_empty());
    }
}
