//! Layout analysis parameters.

/// Parameters for grouping glyphs into words and lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LAParams {
    /// If two characters have more overlap than this they are considered to be
    /// on the same line. Specified relative to the minimum height of both characters.
    pub line_overlap: f64,

    /// If two characters are closer together than this margin they are considered
    /// part of the same line. Specified relative to the width of the character.
    pub char_margin: f64,

    /// If two characters on the same line are further apart than this margin then
    /// they are considered to be two separate words. Specified relative to the
    /// width of the character.
    pub word_margin: f64,
}

impl Default for LAParams {
    fn default() -> Self {
        Self {
            line_overlap: 0.5,
            char_margin: 2.0,
            word_margin: 0.1,
        }
    }
}

impl LAParams {
    pub const fn new(line_overlap: f64, char_margin: f64, word_margin: f64) -> Self {
        Self {
            line_overlap,
            char_margin,
            word_margin,
        }
    }
}
