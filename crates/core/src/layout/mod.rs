//! Text layout for glyph-geometry extraction.
//!
//! This module contains:
//! - Layout parameters (LAParams)
//! - The text output device and the page layout it builds (TextPage)
//! - Rectangle selection over a laid-out page (TextSelection)

pub mod params;
pub mod textpage;

pub use params::LAParams;
pub use textpage::{
    Glyph, SelectionLine, TextLine, TextOutputDevice, TextPage, TextSelection, TextWord,
};
