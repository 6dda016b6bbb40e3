//! Output devices driven by the page interpreter.
//!
//! A device receives painted paths and shown glyphs in paint order. Path
//! geometry stays in user space and comes with the CTM in effect when the
//! path was painted; glyph boxes are already in device space.

use crate::model::{GfxPath, PathKind};
use crate::utils::{Matrix, Rect};

/// A glyph shown by a text operator, mapped to device space.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChar {
    /// Glyph box from descent to ascent, normalised so x0 <= x1 and y0 <= y1
    pub bbox: Rect,
    /// Unicode text of the glyph, or a `(cid:N)` placeholder
    pub text: String,
    /// Font size in device space
    pub size: f64,
}

/// Output interface for page interpretation.
pub trait Device {
    /// Whether device space has its origin at the top-left corner.
    fn upside_down(&self) -> bool {
        true
    }

    /// Whether Type 3 glyph procedures are executed (their paths painted).
    fn interprets_type3_chars(&self) -> bool {
        false
    }

    /// Begin processing a page. `bbox` is the crop box in default user space.
    fn begin_page(&mut self, _bbox: Rect, _ctm: Matrix) {}

    fn end_page(&mut self) {}

    /// Paint a path with the given rule. `B`-style operators call this twice,
    /// fill first.
    fn paint_path(&mut self, _kind: PathKind, _ctm: &Matrix, _path: &GfxPath) {}

    fn draw_char(&mut self, _glyph: &RenderedChar) {}
}

/// Device that discards everything; used to exercise the engine alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopDevice;

impl Device for NopDevice {
    fn upside_down(&self) -> bool {
        false
    }

    fn interprets_type3_chars(&self) -> bool {
        true
    }
}
