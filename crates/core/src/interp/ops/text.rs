//! Text operators.
//!
//! Handles: BT, ET, Tc, Tw, Tz, TL, Tf, Tr, Ts, Td, TD, Tm, T*, Tj, TJ, ', "
//!
//! Every shown glyph is reported to the device as a device-space box
//! spanning the font's descent to ascent and the glyph's advance width.

use crate::interp::device::{Device, RenderedChar};
use crate::interp::interpreter::{PageInterpreter, string_of};
use crate::interp::lexer::Operand;
use crate::model::{FontKind, PdfFont};
use crate::utils::{Matrix, apply_matrix_rect, mult_matrix, translate_matrix};

#[allow(non_snake_case)]
impl<'a, D: Device> PageInterpreter<'a, D> {
    // ========================================================================
    // Text Object Operators
    // ========================================================================

    /// BT - Begin text object; resets the text and line matrices.
    pub const fn do_BT(&mut self) {
        self.textstate.reset();
    }

    /// ET - End text object.
    pub const fn do_ET(&mut self) {}

    // ========================================================================
    // Text State Operators
    // ========================================================================

    /// Tc - Set character spacing.
    pub const fn do_Tc(&mut self, charspace: f64) {
        self.textstate.charspace = charspace;
    }

    /// Tw - Set word spacing.
    pub const fn do_Tw(&mut self, wordspace: f64) {
        self.textstate.wordspace = wordspace;
    }

    /// Tz - Set horizontal scaling (percent).
    pub const fn do_Tz(&mut self, scaling: f64) {
        self.textstate.scaling = scaling;
    }

    /// TL - Set text leading.
    pub const fn do_TL(&mut self, leading: f64) {
        self.textstate.leading = leading;
    }

    /// Tf - Set text font and size.
    ///
    /// An unknown font name keeps the previous font but still sets the size,
    /// so positioning stays consistent.
    pub fn do_Tf(&mut self, fontid: &[u8], fontsize: f64) {
        let font = self
            .resource_entry(b"Font", fontid)
            .and_then(|entry| self.rsrcmgr.get_font(self.doc, &entry));
        match font {
            Some(font) => self.textstate.font = Some(font),
            None => tracing::warn!("unknown font resource /{}", String::from_utf8_lossy(fontid)),
        }
        self.textstate.fontsize = fontsize;
    }

    /// Tr - Set text rendering mode. Invisible text is still reported.
    pub const fn do_Tr(&mut self, render: i32) {
        self.textstate.render = render;
    }

    /// Ts - Set text rise.
    pub const fn do_Ts(&mut self, rise: f64) {
        self.textstate.rise = rise;
    }

    // ========================================================================
    // Text Positioning Operators
    // ========================================================================

    /// Td - Move to the start of the next line, offset by (tx, ty).
    pub fn do_Td(&mut self, tx: f64, ty: f64) {
        self.textstate.linematrix = translate_matrix(self.textstate.linematrix, (tx, ty));
        self.textstate.matrix = self.textstate.linematrix;
    }

    /// TD - Same as Td, and sets the leading to -ty.
    pub fn do_TD(&mut self, tx: f64, ty: f64) {
        self.textstate.leading = -ty;
        self.do_Td(tx, ty);
    }

    /// Tm - Set text matrix and text line matrix.
    pub const fn do_Tm(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.textstate.matrix = (a, b, c, d, e, f);
        self.textstate.linematrix = (a, b, c, d, e, f);
    }

    /// T* - Move to the start of the next line using the leading.
    pub fn do_T_star(&mut self) {
        self.do_Td(0.0, -self.textstate.leading);
    }

    // ========================================================================
    // Text Showing Operators
    // ========================================================================

    /// Tj - Show text string.
    pub fn do_Tj(&mut self, s: &[u8]) {
        self.show_string(s);
    }

    /// TJ - Show text with individual glyph positioning. Numbers move the
    /// pen left by thousandths of the font size.
    pub fn do_TJ(&mut self, seq: &[Operand]) {
        for item in seq {
            if let Some(s) = string_of(item) {
                self.show_string(s);
            } else if let Some(adjust) = item.as_f64() {
                let tx = -adjust * 0.001 * self.textstate.fontsize * self.textstate.hscale();
                self.textstate.matrix = translate_matrix(self.textstate.matrix, (tx, 0.0));
            }
        }
    }

    /// ' - Move to next line and show text.
    pub fn do_quote(&mut self, s: &[u8]) {
        self.do_T_star();
        self.show_string(s);
    }

    /// " - Set word and character spacing, move to next line and show text.
    pub fn do_doublequote(&mut self, aw: f64, ac: f64, s: &[u8]) {
        self.do_Tw(aw);
        self.do_Tc(ac);
        self.do_quote(s);
    }

    // ========================================================================
    // Glyph Rendering
    // ========================================================================

    /// Text space to device space for the current text state.
    fn text_rendering_matrix(&self) -> Matrix {
        let ts = &self.textstate;
        let params = (ts.fontsize * ts.hscale(), 0.0, 0.0, ts.fontsize, 0.0, ts.rise);
        mult_matrix(mult_matrix(params, ts.matrix), self.ctm)
    }

    fn show_string(&mut self, data: &[u8]) {
        let Some(font) = self.textstate.font.clone() else {
            tracing::debug!("text shown without a font");
            return;
        };
        let run_type3 = font.kind() == FontKind::Type3 && self.device.interprets_type3_chars();
        for (code, len) in font.decode(data) {
            let width = font.char_width(code);
            let trm = self.text_rendering_matrix();
            if run_type3 {
                self.render_type3_glyph(&font, code, mult_matrix(font.font_matrix(), trm));
            }
            self.device.draw_char(&RenderedChar {
                bbox: apply_matrix_rect(trm, (0.0, font.descent(), width, font.ascent())),
                text: font.glyph_text(code),
                size: trm.2.hypot(trm.3),
            });
            self.advance(&font, code, len, width);
        }
    }

    /// Moves the text matrix past one glyph.
    fn advance(&mut self, font: &PdfFont, code: u32, len: usize, width: f64) {
        let ts = &self.textstate;
        let mut tx = width * ts.fontsize + ts.charspace;
        if len == 1 && code == 32 && !font.is_multibyte() {
            tx += ts.wordspace;
        }
        tx *= ts.hscale();
        self.textstate.matrix = translate_matrix(self.textstate.matrix, (tx, 0.0));
    }
}
