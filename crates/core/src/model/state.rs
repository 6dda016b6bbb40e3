//! Graphics and text state carried by the content-stream interpreter.

use std::sync::Arc;

use super::font::PdfFont;
use crate::utils::{MATRIX_IDENTITY, Matrix};

/// Text state parameters (PDF 32000 §9.3) plus the text and line matrices.
#[derive(Debug, Clone)]
pub struct TextState {
    /// Current font (None before the first usable `Tf`)
    pub font: Option<Arc<PdfFont>>,
    pub fontsize: f64,
    /// Character spacing (`Tc`)
    pub charspace: f64,
    /// Word spacing (`Tw`), applied to single-byte code 32
    pub wordspace: f64,
    /// Horizontal scaling percentage (`Tz`)
    pub scaling: f64,
    /// Leading (`TL`), stored as given
    pub leading: f64,
    pub render: i32,
    pub rise: f64,
    /// Text matrix (Tm)
    pub matrix: Matrix,
    /// Text line matrix (Tlm)
    pub linematrix: Matrix,
}

impl TextState {
    pub fn new() -> Self {
        Self {
            font: None,
            fontsize: 0.0,
            charspace: 0.0,
            wordspace: 0.0,
            scaling: 100.0,
            leading: 0.0,
            render: 0,
            rise: 0.0,
            matrix: MATRIX_IDENTITY,
            linematrix: MATRIX_IDENTITY,
        }
    }

    /// Resets both matrices; called by `BT`.
    pub const fn reset(&mut self) {
        self.matrix = MATRIX_IDENTITY;
        self.linematrix = MATRIX_IDENTITY;
    }

    /// Horizontal scaling as a factor.
    pub fn hscale(&self) -> f64 {
        self.scaling * 0.01
    }
}

impl Default for TextState {
    fn default() -> Self {
        Self::new()
    }
}

/// Graphics state entries saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
pub struct GraphicState {
    pub ctm: Matrix,
    pub text: TextState,
}
