//! Graphics state operators.
//!
//! Handles: q, Q, cm
//!
//! Line style, colour and rendering parameters do not affect geometry and
//! are ignored by the dispatcher.

use crate::interp::device::Device;
use crate::interp::interpreter::PageInterpreter;
use crate::model::GraphicState;
use crate::utils::mult_matrix;

#[allow(non_snake_case)]
impl<'a, D: Device> PageInterpreter<'a, D> {
    /// Saves the current graphics state to the stack.
    ///
    /// PDF operator: `q`
    pub fn do_q(&mut self) {
        self.gstack.push(GraphicState {
            ctm: self.ctm,
            text: self.textstate.clone(),
        });
    }

    /// Restores the graphics state from the stack. An unbalanced `Q` is
    /// ignored.
    ///
    /// PDF operator: `Q`
    pub fn do_Q(&mut self) {
        if let Some(state) = self.gstack.pop() {
            self.ctm = state.ctm;
            self.textstate = state.text;
        }
    }

    /// Concatenates a matrix to the current transformation matrix.
    ///
    /// PDF operator: `cm`
    pub fn do_cm(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.ctm = mult_matrix((a, b, c, d, e, f), self.ctm);
    }
}
