//! Path construction and painting operators.
//!
//! Handles: m, l, c, v, y, h, re, S, s, f, F, f*, B, B*, b, b*, n
//!
//! Path construction:
//! - m: Move to
//! - l: Line to
//! - c, v, y: Bezier curves (cubic variants)
//! - h: Close subpath
//! - re: Rectangle shorthand
//!
//! Path painting:
//! - S/s: Stroke (s closes first)
//! - f/F/f*: Fill (F is legacy, f* uses even-odd rule)
//! - B/B*/b/b*: Fill then stroke
//! - n: End path without painting

use crate::interp::device::Device;
use crate::interp::interpreter::PageInterpreter;
use crate::model::PathKind;

#[allow(non_snake_case)]
impl<'a, D: Device> PageInterpreter<'a, D> {
    // ========================================================================
    // Path Construction Operators
    // ========================================================================

    /// Begins a new subpath at the given point.
    ///
    /// PDF operator: `m`
    pub fn do_m(&mut self, x: f64, y: f64) {
        self.curpath.move_to(x, y);
    }

    /// Appends a straight line segment from the current point.
    ///
    /// PDF operator: `l`
    pub fn do_l(&mut self, x: f64, y: f64) {
        self.curpath.line_to(x, y);
    }

    /// Appends a cubic Bezier curve to the path.
    ///
    /// PDF operator: `c`
    pub fn do_c(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.curpath.curve_to(x1, y1, x2, y2, x3, y3);
    }

    /// Appends a cubic Bezier curve with the current point as first control
    /// point. Ignored without a current point.
    ///
    /// PDF operator: `v`
    pub fn do_v(&mut self, x2: f64, y2: f64, x3: f64, y3: f64) {
        if let Some((x1, y1)) = self.curpath.current_point() {
            self.curpath.curve_to(x1, y1, x2, y2, x3, y3);
        }
    }

    /// Appends a cubic Bezier curve with the endpoint as second control point.
    ///
    /// PDF operator: `y`
    pub fn do_y(&mut self, x1: f64, y1: f64, x3: f64, y3: f64) {
        self.curpath.curve_to(x1, y1, x3, y3, x3, y3);
    }

    /// Closes the current subpath.
    ///
    /// PDF operator: `h`
    pub fn do_h(&mut self) {
        self.curpath.close();
    }

    /// Appends a rectangle as a closed subpath.
    ///
    /// Equivalent to: m x y; l x+w y; l x+w y+h; l x y+h; h
    ///
    /// PDF operator: `re`
    pub fn do_re(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.curpath.move_to(x, y);
        self.curpath.line_to(x + w, y);
        self.curpath.line_to(x + w, y + h);
        self.curpath.line_to(x, y + h);
        self.curpath.close();
    }

    // ========================================================================
    // Path Painting Operators
    // ========================================================================

    /// Hands the current path to the device once per rule, then clears it.
    /// A path without subpaths is discarded unpainted.
    fn paint_path(&mut self, kinds: &[PathKind]) {
        if self.curpath.is_paintable() {
            for &kind in kinds {
                self.device.paint_path(kind, &self.ctm, &self.curpath);
            }
        }
        self.curpath.clear();
    }

    /// Strokes the current path.
    ///
    /// PDF operator: `S`
    pub fn do_S(&mut self) {
        self.paint_path(&[PathKind::Stroke]);
    }

    /// Closes and strokes the current path.
    ///
    /// PDF operator: `s`
    pub fn do_s(&mut self) {
        self.do_h();
        self.do_S();
    }

    /// Fills the current path using the nonzero winding number rule.
    /// `F` is an alias.
    ///
    /// PDF operator: `f`
    pub fn do_f(&mut self) {
        self.paint_path(&[PathKind::NonzeroFill]);
    }

    /// Fills the current path using the even-odd rule.
    ///
    /// PDF operator: `f*`
    pub fn do_f_star(&mut self) {
        self.paint_path(&[PathKind::EvenOddFill]);
    }

    /// Fills (nonzero) and then strokes the current path.
    ///
    /// PDF operator: `B`
    pub fn do_B(&mut self) {
        self.paint_path(&[PathKind::NonzeroFill, PathKind::Stroke]);
    }

    /// Fills (even-odd) and then strokes the current path.
    ///
    /// PDF operator: `B*`
    pub fn do_B_star(&mut self) {
        self.paint_path(&[PathKind::EvenOddFill, PathKind::Stroke]);
    }

    /// PDF operator: `b`
    pub fn do_b(&mut self) {
        self.do_h();
        self.do_B();
    }

    /// PDF operator: `b*`
    pub fn do_b_star(&mut self) {
        self.do_h();
        self.do_B_star();
    }

    /// Ends the path without filling or stroking it.
    ///
    /// PDF operator: `n`
    pub fn do_n(&mut self) {
        self.curpath.clear();
    }
}
