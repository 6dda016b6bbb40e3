//! Geometry helpers shared by the engine and the record producers.
//!
//! Provides:
//! - Geometric types (Point, Rect, Matrix)
//! - Matrix composition and application
//! - A small bounding-box trait used by layout analysis

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// A rectangle defined by (x0, y0, x1, y1) with x0 <= x1 and y0 <= y1.
pub type Rect = (f64, f64, f64, f64);

/// A 6-element affine transformation matrix (a, b, c, d, e, f).
/// Transforms point (x, y) to (ax + cy + e, bx + dy + f).
pub type Matrix = (f64, f64, f64, f64, f64, f64);

/// Identity transformation matrix.
pub const MATRIX_IDENTITY: Matrix = (1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

/// Rectangle covering the whole plane, used for whole-page selections.
pub const WHOLE_PLANE: Rect = (
    f64::NEG_INFINITY,
    f64::NEG_INFINITY,
    f64::INFINITY,
    f64::INFINITY,
);

/// Multiplies two matrices: result = m1 * m0.
/// This applies m1 first, then m0.
pub fn mult_matrix(m1: Matrix, m0: Matrix) -> Matrix {
    let (a1, b1, c1, d1, e1, f1) = m1;
    let (a0, b0, c0, d0, e0, f0) = m0;
    (
        a0 * a1 + c0 * b1,
        b0 * a1 + d0 * b1,
        a0 * c1 + c0 * d1,
        b0 * c1 + d0 * d1,
        a0 * e1 + c0 * f1 + e0,
        b0 * e1 + d0 * f1 + f0,
    )
}

/// Moves the origin of `m` to `v`, expressed in the matrix's own coordinates.
pub fn translate_matrix(m: Matrix, v: Point) -> Matrix {
    let (a, b, c, d, e, f) = m;
    let (x, y) = v;
    (a, b, c, d, x * a + y * c + e, x * b + y * d + f)
}

/// Applies a matrix to a point.
pub fn apply_matrix_pt(m: Matrix, v: Point) -> Point {
    let (a, b, c, d, e, f) = m;
    let (x, y) = v;
    (a * x + c * y + e, b * x + d * y + f)
}

/// Applies a matrix to a rectangle, returning the axis-aligned box that
/// tightly fits the transformed corners.
pub fn apply_matrix_rect(m: Matrix, rect: Rect) -> Rect {
    let (x0, y0, x1, y1) = rect;
    let corners = [
        apply_matrix_pt(m, (x0, y0)),
        apply_matrix_pt(m, (x1, y0)),
        apply_matrix_pt(m, (x1, y1)),
        apply_matrix_pt(m, (x0, y1)),
    ];
    corners.iter().fold(
        (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        |(ax0, ay0, ax1, ay1), &(x, y)| (ax0.min(x), ay0.min(y), ax1.max(x), ay1.max(y)),
    )
}

/// Orders the corners of a rectangle given as two arbitrary points.
pub fn normalize_rect(rect: Rect) -> Rect {
    let (x0, y0, x1, y1) = rect;
    (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

/// Smallest rectangle containing both rectangles.
pub fn union_rect(a: Rect, b: Rect) -> Rect {
    (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3))
}

/// Trait for objects that have a bounding box.
pub trait HasBBox {
    fn bbox(&self) -> Rect;

    fn width(&self) -> f64 {
        let (x0, _, x1, _) = self.bbox();
        x1 - x0
    }

    fn height(&self) -> f64 {
        let (_, y0, _, y1) = self.bbox();
        y1 - y0
    }

    /// Horizontal gap between two boxes, zero when they overlap.
    fn hdistance(&self, other: &impl HasBBox) -> f64 {
        let (ax0, _, ax1, _) = self.bbox();
        let (bx0, _, bx1, _) = other.bbox();
        if ax1 < bx0 {
            bx0 - ax1
        } else if bx1 < ax0 {
            ax0 - bx1
        } else {
            0.0
        }
    }

    /// Length of the vertical overlap between two boxes, zero when disjoint.
    fn voverlap(&self, other: &impl HasBBox) -> f64 {
        let (_, ay0, _, ay1) = self.bbox();
        let (_, by0, _, by1) = other.bbox();
        (ay1.min(by1) - ay0.max(by0)).max(0.0)
    }

    fn center(&self) -> Point {
        let (x0, y0, x1, y1) = self.bbox();
        ((x0 + x1) / 2.0, (y0 + y1) / 2.0)
    }
}

impl HasBBox for Rect {
    fn bbox(&self) -> Rect {
        *self
    }
}

/// Whether `point` lies inside `rect` (edges inclusive).
pub fn rect_contains(rect: Rect, point: Point) -> bool {
    let (x0, y0, x1, y1) = rect;
    let (x, y) = point;
    x0 <= x && x <= x1 && y0 <= y && y <= y1
}
