//! Affine coordinate transformer used when turning painted paths into records.

use crate::utils::{Matrix, Point};

/// Six affine coefficients copied out of the interpreter's current
/// transformation matrix.
///
/// The interpreter owns its CTM and mutates it between paint events, so a
/// transformer is always built by value at the moment a path is painted and
/// never borrows interpreter state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    m: [f64; 6],
}

impl AffineTransform {
    /// Captures the coefficients of `ctm`.
    pub const fn from_ctm(ctm: &Matrix) -> Self {
        let &(a, b, c, d, e, f) = ctm;
        Self {
            m: [a, b, c, d, e, f],
        }
    }

    /// Maps (x, y) to (x·a + y·c + e, x·b + y·d + f).
    #[inline]
    pub fn transform(&self, x: f64, y: f64) -> Point {
        let [a, b, c, d, e, f] = self.m;
        (x * a + y * c + e, x * b + y * d + f)
    }
}

impl From<Matrix> for AffineTransform {
    fn from(ctm: Matrix) -> Self {
        Self::from_ctm(&ctm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{MATRIX_IDENTITY, apply_matrix_pt};

    #[test]
    fn test_identity_is_noop() {
        let t = AffineTransform::from_ctm(&MATRIX_IDENTITY);
        assert_eq!(t.transform(3.5, -2.0), (3.5, -2.0));
    }

    #[test]
    fn test_upside_down_page_transform() {
        // 72 dpi, origin moved to the top-left corner of a 612x792 page
        let t = AffineTransform::from((1.0, 0.0, 0.0, -1.0, 0.0, 792.0));
        assert_eq!(t.transform(100.0, 700.0), (100.0, 92.0));
    }

    #[test]
    fn test_matches_matrix_application() {
        let m = (0.5, 0.25, -0.75, 2.0, 11.0, -3.0);
        let t = AffineTransform::from_ctm(&m);
        assert_eq!(t.transform(4.0, 8.0), apply_matrix_pt(m, (4.0, 8.0)));
    }

    #[test]
    fn test_copy_is_independent_of_source() {
        let mut ctm = (2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let t = AffineTransform::from_ctm(&ctm);
        ctm.4 = 100.0;
        assert_eq!(t.transform(1.0, 1.0), (2.0, 2.0));
        assert_eq!(ctm.4, 100.0);
    }
}
