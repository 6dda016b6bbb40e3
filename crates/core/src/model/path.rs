//! Path geometry as built by the content-stream interpreter.
//!
//! A path is a list of subpaths; each subpath is a list of points where a
//! cubic curve occupies three consecutive points (two control points flagged
//! `curve`, then the end point). Point 0 of every subpath is its start point.

use crate::utils::Point;

/// How a painted path is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    /// Fill using the even-odd rule (`f*`, `B*`, `b*`).
    EvenOddFill,
    /// Stroke (`S`, `s`, and the stroke half of `B`/`b`).
    Stroke,
    /// Fill using the nonzero winding rule (`f`, `F`, `B`, `b`).
    NonzeroFill,
}

impl PathKind {
    /// Wire code of this kind in path records.
    pub const fn code(self) -> u8 {
        match self {
            PathKind::EvenOddFill => 10,
            PathKind::Stroke => 11,
            PathKind::NonzeroFill => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    /// Set on the two control points of a cubic curve.
    pub curve: bool,
}

impl PathPoint {
    const fn new(x: f64, y: f64, curve: bool) -> Self {
        Self { x, y, curve }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    points: Vec<PathPoint>,
    closed: bool,
}

impl Subpath {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            points: vec![PathPoint::new(x, y, false)],
            closed: false,
        }
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.points.push(PathPoint::new(x, y, false));
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.points.push(PathPoint::new(x1, y1, true));
        self.points.push(PathPoint::new(x2, y2, true));
        self.points.push(PathPoint::new(x3, y3, false));
    }

    /// Closes the subpath, adding a line back to the start point unless the
    /// last point already coincides with it.
    pub fn close(&mut self) {
        let first = self.points[0];
        if let Some(last) = self.points.last()
            && (last.x != first.x || last.y != first.y)
        {
            self.line_to(first.x, first.y);
        }
        self.closed = true;
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn last_point(&self) -> Point {
        let last = self.points[self.points.len() - 1];
        (last.x, last.y)
    }
}

/// A path under construction.
///
/// `move_to` only records a pending start point; the subpath is created by
/// the first segment that follows it, so a trailing `m` never produces an
/// empty subpath.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GfxPath {
    subpaths: Vec<Subpath>,
    pending_start: Option<Point>,
}

impl GfxPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.pending_start = Some((x, y));
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        if let Some(sub) = self.open_subpath() {
            sub.line_to(x, y);
        }
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        if let Some(sub) = self.open_subpath() {
            sub.curve_to(x1, y1, x2, y2, x3, y3);
        }
    }

    pub fn close(&mut self) {
        if let Some((x, y)) = self.pending_start.take() {
            self.subpaths.push(Subpath::new(x, y));
        }
        if let Some(sub) = self.subpaths.last_mut() {
            sub.close();
        }
    }

    /// Whether a current point exists (a pending `m` or any subpath).
    pub fn has_current_point(&self) -> bool {
        self.pending_start.is_some() || !self.subpaths.is_empty()
    }

    pub fn current_point(&self) -> Option<Point> {
        self.pending_start
            .or_else(|| self.subpaths.last().map(Subpath::last_point))
    }

    /// Whether the path has at least one subpath worth painting.
    pub fn is_paintable(&self) -> bool {
        !self.subpaths.is_empty()
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    pub fn clear(&mut self) {
        self.subpaths.clear();
        self.pending_start = None;
    }

    /// Subpath receiving the next segment, created from the pending start
    /// point or from the end of a closed subpath. None without a current point.
    fn open_subpath(&mut self) -> Option<&mut Subpath> {
        if let Some((x, y)) = self.pending_start.take() {
            self.subpaths.push(Subpath::new(x, y));
        } else {
            let last = self.subpaths.last()?;
            if last.is_closed() {
                let (x, y) = last.last_point();
                self.subpaths.push(Subpath::new(x, y));
            }
        }
        self.subpaths.last_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_without_current_point_is_ignored() {
        let mut path = GfxPath::new();
        path.line_to(1.0, 1.0);
        assert!(!path.is_paintable());
        assert!(!path.has_current_point());
    }

    #[test]
    fn test_lone_move_is_not_paintable() {
        let mut path = GfxPath::new();
        path.move_to(1.0, 2.0);
        assert!(path.has_current_point());
        assert!(!path.is_paintable());
        assert_eq!(path.current_point(), Some((1.0, 2.0)));
    }

    #[test]
    fn test_close_adds_line_back_to_start() {
        let mut path = GfxPath::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.line_to(10.0, 10.0);
        path.close();
        let sub = &path.subpaths()[0];
        assert!(sub.is_closed());
        assert_eq!(sub.points().len(), 4);
        assert_eq!(sub.last_point(), (0.0, 0.0));
    }

    #[test]
    fn test_close_at_start_point_adds_nothing() {
        let mut path = GfxPath::new();
        path.move_to(0.0, 0.0);
        path.line_to(5.0, 5.0);
        path.line_to(0.0, 0.0);
        path.close();
        assert_eq!(path.subpaths()[0].points().len(), 3);
    }

    #[test]
    fn test_curve_flags() {
        let mut path = GfxPath::new();
        path.move_to(0.0, 0.0);
        path.curve_to(1.0, 1.0, 2.0, 1.0, 3.0, 0.0);
        let flags: Vec<bool> = path.subpaths()[0].points().iter().map(|p| p.curve).collect();
        assert_eq!(flags, vec![false, true, true, false]);
    }

    #[test]
    fn test_segment_after_close_starts_new_subpath() {
        let mut path = GfxPath::new();
        path.move_to(0.0, 0.0);
        path.line_to(4.0, 0.0);
        path.close();
        path.line_to(4.0, 4.0);
        assert_eq!(path.subpaths().len(), 2);
        assert_eq!(path.subpaths()[1].points()[0].x, 0.0);
        assert!(!path.subpaths()[1].is_closed());
    }

    #[test]
    fn test_move_then_close_makes_degenerate_closed_subpath() {
        let mut path = GfxPath::new();
        path.move_to(3.0, 3.0);
        path.close();
        assert_eq!(path.subpaths().len(), 1);
        assert_eq!(path.subpaths()[0].points().len(), 1);
        assert!(path.subpaths()[0].is_closed());
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(PathKind::EvenOddFill.code(), 10);
        assert_eq!(PathKind::Stroke.code(), 11);
        assert_eq!(PathKind::NonzeroFill.code(), 12);
    }
}
