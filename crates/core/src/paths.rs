//! Path-geometry extraction.
//!
//! [`PathRecorder`] is the device used in path mode. Every painted path is
//! walked subpath by subpath into line and curve records, transformed to
//! device space with the CTM in effect at paint time, and buffered together
//! with a running count for the page.

use smallvec::SmallVec;

use crate::encoder::CountedBuffer;
use crate::error::{ExtractError, Result};
use crate::interp::device::Device;
use crate::model::{GfxPath, PathKind, Subpath};
use crate::record::PathRecord;
use crate::transform::AffineTransform;
use crate::utils::Matrix;

/// Records of one subpath.
///
/// The start point (index 0) is implied and never emitted. A closed subpath
/// repeats its first line record at the end; a closed subpath without any
/// line record gets no closing record.
pub fn subpath_records(
    kind: PathKind,
    transform: &AffineTransform,
    subpath: &Subpath,
) -> SmallVec<[PathRecord; 8]> {
    let points = subpath.points();
    let mut records = SmallVec::new();
    let mut first_line = None;
    let mut j = 1;
    while j < points.len() {
        let p = points[j];
        if p.curve {
            let (Some(b), Some(c)) = (points.get(j + 1), points.get(j + 2)) else {
                tracing::warn!("truncated curve in subpath, {} points left", points.len() - j);
                break;
            };
            records.push(PathRecord::CurveTo {
                kind,
                points: [
                    transform.transform(p.x, p.y),
                    transform.transform(b.x, b.y),
                    transform.transform(c.x, c.y),
                ],
            });
            j += 3;
        } else {
            let record = PathRecord::LineTo {
                kind,
                point: transform.transform(p.x, p.y),
            };
            records.push(record);
            if first_line.is_none() {
                first_line = Some(record);
            }
            j += 1;
        }
    }
    if subpath.is_closed()
        && let Some(first) = first_line
    {
        records.push(first);
    }
    records
}

/// Device collecting path records for one page.
#[derive(Debug, Default)]
pub struct PathRecorder {
    buffer: CountedBuffer,
    /// First encode failure; later paths are ignored once set.
    error: Option<ExtractError>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the records of every subpath of `path`.
    pub fn record_path(&mut self, kind: PathKind, ctm: &Matrix, path: &GfxPath) -> Result<()> {
        let transform = AffineTransform::from_ctm(ctm);
        for subpath in path.subpaths() {
            for record in subpath_records(kind, &transform, subpath) {
                self.buffer.push(&record)?;
            }
        }
        Ok(())
    }

    pub const fn count(&self) -> usize {
        self.buffer.count()
    }

    /// The page's records, or the first error hit while recording.
    pub fn finish(self) -> Result<CountedBuffer> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.buffer),
        }
    }
}

impl Device for PathRecorder {
    fn interprets_type3_chars(&self) -> bool {
        true
    }

    fn paint_path(&mut self, kind: PathKind, ctm: &Matrix, path: &GfxPath) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.record_path(kind, ctm, path) {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CURVE_TO, LINE_TO};
    use crate::utils::MATRIX_IDENTITY;

    fn identity() -> AffineTransform {
        AffineTransform::from_ctm(&MATRIX_IDENTITY)
    }

    fn tags(records: &[PathRecord]) -> Vec<u8> {
        records.iter().map(PathRecord::op_tag).collect()
    }

    #[test]
    fn test_walk_consumes_every_point_once() {
        let mut path = GfxPath::new();
        path.move_to(0.0, 0.0);
        path.line_to(1.0, 0.0);
        path.curve_to(2.0, 1.0, 3.0, 1.0, 4.0, 0.0);
        path.line_to(5.0, 0.0);
        let sub = &path.subpaths()[0];
        assert_eq!(sub.points().len(), 6);

        let records = subpath_records(PathKind::Stroke, &identity(), sub);
        assert_eq!(tags(&records), vec![LINE_TO, CURVE_TO, LINE_TO]);
        let consumed: usize = records
            .iter()
            .map(|r| if r.op_tag() == CURVE_TO { 3 } else { 1 })
            .sum();
        assert_eq!(consumed, sub.points().len() - 1);
    }

    #[test]
    fn test_closed_subpath_repeats_first_line() {
        let mut path = GfxPath::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.line_to(10.0, 10.0);
        path.close();
        let records = subpath_records(PathKind::NonzeroFill, &identity(), &path.subpaths()[0]);
        // two lines, the closing line back to the start, then the repeat
        assert_eq!(records.len(), 4);
        assert_eq!(records[3], records[0]);
        assert_eq!(
            records[0],
            PathRecord::LineTo {
                kind: PathKind::NonzeroFill,
                point: (10.0, 0.0)
            }
        );
    }

    #[test]
    fn test_closed_curve_only_subpath_has_no_closing_record() {
        let mut path = GfxPath::new();
        path.move_to(0.0, 0.0);
        path.curve_to(0.0, 5.0, 5.0, 5.0, 0.0, 0.0);
        path.close();
        let records = subpath_records(PathKind::Stroke, &identity(), &path.subpaths()[0]);
        assert_eq!(tags(&records), vec![CURVE_TO]);
    }

    #[test]
    fn test_points_are_transformed() {
        let mut path = GfxPath::new();
        path.move_to(0.0, 0.0);
        path.line_to(1.0, 2.0);
        let upside_down = AffineTransform::from_ctm(&(1.0, 0.0, 0.0, -1.0, 0.0, 100.0));
        let records = subpath_records(PathKind::Stroke, &upside_down, &path.subpaths()[0]);
        assert_eq!(
            records[0],
            PathRecord::LineTo {
                kind: PathKind::Stroke,
                point: (1.0, 98.0)
            }
        );
    }

    #[test]
    fn test_recorder_counts_every_record() {
        let mut recorder = PathRecorder::new();
        let mut path = GfxPath::new();
        path.move_to(0.0, 0.0);
        path.line_to(1.0, 1.0);
        recorder.paint_path(PathKind::NonzeroFill, &MATRIX_IDENTITY, &path);
        recorder.paint_path(PathKind::Stroke, &MATRIX_IDENTITY, &path);
        assert_eq!(recorder.count(), 2);
        let buffer = recorder.finish().unwrap();
        assert_eq!(buffer.count(), 2);
    }
}
