//! Output records and their MessagePack encoding.
//!
//! Path records are flat arrays `[kind, op, x, y]` (line) or
//! `[kind, op, x1, y1, x2, y2, x3, y3]` (curve). Glyph records are
//! `[[x1, y1, x2, y2], text]`.

use std::io::Write;

use rmp::encode::{write_array_len, write_f64, write_str, write_uint};

use crate::error::Result;
use crate::model::PathKind;
use crate::utils::{Point, Rect};

/// Op tag of a line record.
pub const LINE_TO: u8 = 0;
/// Op tag of a curve record.
pub const CURVE_TO: u8 = 1;

/// A value that serialises itself as one element of a page array.
pub trait Record {
    fn encode<W: Write>(&self, wr: &mut W) -> Result<()>;
}

/// One segment of a painted path, in device space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathRecord {
    LineTo { kind: PathKind, point: Point },
    /// Two control points, then the end point
    CurveTo { kind: PathKind, points: [Point; 3] },
}

impl PathRecord {
    pub const fn kind(&self) -> PathKind {
        match self {
            PathRecord::LineTo { kind, .. } | PathRecord::CurveTo { kind, .. } => *kind,
        }
    }

    pub const fn op_tag(&self) -> u8 {
        match self {
            PathRecord::LineTo { .. } => LINE_TO,
            PathRecord::CurveTo { .. } => CURVE_TO,
        }
    }
}

impl Record for PathRecord {
    fn encode<W: Write>(&self, wr: &mut W) -> Result<()> {
        match self {
            PathRecord::LineTo { kind, point } => {
                write_array_len(wr, 4)?;
                write_uint(wr, u64::from(kind.code()))?;
                write_uint(wr, u64::from(LINE_TO))?;
                write_f64(wr, point.0)?;
                write_f64(wr, point.1)?;
            }
            PathRecord::CurveTo { kind, points } => {
                write_array_len(wr, 8)?;
                write_uint(wr, u64::from(kind.code()))?;
                write_uint(wr, u64::from(CURVE_TO))?;
                for (x, y) in points {
                    write_f64(wr, *x)?;
                    write_f64(wr, *y)?;
                }
            }
        }
        Ok(())
    }
}

/// Box and text of one glyph, or of a synthetic inter-word space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphRecord<'a> {
    pub bbox: Rect,
    pub text: &'a str,
}

impl Record for GlyphRecord<'_> {
    fn encode<W: Write>(&self, wr: &mut W) -> Result<()> {
        let (x1, y1, x2, y2) = self.bbox;
        write_array_len(wr, 2)?;
        write_array_len(wr, 4)?;
        for v in [x1, y1, x2, y2] {
            write_f64(wr, v)?;
        }
        write_str(wr, self.text)?;
        Ok(())
    }
}
