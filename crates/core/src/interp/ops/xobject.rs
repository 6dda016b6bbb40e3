//! XObject operators and nested content.
//!
//! Handles: Do
//!
//! Also runs the other content that executes in a fresh state on top of the
//! page: annotation appearance streams and Type 3 glyph procedures.

use std::sync::Arc;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::document::PdfPage;
use crate::document::objects::{
    get, get_dict, get_i64, get_matrix, get_name, get_rect, resolve, stream_data,
};
use crate::interp::device::Device;
use crate::interp::interpreter::{MAX_NESTING, PageInterpreter};
use crate::model::PdfFont;
use crate::utils::{MATRIX_IDENTITY, Matrix, Rect, apply_matrix_rect, mult_matrix, normalize_rect};

/// Annotation flag bit 2: do not display.
const ANNOT_HIDDEN: i64 = 1 << 1;

#[allow(non_snake_case)]
impl<'a, D: Device> PageInterpreter<'a, D> {
    // ========================================================================
    // XObject Operators
    // ========================================================================

    /// Do - Paint a named XObject. Only forms carry geometry; images are
    /// skipped.
    ///
    /// PDF operator: `Do`
    pub fn do_Do(&mut self, xobjid: &[u8]) {
        let Some(entry) = self.resource_entry(b"XObject", xobjid) else {
            tracing::debug!("unknown XObject /{}", String::from_utf8_lossy(xobjid));
            return;
        };
        // XObjects are always streams, hence indirect
        let Object::Reference(id) = entry else {
            return;
        };
        let doc = self.doc;
        let Some(stream) = doc.get_object(id).ok().and_then(|o| o.as_stream().ok()) else {
            return;
        };
        if get_name(doc, &stream.dict, b"Subtype") != Some(b"Form".as_slice()) {
            return;
        }
        let matrix = get_matrix(doc, &stream.dict, b"Matrix").unwrap_or(MATRIX_IDENTITY);
        self.render_form(stream, Some(id), mult_matrix(matrix, self.ctm));
    }

    /// Runs a form's content with the given form-space CTM and the form's
    /// own resources (falling back to the current ones).
    pub(crate) fn render_form(&mut self, form: &'a Stream, id: Option<ObjectId>, ctm: Matrix) {
        if self.depth >= MAX_NESTING {
            tracing::warn!("form nesting too deep, skipping");
            return;
        }
        if let Some(id) = id {
            if self.xobj_stack.contains(&id) {
                tracing::debug!("skipping recursive form {id:?}");
                return;
            }
            self.xobj_stack.push(id);
        }
        let resources = get_dict(self.doc, &form.dict, b"Resources")
            .map(|r| Arc::new(r.clone()))
            .or_else(|| self.resources.clone());
        let data = stream_data(form);

        let saved = self.snapshot_state();
        self.depth += 1;
        self.resources = resources;
        self.ctm = ctm;
        self.execute(&data);
        self.depth -= 1;
        self.restore_state(saved);

        if id.is_some() {
            self.xobj_stack.pop();
        }
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    /// Renders the normal appearance of every visible annotation, mapping
    /// the appearance box onto the annotation rectangle.
    pub(crate) fn render_annotations(&mut self, page: &PdfPage<'a>, page_ctm: Matrix) {
        let doc = self.doc;
        for annot in page.annotations() {
            if get_i64(doc, annot, b"F").unwrap_or(0) & ANNOT_HIDDEN != 0 {
                continue;
            }
            let Some((form, id)) = appearance_stream(doc, annot) else {
                continue;
            };
            let Some(rect) = get_rect(doc, annot, b"Rect") else {
                continue;
            };
            let bbox = get_rect(doc, &form.dict, b"BBox").unwrap_or((0.0, 0.0, 1.0, 1.0));
            let matrix = get_matrix(doc, &form.dict, b"Matrix").unwrap_or(MATRIX_IDENTITY);
            let Some(fit) = fit_to_rect(apply_matrix_rect(matrix, bbox), rect) else {
                continue;
            };
            let ctm = mult_matrix(mult_matrix(matrix, fit), page_ctm);
            self.render_form(form, id, ctm);
        }
    }

    // ========================================================================
    // Type 3 Glyphs
    // ========================================================================

    /// Runs the procedure of a Type 3 glyph with `glyph_ctm` mapping glyph
    /// space to device space.
    pub(crate) fn render_type3_glyph(&mut self, font: &PdfFont, code: u32, glyph_ctm: Matrix) {
        if self.depth >= MAX_NESTING {
            return;
        }
        let Some(glyph) = font.type3_glyph(code) else {
            return;
        };
        let resources = font.type3_resources().or_else(|| self.resources.clone());

        let saved = self.snapshot_state();
        self.depth += 1;
        self.resources = resources;
        self.ctm = glyph_ctm;
        self.textstate = Default::default();
        self.execute(&glyph.content);
        self.depth -= 1;
        self.restore_state(saved);
    }
}

/// Normal appearance stream of an annotation, selecting the `/AS` state
/// when the appearance has several.
fn appearance_stream<'d>(
    doc: &'d Document,
    annot: &'d Dictionary,
) -> Option<(&'d Stream, Option<ObjectId>)> {
    let ap = get_dict(doc, annot, b"AP")?;
    let mut entry = ap.get(b"N").ok()?;
    if let Some(Object::Dictionary(states)) = get(doc, ap, b"N") {
        let state = get_name(doc, annot, b"AS")?;
        entry = states.get(state).ok()?;
    }
    let id = match entry {
        Object::Reference(id) => Some(*id),
        _ => None,
    };
    match resolve(doc, entry)? {
        Object::Stream(stream) => Some((stream, id)),
        _ => None,
    }
}

/// Matrix mapping `from` onto `to` by scaling and translation. None for
/// degenerate boxes.
fn fit_to_rect(from: Rect, to: Rect) -> Option<Matrix> {
    let (fx0, fy0, fx1, fy1) = from;
    let (tx0, ty0, tx1, ty1) = normalize_rect(to);
    let (fw, fh) = (fx1 - fx0, fy1 - fy0);
    if fw.abs() < f64::EPSILON || fh.abs() < f64::EPSILON {
        return None;
    }
    let sx = (tx1 - tx0) / fw;
    let sy = (ty1 - ty0) / fh;
    Some((sx, 0.0, 0.0, sy, tx0 - fx0 * sx, ty0 - fy0 * sy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_to_rect_maps_corners() {
        let m = fit_to_rect((0.0, 0.0, 10.0, 20.0), (100.0, 200.0, 120.0, 210.0)).unwrap();
        assert_eq!(crate::utils::apply_matrix_pt(m, (0.0, 0.0)), (100.0, 200.0));
        assert_eq!(crate::utils::apply_matrix_pt(m, (10.0, 20.0)), (120.0, 210.0));
    }

    #[test]
    fn test_fit_to_degenerate_box() {
        assert!(fit_to_rect((0.0, 0.0, 0.0, 5.0), (0.0, 0.0, 1.0, 1.0)).is_none());
    }
}
