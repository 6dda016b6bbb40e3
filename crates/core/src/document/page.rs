//! PDF page: inherited attributes, content data and device mapping.

use lopdf::{Dictionary, Document, Object, ObjectId};

use super::objects::{get, get_array, get_dict, get_i64, get_rect, resolve, stream_data};
use crate::utils::{Matrix, Rect, normalize_rect};

/// US Letter, used when no MediaBox is found anywhere up the tree.
const DEFAULT_MEDIABOX: Rect = (0.0, 0.0, 612.0, 792.0);
/// Guard against cyclic `/Parent` chains.
const MAX_TREE_DEPTH: usize = 64;

#[derive(Debug, Clone)]
pub struct PdfPage<'a> {
    doc: &'a Document,
    pub id: ObjectId,
    dict: &'a Dictionary,
    pub mediabox: Rect,
    pub cropbox: Rect,
    /// Rotation in degrees, one of 0, 90, 180, 270
    pub rotate: i64,
    pub resources: Option<&'a Dictionary>,
}

impl<'a> PdfPage<'a> {
    pub fn load(doc: &'a Document, id: ObjectId) -> Option<Self> {
        let dict = doc.get_dictionary(id).ok()?;
        let mediabox = inherited(doc, dict, |d| get_rect(doc, d, b"MediaBox"))
            .map(normalize_rect)
            .unwrap_or(DEFAULT_MEDIABOX);
        let cropbox = inherited(doc, dict, |d| get_rect(doc, d, b"CropBox"))
            .map(normalize_rect)
            .map_or(mediabox, |crop| intersect_or(crop, mediabox));
        let rotate = inherited(doc, dict, |d| get_i64(doc, d, b"Rotate"))
            .map(|r| r.rem_euclid(360))
            .filter(|r| r % 90 == 0)
            .unwrap_or(0);
        let resources = inherited(doc, dict, |d| get_dict(doc, d, b"Resources"));
        Some(Self {
            doc,
            id,
            dict,
            mediabox,
            cropbox,
            rotate,
            resources,
        })
    }

    /// Concatenated, decoded content streams of the page.
    pub fn content_data(&self) -> Vec<u8> {
        match get(self.doc, self.dict, b"Contents") {
            Some(Object::Stream(stream)) => stream_data(stream),
            Some(Object::Array(parts)) => {
                let mut data = Vec::new();
                for part in parts {
                    if let Some(Object::Stream(stream)) = resolve(self.doc, part) {
                        data.extend_from_slice(&stream_data(stream));
                        data.push(b'\n');
                    }
                }
                data
            }
            _ => Vec::new(),
        }
    }

    /// Annotation dictionaries in page order.
    pub fn annotations(&self) -> Vec<&'a Dictionary> {
        let doc = self.doc;
        get_array(doc, self.dict, b"Annots")
            .unwrap_or(&[])
            .iter()
            .filter_map(|annot| resolve(doc, annot)?.as_dict().ok())
            .collect()
    }

    /// Maps default user space to device space at 72 dpi, honouring the crop
    /// box and page rotation. With `upside_down` the device origin is the
    /// top-left corner and y grows downwards.
    pub fn device_ctm(&self, upside_down: bool) -> Matrix {
        let (x1, y1, x2, y2) = self.cropbox;
        match self.rotate {
            90 => (
                0.0,
                if upside_down { 1.0 } else { -1.0 },
                1.0,
                0.0,
                -y1,
                if upside_down { -x1 } else { x2 },
            ),
            180 => (
                -1.0,
                0.0,
                0.0,
                if upside_down { 1.0 } else { -1.0 },
                x2,
                if upside_down { -y1 } else { y2 },
            ),
            270 => (
                0.0,
                if upside_down { -1.0 } else { 1.0 },
                -1.0,
                0.0,
                y2,
                if upside_down { x2 } else { -x1 },
            ),
            _ => (
                1.0,
                0.0,
                0.0,
                if upside_down { -1.0 } else { 1.0 },
                -x1,
                if upside_down { y2 } else { -y1 },
            ),
        }
    }

    pub const fn document(&self) -> &'a Document {
        self.doc
    }
}

/// Looks up an attribute on the page, then on its ancestors.
fn inherited<'a, T>(
    doc: &'a Document,
    page: &'a Dictionary,
    lookup: impl Fn(&'a Dictionary) -> Option<T>,
) -> Option<T> {
    let mut node = page;
    for _ in 0..MAX_TREE_DEPTH {
        if let Some(value) = lookup(node) {
            return Some(value);
        }
        node = get_dict(doc, node, b"Parent")?;
    }
    None
}

fn intersect_or(a: Rect, fallback: Rect) -> Rect {
    let r = (a.0.max(fallback.0), a.1.max(fallback.1), a.2.min(fallback.2), a.3.min(fallback.3));
    if r.0 < r.2 && r.1 < r.3 { r } else { fallback }
}
