//! PDF content stream interpreter.
//!
//! `ResourceManager` caches fonts across pages so shared font objects are
//! parsed once per document. `PageInterpreter` executes the operators of a
//! page (and of the forms, annotation appearances and Type 3 glyphs it
//! reaches) against a [`Device`].

use std::sync::Arc;

use lopdf::{Dictionary, Document, Object, ObjectId};
use rustc_hash::FxHashMap;

use super::device::Device;
use super::lexer::{Operand, parse_operations};
use crate::document::PdfPage;
use crate::document::objects::{get_dict, resolve};
use crate::model::{GfxPath, GraphicState, PdfFont, TextState};
use crate::utils::{MATRIX_IDENTITY, Matrix};

/// Maximum nesting of forms and Type 3 glyph procedures.
pub(crate) const MAX_NESTING: usize = 32;

/// Document-wide cache of parsed fonts, keyed by font object id.
#[derive(Debug, Default)]
pub struct ResourceManager {
    fonts: FxHashMap<ObjectId, Arc<PdfFont>>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the font behind a `/Font` resource entry. Direct dictionaries
    /// are not cached.
    pub fn get_font(&mut self, doc: &Document, entry: &Object) -> Option<Arc<PdfFont>> {
        if let Object::Reference(id) = entry {
            if let Some(font) = self.fonts.get(id) {
                return Some(Arc::clone(font));
            }
            let dict = resolve(doc, entry)?.as_dict().ok()?;
            let font = Arc::new(PdfFont::load(doc, dict));
            self.fonts.insert(*id, Arc::clone(&font));
            return Some(font);
        }
        let dict = entry.as_dict().ok()?;
        Some(Arc::new(PdfFont::load(doc, dict)))
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }
}

/// Interpreter state replaced while a form or glyph procedure runs.
pub(crate) struct SavedContext {
    pub(crate) gstack: Vec<GraphicState>,
    pub(crate) ctm: Matrix,
    pub(crate) textstate: TextState,
    pub(crate) curpath: GfxPath,
    pub(crate) resources: Option<Arc<Dictionary>>,
}

/// Executes content streams against a device.
///
/// Operator methods are named after the operators they implement
/// (`do_q`, `do_Q`, `do_S`, ...), so some are uppercase.
pub struct PageInterpreter<'a, D: Device> {
    pub(crate) doc: &'a Document,
    pub(crate) rsrcmgr: &'a mut ResourceManager,
    pub(crate) device: &'a mut D,
    /// Saved states for q/Q
    pub(crate) gstack: Vec<GraphicState>,
    pub(crate) ctm: Matrix,
    pub(crate) textstate: TextState,
    /// Path under construction, in user space
    pub(crate) curpath: GfxPath,
    pub(crate) resources: Option<Arc<Dictionary>>,
    /// Form XObjects being executed, to break cycles
    pub(crate) xobj_stack: Vec<ObjectId>,
    /// Current nesting of forms and glyph procedures
    pub(crate) depth: usize,
}

impl<'a, D: Device> PageInterpreter<'a, D> {
    pub fn new(doc: &'a Document, rsrcmgr: &'a mut ResourceManager, device: &'a mut D) -> Self {
        Self {
            doc,
            rsrcmgr,
            device,
            gstack: Vec::new(),
            ctm: MATRIX_IDENTITY,
            textstate: TextState::new(),
            curpath: GfxPath::new(),
            resources: None,
            xobj_stack: Vec::new(),
            depth: 0,
        }
    }

    pub fn init_state(&mut self, ctm: Matrix) {
        self.gstack.clear();
        self.ctm = ctm;
        self.textstate = TextState::new();
        self.curpath.clear();
    }

    pub const fn ctm(&self) -> Matrix {
        self.ctm
    }

    pub const fn textstate(&self) -> &TextState {
        &self.textstate
    }

    pub fn current_path(&self) -> &GfxPath {
        &self.curpath
    }

    /// Renders one page: its content streams, then its annotation
    /// appearances.
    pub fn process_page(&mut self, page: &PdfPage<'a>) {
        let ctm = page.device_ctm(self.device.upside_down());
        tracing::debug!(
            page = ?page.id,
            rotate = page.rotate,
            "processing page"
        );
        self.device.begin_page(page.cropbox, ctm);
        self.init_state(ctm);
        self.resources = page.resources.map(|r| Arc::new(r.clone()));
        self.execute(&page.content_data());
        self.render_annotations(page, ctm);
        self.device.end_page();
    }

    /// Runs a content stream in the current state.
    pub fn execute(&mut self, data: &[u8]) {
        if data.iter().all(u8::is_ascii_whitespace) {
            return;
        }
        for op in parse_operations(data) {
            self.dispatch_operator(&op.operator, &op.operands);
        }
    }

    #[allow(non_snake_case)]
    fn dispatch_operator(&mut self, op: &str, args: &[Operand]) {
        match op {
            // Graphics state
            "q" => self.do_q(),
            "Q" => self.do_Q(),
            "cm" => {
                if let Some([a, b, c, d, e, f]) = nums(args) {
                    self.do_cm(a, b, c, d, e, f);
                }
            }

            // Path construction
            "m" => {
                if let Some([x, y]) = nums(args) {
                    self.do_m(x, y);
                }
            }
            "l" => {
                if let Some([x, y]) = nums(args) {
                    self.do_l(x, y);
                }
            }
            "c" => {
                if let Some([x1, y1, x2, y2, x3, y3]) = nums(args) {
                    self.do_c(x1, y1, x2, y2, x3, y3);
                }
            }
            "v" => {
                if let Some([x2, y2, x3, y3]) = nums(args) {
                    self.do_v(x2, y2, x3, y3);
                }
            }
            "y" => {
                if let Some([x1, y1, x3, y3]) = nums(args) {
                    self.do_y(x1, y1, x3, y3);
                }
            }
            "h" => self.do_h(),
            "re" => {
                if let Some([x, y, w, h]) = nums(args) {
                    self.do_re(x, y, w, h);
                }
            }

            // Path painting
            "S" => self.do_S(),
            "s" => self.do_s(),
            "f" | "F" => self.do_f(),
            "f*" => self.do_f_star(),
            "B" => self.do_B(),
            "B*" => self.do_B_star(),
            "b" => self.do_b(),
            "b*" => self.do_b_star(),
            "n" => self.do_n(),
            // clipping does not change what is painted; the path stays
            // current until the next painting operator
            "W" | "W*" => {}

            // Text objects and state
            "BT" => self.do_BT(),
            "ET" => self.do_ET(),
            "Tc" => {
                if let Some([v]) = nums(args) {
                    self.do_Tc(v);
                }
            }
            "Tw" => {
                if let Some([v]) = nums(args) {
                    self.do_Tw(v);
                }
            }
            "Tz" => {
                if let Some([v]) = nums(args) {
                    self.do_Tz(v);
                }
            }
            "TL" => {
                if let Some([v]) = nums(args) {
                    self.do_TL(v);
                }
            }
            "Tf" => {
                let size = args.last().and_then(Operand::as_f64);
                let name = args.len().checked_sub(2).and_then(|i| name_of(&args[i]));
                if let (Some(name), Some(size)) = (name, size) {
                    self.do_Tf(name, size);
                }
            }
            "Tr" => {
                if let Some([v]) = nums(args) {
                    self.do_Tr(v as i32);
                }
            }
            "Ts" => {
                if let Some([v]) = nums(args) {
                    self.do_Ts(v);
                }
            }

            // Text positioning
            "Td" => {
                if let Some([tx, ty]) = nums(args) {
                    self.do_Td(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = nums(args) {
                    self.do_TD(tx, ty);
                }
            }
            "Tm" => {
                if let Some([a, b, c, d, e, f]) = nums(args) {
                    self.do_Tm(a, b, c, d, e, f);
                }
            }
            "T*" => self.do_T_star(),

            // Text showing
            "Tj" => {
                if let Some(s) = args.last().and_then(string_of) {
                    self.do_Tj(s);
                }
            }
            "TJ" => {
                if let Some(Operand::Array(items)) = args.last() {
                    self.do_TJ(items);
                }
            }
            "'" => {
                if let Some(s) = args.last().and_then(string_of) {
                    self.do_quote(s);
                }
            }
            "\"" => {
                let s = args.last().and_then(string_of);
                let spacing = args.len().checked_sub(3).map(|i| &args[i..i + 2]);
                if let (Some(s), Some(spacing)) = (s, spacing)
                    && let Some([aw, ac]) = nums(spacing)
                {
                    self.do_doublequote(aw, ac, s);
                }
            }

            // XObjects
            "Do" => {
                if let Some(name) = args.last().and_then(name_of) {
                    self.do_Do(name);
                }
            }

            // Colour, line style, marked content, inline images, shading
            // and compatibility sections paint no geometry.
            _ => {}
        }
    }

    pub(crate) fn snapshot_state(&mut self) -> SavedContext {
        SavedContext {
            gstack: std::mem::take(&mut self.gstack),
            ctm: self.ctm,
            textstate: self.textstate.clone(),
            curpath: std::mem::take(&mut self.curpath),
            resources: self.resources.clone(),
        }
    }

    pub(crate) fn restore_state(&mut self, saved: SavedContext) {
        self.gstack = saved.gstack;
        self.ctm = saved.ctm;
        self.textstate = saved.textstate;
        self.curpath = saved.curpath;
        self.resources = saved.resources;
    }

    /// Looks up `/category /name` in the current resources.
    pub(crate) fn resource_entry(&self, category: &[u8], name: &[u8]) -> Option<Object> {
        let resources = self.resources.as_ref()?;
        let entries = get_dict(self.doc, resources, category)?;
        entries.get(name).ok().cloned()
    }
}

/// Last `N` operands as numbers.
pub(crate) fn nums<const N: usize>(args: &[Operand]) -> Option<[f64; N]> {
    let start = args.len().checked_sub(N)?;
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(&args[start..]) {
        *slot = arg.as_f64()?;
    }
    Some(out)
}

pub(crate) fn name_of(arg: &Operand) -> Option<&[u8]> {
    arg.as_name()
}

pub(crate) fn string_of(arg: &Operand) -> Option<&[u8]> {
    arg.as_string()
}
