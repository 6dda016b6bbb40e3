//! Font model: code decoding, glyph widths, vertical metrics and text mapping.
//!
//! Supports simple fonts (Type1, MMType1, TrueType, Type3) and composite
//! (Type0) fonts with two-byte codes. Glyph shapes are never read; only the
//! metrics a layout needs.

use std::sync::Arc;

use lopdf::{Dictionary, Document, Object};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::cmap::ToUnicodeMap;
use super::encoding::{BaseEncoding, glyph_name_to_unicode};
use crate::document::objects::{
    get, get_array, get_dict, get_f64, get_matrix, get_name, get_stream, numbers, resolve,
    stream_data,
};
use crate::utils::Matrix;

const DEFAULT_ASCENT: f64 = 0.95;
const DEFAULT_DESCENT: f64 = -0.35;
const DEFAULT_FONT_MATRIX: Matrix = (0.001, 0.0, 0.0, 0.001, 0.0, 0.0);

/// Character codes of one shown string, with their byte lengths.
pub type DecodedCodes = SmallVec<[(u32, usize); 32]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    Simple,
    Composite,
    Type3,
}

#[derive(Debug, Clone, PartialEq)]
enum Widths {
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        missing: f64,
    },
    Composite {
        default: f64,
        widths: FxHashMap<u32, f64>,
    },
}

/// Glyph procedure of a Type 3 font.
#[derive(Debug, Clone, PartialEq)]
pub struct Type3Glyph {
    pub content: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct PdfFont {
    pub basefont: String,
    kind: FontKind,
    widths: Widths,
    /// Text per code for simple fonts (256 entries).
    encoding: Vec<Option<String>>,
    to_unicode: Option<ToUnicodeMap>,
    font_matrix: Matrix,
    ascent: f64,
    descent: f64,
    type3_glyphs: FxHashMap<u32, Arc<Type3Glyph>>,
    type3_resources: Option<Arc<Dictionary>>,
}

impl PdfFont {
    /// Builds a font from its dictionary. Missing or malformed entries fall
    /// back to defaults; a font never fails to load.
    pub fn load(doc: &Document, dict: &Dictionary) -> Self {
        let subtype = get_name(doc, dict, b"Subtype").unwrap_or(b"Type1");
        let basefont = get_name(doc, dict, b"BaseFont")
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_default();
        let kind = match subtype {
            b"Type0" => FontKind::Composite,
            b"Type3" => FontKind::Type3,
            _ => FontKind::Simple,
        };

        let to_unicode = get_stream(doc, dict, b"ToUnicode")
            .map(|s| ToUnicodeMap::parse(&stream_data(s)))
            .filter(|m| !m.is_empty());

        let descendant = match kind {
            FontKind::Composite => get_array(doc, dict, b"DescendantFonts")
                .and_then(|fonts| fonts.first())
                .and_then(|f| resolve(doc, f))
                .and_then(|f| f.as_dict().ok()),
            _ => None,
        };
        let descriptor_owner = descendant.unwrap_or(dict);
        let descriptor = get_dict(doc, descriptor_owner, b"FontDescriptor");

        let font_matrix = match kind {
            FontKind::Type3 => get_matrix(doc, dict, b"FontMatrix").unwrap_or(DEFAULT_FONT_MATRIX),
            _ => DEFAULT_FONT_MATRIX,
        };

        let (ascent, descent) = descriptor
            .map(|d| Self::vertical_metrics(doc, d))
            .unwrap_or((DEFAULT_ASCENT, DEFAULT_DESCENT));

        let widths = match descendant {
            Some(cid_font) => Self::composite_widths(doc, cid_font),
            None => Self::simple_widths(doc, dict, descriptor, &basefont),
        };

        let (encoding, glyph_names) = match kind {
            FontKind::Composite => (Vec::new(), FxHashMap::default()),
            _ => Self::simple_encoding(doc, dict, &basefont),
        };

        let (type3_glyphs, type3_resources) = match kind {
            FontKind::Type3 => (
                Self::type3_glyphs(doc, dict, &glyph_names),
                get_dict(doc, dict, b"Resources").cloned().map(Arc::new),
            ),
            _ => (FxHashMap::default(), None),
        };

        Self {
            basefont,
            kind,
            widths,
            encoding,
            to_unicode,
            font_matrix,
            ascent,
            descent,
            type3_glyphs,
            type3_resources,
        }
    }

    /// Reads Ascent/Descent, keeping the defaults when values are implausible.
    fn vertical_metrics(doc: &Document, descriptor: &Dictionary) -> (f64, f64) {
        let mut ascent = DEFAULT_ASCENT;
        let mut descent = DEFAULT_DESCENT;
        if let Some(a) = get_f64(doc, descriptor, b"Ascent").map(|a| a * 0.001)
            && a > 0.0
            && a < 3.0
        {
            ascent = a;
        }
        if let Some(d) = get_f64(doc, descriptor, b"Descent").map(|d| d * 0.001)
            && d < 0.0
            && d > -3.0
        {
            descent = d;
        }
        (ascent, descent)
    }

    fn simple_widths(
        doc: &Document,
        dict: &Dictionary,
        descriptor: Option<&Dictionary>,
        basefont: &str,
    ) -> Widths {
        let first_char = get_f64(doc, dict, b"FirstChar").map_or(0, |f| f.max(0.0) as u32);
        let widths = get_array(doc, dict, b"Widths")
            .map(|w| numbers(doc, w))
            .unwrap_or_default();
        let missing = descriptor
            .and_then(|d| get_f64(doc, d, b"MissingWidth"))
            .filter(|w| *w > 0.0)
            .unwrap_or_else(|| {
                // standard 14 fonts usually come without Widths
                if basefont.contains("Courier") { 600.0 } else { 500.0 }
            });
        Widths::Simple {
            first_char,
            widths,
            missing,
        }
    }

    /// Parses `/W` arrays: `c [w1 w2 ...]` and `c_first c_last w` forms.
    fn composite_widths(doc: &Document, cid_font: &Dictionary) -> Widths {
        let default = get_f64(doc, cid_font, b"DW").unwrap_or(1000.0);
        let mut widths = FxHashMap::default();
        let items = get_array(doc, cid_font, b"W").unwrap_or(&[]);
        let mut i = 0;
        while i < items.len() {
            let first = resolve(doc, &items[i]).and_then(crate::document::objects::as_f64);
            let next = items.get(i + 1).and_then(|o| resolve(doc, o));
            match (first, next) {
                (Some(first), Some(Object::Array(list))) => {
                    for (offset, w) in numbers(doc, list).into_iter().enumerate() {
                        let code = u32::try_from(offset)
                            .ok()
                            .and_then(|offset| (first as u32).checked_add(offset));
                        // a run past the last representable code is malformed
                        let Some(code) = code else {
                            break;
                        };
                        widths.insert(code, w);
                    }
                    i += 2;
                }
                (Some(first), Some(last)) => {
                    let last = crate::document::objects::as_f64(last);
                    let w = items
                        .get(i + 2)
                        .and_then(|o| resolve(doc, o))
                        .and_then(crate::document::objects::as_f64);
                    if let (Some(last), Some(w)) = (last, w)
                        && last >= first
                        && last - first <= f64::from(u16::MAX)
                    {
                        for code in first as u32..=last as u32 {
                            widths.insert(code, w);
                        }
                    }
                    i += 3;
                }
                _ => break,
            }
        }
        Widths::Composite { default, widths }
    }

    /// Builds the code → text table and the code → glyph name map of a
    /// simple font from its base encoding and `/Differences`.
    fn simple_encoding(
        doc: &Document,
        dict: &Dictionary,
        basefont: &str,
    ) -> (Vec<Option<String>>, FxHashMap<u32, String>) {
        let symbolic = basefont.contains("Symbol") || basefont.contains("Dingbats");
        let default_base = if symbolic {
            None
        } else {
            Some(BaseEncoding::Standard)
        };
        let mut base = default_base;
        let mut differences: &[Object] = &[];
        match get(doc, dict, b"Encoding") {
            Some(Object::Name(name)) => base = BaseEncoding::from_name(name).or(default_base),
            Some(Object::Dictionary(enc)) => {
                if let Some(name) = get_name(doc, enc, b"BaseEncoding") {
                    base = BaseEncoding::from_name(name).or(default_base);
                }
                differences = get_array(doc, enc, b"Differences").unwrap_or(&[]);
            }
            _ => {}
        }

        let mut table = base.map_or_else(|| vec![None; 256], BaseEncoding::table);
        let mut glyph_names = FxHashMap::default();
        let mut code = 0u32;
        for item in differences {
            match resolve(doc, item) {
                Some(Object::Integer(n)) => code = (*n).clamp(0, 255) as u32,
                Some(Object::Name(name)) => {
                    let name = String::from_utf8_lossy(name).into_owned();
                    if let Some(slot) = table.get_mut(code as usize) {
                        *slot = glyph_name_to_unicode(&name);
                    }
                    glyph_names.insert(code, name);
                    code += 1;
                }
                _ => {}
            }
        }
        (table, glyph_names)
    }

    fn type3_glyphs(
        doc: &Document,
        dict: &Dictionary,
        glyph_names: &FxHashMap<u32, String>,
    ) -> FxHashMap<u32, Arc<Type3Glyph>> {
        let Some(procs) = get_dict(doc, dict, b"CharProcs") else {
            return FxHashMap::default();
        };
        glyph_names
            .iter()
            .filter_map(|(code, name)| {
                let stream = get_stream(doc, procs, name.as_bytes())?;
                Some((
                    *code,
                    Arc::new(Type3Glyph {
                        content: stream_data(stream),
                    }),
                ))
            })
            .collect()
    }

    pub const fn kind(&self) -> FontKind {
        self.kind
    }

    pub fn is_multibyte(&self) -> bool {
        self.kind == FontKind::Composite
            && self
                .to_unicode
                .as_ref()
                .is_none_or(|m| m.code_lengths().first().is_none_or(|len| *len >= 2))
    }

    /// Splits a shown string into character codes.
    pub fn decode(&self, data: &[u8]) -> DecodedCodes {
        if self.is_multibyte() {
            data.chunks(2)
                .map(|pair| {
                    let code = pair.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
                    (code, pair.len())
                })
                .collect()
        } else {
            data.iter().map(|&b| (u32::from(b), 1)).collect()
        }
    }

    /// Horizontal advance of a glyph in text space, per unit of font size.
    pub fn char_width(&self, code: u32) -> f64 {
        let glyph_width = match &self.widths {
            Widths::Simple {
                first_char,
                widths,
                missing,
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied()
                .unwrap_or(*missing),
            Widths::Composite { default, widths } => widths.get(&code).copied().unwrap_or(*default),
        };
        glyph_width * self.font_matrix.0
    }

    /// Unicode text of a code, or None when the font gives no mapping.
    pub fn to_unicode(&self, code: u32) -> Option<String> {
        if let Some(text) = self.to_unicode.as_ref().and_then(|m| m.get(code)) {
            return Some(text.to_string());
        }
        self.encoding
            .get(code as usize)
            .and_then(|slot| slot.clone())
    }

    /// Text used for a glyph: the mapped text or a `(cid:N)` placeholder.
    pub fn glyph_text(&self, code: u32) -> String {
        self.to_unicode(code)
            .unwrap_or_else(|| format!("(cid:{code})"))
    }

    pub const fn ascent(&self) -> f64 {
        self.ascent
    }

    pub const fn descent(&self) -> f64 {
        self.descent
    }

    pub const fn font_matrix(&self) -> Matrix {
        self.font_matrix
    }

    pub fn type3_glyph(&self, code: u32) -> Option<Arc<Type3Glyph>> {
        self.type3_glyphs.get(&code).cloned()
    }

    pub fn type3_resources(&self) -> Option<Arc<Dictionary>> {
        self.type3_resources.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};

    #[test]
    fn test_simple_font_widths_and_encoding() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "FirstChar" => 65,
            "Widths" => vec![667.into(), 667.into()],
            "Encoding" => "WinAnsiEncoding",
        };
        let font = PdfFont::load(&doc, &font);
        assert_eq!(font.kind(), FontKind::Simple);
        assert!(!font.is_multibyte());
        assert!((font.char_width(65) - 0.667).abs() < 1e-9);
        assert!((font.char_width(32) - 0.5).abs() < 1e-9);
        assert_eq!(font.glyph_text(0x41), "A");
        assert_eq!(font.glyph_text(0x92), "\u{2019}");
    }

    #[test]
    fn test_differences_override_base_encoding() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Subtype" => "Type1",
            "BaseFont" => "Custom",
            "Encoding" => dictionary! {
                "BaseEncoding" => "WinAnsiEncoding",
                "Differences" => vec![65.into(), "fi".into(), "eacute".into()],
            },
        };
        let font = PdfFont::load(&doc, &font);
        assert_eq!(font.glyph_text(65), "\u{FB01}");
        assert_eq!(font.glyph_text(66), "é");
        assert_eq!(font.glyph_text(67), "C");
    }

    #[test]
    fn test_composite_font_decodes_two_byte_codes() {
        let mut doc = Document::with_version("1.5");
        let cmap = doc.add_object(Stream::new(
            dictionary! {},
            b"begincodespacerange <0000> <FFFF> endcodespacerange 1 beginbfchar <0005> <0058> endbfchar"
                .to_vec(),
        ));
        let font = dictionary! {
            "Subtype" => "Type0",
            "BaseFont" => "Noto",
            "Encoding" => "Identity-H",
            "ToUnicode" => cmap,
            "DescendantFonts" => vec![Object::Dictionary(dictionary! {
                "Subtype" => "CIDFontType2",
                "DW" => 1000,
                "W" => vec![5.into(), vec![Object::from(250)].into(), 10.into(), 12.into(), 700.into()],
            })],
        };
        let font = PdfFont::load(&doc, &font);
        assert!(font.is_multibyte());
        let codes: Vec<u32> = font.decode(&[0x00, 0x05, 0x00, 0x0B]).iter().map(|(c, _)| *c).collect();
        assert_eq!(codes, vec![5, 11]);
        assert!((font.char_width(5) - 0.25).abs() < 1e-9);
        assert!((font.char_width(11) - 0.7).abs() < 1e-9);
        assert!((font.char_width(99) - 1.0).abs() < 1e-9);
        assert_eq!(font.glyph_text(5), "X");
        assert_eq!(font.glyph_text(11), "(cid:11)");
    }

    #[test]
    fn test_width_run_past_last_code_is_cut() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Subtype" => "Type0",
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Dictionary(dictionary! {
                "Subtype" => "CIDFontType2",
                "W" => vec![
                    Object::Integer(i64::from(u32::MAX)),
                    vec![Object::from(250), Object::from(300)].into(),
                    7.into(),
                    vec![Object::from(400)].into(),
                ],
            })],
        };
        let font = PdfFont::load(&doc, &font);
        assert!((font.char_width(u32::MAX) - 0.25).abs() < 1e-9);
        assert!((font.char_width(7) - 0.4).abs() < 1e-9);
        assert!((font.char_width(8) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_descriptor_metrics() {
        let doc = Document::with_version("1.5");
        let font = dictionary! {
            "Subtype" => "TrueType",
            "FontDescriptor" => dictionary! { "Ascent" => 800, "Descent" => -200 },
        };
        let font = PdfFont::load(&doc, &font);
        assert!((font.ascent() - 0.8).abs() < 1e-9);
        assert!((font.descent() + 0.2).abs() < 1e-9);
    }
}
