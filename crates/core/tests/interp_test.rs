//! Interpreter tests against a device recording every callback.

mod common;

use common::{build_pdf, build_pdf_with, ints};
use lopdf::{Object, Stream, dictionary};
use pdf2msgpack_core::interp::{Device, PageInterpreter, RenderedChar, ResourceManager};
use pdf2msgpack_core::model::{GfxPath, PathKind};
use pdf2msgpack_core::utils::{Matrix, Rect, apply_matrix_pt};
use pdf2msgpack_core::{ExtractMode, ExtractOptions, PdfDocument, pdf_to_msgpack};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    BeginPage(Rect),
    /// Kind and the device-space end point of each subpath
    Paint(PathKind, Vec<(f64, f64)>),
    Char(String),
    EndPage,
}

#[derive(Default)]
struct RecordingDevice {
    events: Vec<Event>,
    type3: bool,
}

impl Device for RecordingDevice {
    fn interprets_type3_chars(&self) -> bool {
        self.type3
    }

    fn begin_page(&mut self, bbox: Rect, _ctm: Matrix) {
        self.events.push(Event::BeginPage(bbox));
    }

    fn end_page(&mut self) {
        self.events.push(Event::EndPage);
    }

    fn paint_path(&mut self, kind: PathKind, ctm: &Matrix, path: &GfxPath) {
        let ends = path
            .subpaths()
            .iter()
            .map(|sub| apply_matrix_pt(*ctm, sub.last_point()))
            .collect();
        self.events.push(Event::Paint(kind, ends));
    }

    fn draw_char(&mut self, ch: &RenderedChar) {
        self.events.push(Event::Char(ch.text.clone()));
    }
}

fn run(pdf: &[u8], type3: bool) -> Vec<Event> {
    let doc = PdfDocument::load(pdf).expect("load");
    let page = doc.page(1).expect("first page");
    let mut rsrcmgr = ResourceManager::new();
    let mut device = RecordingDevice {
        type3,
        ..RecordingDevice::default()
    };
    PageInterpreter::new(page.document(), &mut rsrcmgr, &mut device).process_page(&page);
    device.events
}

fn paints(events: &[Event]) -> Vec<(PathKind, Vec<(f64, f64)>)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Paint(kind, ends) => Some((*kind, ends.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_page_is_bracketed() {
    let events = run(&build_pdf(&[b"0 0 m 1 1 l S"]), false);
    assert_eq!(events.first(), Some(&Event::BeginPage((0.0, 0.0, 200.0, 100.0))));
    assert_eq!(events.last(), Some(&Event::EndPage));
}

#[test]
fn test_paint_operators() {
    let events = run(
        &build_pdf(&[b"0 0 m 5 0 l S 0 0 m 5 0 l s 0 0 m 5 0 l F 0 0 m 5 0 l b* 0 0 m 5 0 l n"]),
        false,
    );
    let kinds: Vec<PathKind> = paints(&events).into_iter().map(|(k, _)| k).collect();
    assert_eq!(
        kinds,
        vec![
            PathKind::Stroke,
            PathKind::Stroke,
            PathKind::NonzeroFill,
            PathKind::EvenOddFill,
            PathKind::Stroke,
        ]
    );
}

#[test]
fn test_paint_without_subpath_is_skipped() {
    let events = run(&build_pdf(&[b"S f 10 10 m f"]), false);
    assert!(paints(&events).is_empty());
}

#[test]
fn test_unbalanced_restore_is_tolerated() {
    let events = run(&build_pdf(&[b"Q Q 0 0 m 5 0 l S"]), false);
    assert_eq!(paints(&events).len(), 1);
}

#[test]
fn test_recursive_form_terminates() {
    let pdf = build_pdf_with(&[b"/Loop Do"], |doc, page| {
        let form_id = doc.new_object_id();
        let form = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => ints(&[0, 0, 10, 10]),
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Loop" => form_id },
                },
            },
            b"0 0 m 1 0 l S /Loop Do".to_vec(),
        );
        doc.objects.insert(form_id, Object::Stream(form));
        page.set(
            "Resources",
            dictionary! { "XObject" => dictionary! { "Loop" => form_id } },
        );
    });
    let events = run(&pdf, false);
    assert_eq!(paints(&events).len(), 1);
    assert_eq!(events.last(), Some(&Event::EndPage));
}

fn annotation(doc: &mut lopdf::Document, flags: i64) -> Object {
    let ap = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => ints(&[0, 0, 10, 10]),
        },
        b"0 0 m 10 0 l S".to_vec(),
    ));
    let annot = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Square",
        "Rect" => ints(&[50, 50, 60, 60]),
        "F" => flags,
        "AP" => dictionary! { "N" => ap },
    });
    Object::Reference(annot)
}

#[test]
fn test_annotation_appearance_follows_content() {
    let pdf = build_pdf_with(&[b"0 0 m 1 0 l S"], |doc, page| {
        let annots = vec![annotation(doc, 0), annotation(doc, 2)];
        page.set("Annots", annots);
    });
    let painted = paints(&run(&pdf, false));
    // the hidden annotation is skipped
    assert_eq!(painted.len(), 2);
    assert_eq!(painted[0].1, vec![(1.0, 100.0)]);
    assert_eq!(painted[1].1, vec![(60.0, 50.0)]);
}

fn type3_pdf() -> Vec<u8> {
    build_pdf_with(&[b"BT /T3 10 Tf 10 50 Td (a) Tj ET"], |doc, page| {
        let glyph = doc.add_object(Stream::new(dictionary! {}, b"0 0 m 1000 0 l S".to_vec()));
        let font = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type3",
            "FontBBox" => ints(&[0, 0, 1000, 1000]),
            "FontMatrix" => vec![
                Object::Real(0.001), 0.into(), 0.into(), Object::Real(0.001), 0.into(), 0.into(),
            ],
            "CharProcs" => dictionary! { "a" => glyph },
            "Encoding" => dictionary! {
                "Type" => "Encoding",
                "Differences" => vec![97.into(), Object::Name(b"a".to_vec())],
            },
            "FirstChar" => 97,
            "LastChar" => 97,
            "Widths" => ints(&[1000]),
        });
        page.set("Resources", dictionary! { "Font" => dictionary! { "T3" => font } });
    })
}

#[test]
fn test_type3_glyph_runs_for_requesting_device() {
    let events = run(&type3_pdf(), true);
    let painted = paints(&events);
    assert_eq!(painted.len(), 1);
    let (x, y) = painted[0].1[0];
    // FontMatrix entries are stored as f32
    assert!((x - 20.0).abs() < 1e-4 && (y - 50.0).abs() < 1e-4, "glyph end at ({x}, {y})");
    assert!(events.contains(&Event::Char("a".to_string())));
}

#[test]
fn test_type3_glyph_skipped_for_text_devices() {
    let events = run(&type3_pdf(), false);
    assert!(paints(&events).is_empty());
    assert!(events.contains(&Event::Char("a".to_string())));
}

#[test]
fn test_type3_paths_are_recorded() {
    let options = ExtractOptions {
        mode: ExtractMode::Paths,
        ..ExtractOptions::default()
    };
    let out = pdf_to_msgpack(&type3_pdf(), options, Vec::new()).unwrap();
    let pages = common::decode_document(&out);
    assert_eq!(pages[0].array().len(), 1);
}
