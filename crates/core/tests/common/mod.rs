//! Shared helpers: in-memory PDF construction and a small MessagePack reader.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use rmp::Marker;

/// Page width and height of every generated page.
pub const PAGE_WIDTH: i64 = 200;
pub const PAGE_HEIGHT: i64 = 100;

pub fn ints(values: &[i64]) -> Object {
    Object::Array(values.iter().copied().map(Object::Integer).collect())
}

/// Shared resources: Courier as `/F1` and a form `/X1` drawing a 5pt
/// stroke, placed at (10, 10).
fn standard_resources(doc: &mut Document) -> ObjectId {
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let form_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "BBox" => ints(&[0, 0, 50, 50]),
        "Matrix" => ints(&[1, 0, 0, 1, 10, 10]),
    };
    let form_id = doc.add_object(Stream::new(form_dict, b"0 0 m 5 0 l S".to_vec()));
    doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
        "XObject" => dictionary! { "X1" => form_id },
    })
}

/// Builds a document with one page per content stream.
pub fn build_pdf(contents: &[&[u8]]) -> Vec<u8> {
    build_pdf_with(contents, |_, _| {})
}

/// Like [`build_pdf`], letting `customize` edit each page dictionary.
pub fn build_pdf_with(
    contents: &[&[u8]],
    mut customize: impl FnMut(&mut Document, &mut Dictionary),
) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources_id = standard_resources(&mut doc);

    let mut kids = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => ints(&[0, 0, PAGE_WIDTH, PAGE_HEIGHT]),
            "Resources" => resources_id,
        };
        customize(&mut doc, &mut page);
        kids.push(Object::Reference(doc.add_object(page)));
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save generated pdf");
    buf
}

/// Decoded MessagePack value, limited to what the output format uses.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Int(u64),
    Float(f64),
    Str(String),
    Array(Vec<Msg>),
}

impl Msg {
    pub fn array(&self) -> &[Msg] {
        match self {
            Msg::Array(items) => items,
            other => panic!("expected array, got {other:?}"),
        }
    }

    pub fn int(&self) -> u64 {
        match self {
            Msg::Int(v) => *v,
            other => panic!("expected int, got {other:?}"),
        }
    }

    pub fn float(&self) -> f64 {
        match self {
            Msg::Float(v) => *v,
            other => panic!("expected float, got {other:?}"),
        }
    }

    pub fn str(&self) -> &str {
        match self {
            Msg::Str(s) => s,
            other => panic!("expected str, got {other:?}"),
        }
    }
}

fn take<const N: usize>(rd: &mut &[u8]) -> [u8; N] {
    let (head, rest) = rd.split_at(N);
    *rd = rest;
    head.try_into().expect("exact length")
}

fn read_str(rd: &mut &[u8], len: usize) -> Msg {
    let (head, rest) = rd.split_at(len);
    *rd = rest;
    Msg::Str(String::from_utf8(head.to_vec()).expect("utf-8 text"))
}

fn read_array(rd: &mut &[u8], len: usize) -> Msg {
    Msg::Array((0..len).map(|_| read_value(rd)).collect())
}

/// Reads one value from the front of `rd`.
pub fn read_value(rd: &mut &[u8]) -> Msg {
    let marker = rmp::decode::read_marker(rd).expect("marker");
    match marker {
        Marker::FixPos(v) => Msg::Int(u64::from(v)),
        Marker::U8 => Msg::Int(u64::from(take::<1>(rd)[0])),
        Marker::F64 => Msg::Float(f64::from_be_bytes(take::<8>(rd))),
        Marker::FixStr(len) => read_str(rd, usize::from(len)),
        Marker::Str8 => {
            let len = take::<1>(rd)[0];
            read_str(rd, usize::from(len))
        }
        Marker::Str16 => {
            let len = u16::from_be_bytes(take::<2>(rd));
            read_str(rd, usize::from(len))
        }
        Marker::FixArray(len) => read_array(rd, usize::from(len)),
        Marker::Array16 => {
            let len = u16::from_be_bytes(take::<2>(rd));
            read_array(rd, usize::from(len))
        }
        Marker::Array32 => {
            let len = u32::from_be_bytes(take::<4>(rd));
            read_array(rd, len as usize)
        }
        other => panic!("unexpected marker {other:?}"),
    }
}

/// Decodes a whole output stream, asserting nothing trails the document
/// array. Returns the page arrays.
pub fn decode_document(bytes: &[u8]) -> Vec<Msg> {
    let mut rd = bytes;
    let doc = read_value(&mut rd);
    assert!(rd.is_empty(), "{} trailing bytes after document", rd.len());
    doc.array().to_vec()
}
