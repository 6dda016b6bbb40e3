//! Helpers for reading typed values out of `lopdf` objects.
//!
//! Every accessor resolves indirect references first and returns `None` on
//! type mismatches, leaving the caller to choose a default.

use lopdf::{Dictionary, Document, Object, Stream};

use crate::utils::{Matrix, Rect};

/// Follows indirect references. Broken references resolve to None.
pub fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    doc.dereference(obj).ok().map(|(_, obj)| obj)
}

pub fn get<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().and_then(|obj| resolve(doc, obj))
}

pub fn as_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

pub fn get_f64(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<f64> {
    get(doc, dict, key).and_then(as_f64)
}

pub fn get_i64(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match get(doc, dict, key)? {
        Object::Integer(i) => Some(*i),
        Object::Real(r) => Some(f64::from(*r) as i64),
        _ => None,
    }
}

pub fn get_name<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    match get(doc, dict, key)? {
        Object::Name(name) => Some(name.as_slice()),
        _ => None,
    }
}

pub fn get_dict<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Dictionary> {
    match get(doc, dict, key)? {
        Object::Dictionary(d) => Some(d),
        Object::Stream(s) => Some(&s.dict),
        _ => None,
    }
}

pub fn get_array<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a [Object]> {
    match get(doc, dict, key)? {
        Object::Array(items) => Some(items.as_slice()),
        _ => None,
    }
}

pub fn get_stream<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Stream> {
    match get(doc, dict, key)? {
        Object::Stream(s) => Some(s),
        _ => None,
    }
}

/// Numbers of an array, resolving references element by element.
pub fn numbers(doc: &Document, items: &[Object]) -> Vec<f64> {
    items
        .iter()
        .filter_map(|item| resolve(doc, item).and_then(as_f64))
        .collect()
}

pub fn get_rect(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<Rect> {
    match numbers(doc, get_array(doc, dict, key)?).as_slice() {
        &[x0, y0, x1, y1] => Some((x0, y0, x1, y1)),
        _ => None,
    }
}

pub fn get_matrix(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<Matrix> {
    match numbers(doc, get_array(doc, dict, key)?).as_slice() {
        &[a, b, c, d, e, f] => Some((a, b, c, d, e, f)),
        _ => None,
    }
}

/// Stream bytes with filters applied; unfiltered streams are returned as is.
pub fn stream_data(stream: &Stream) -> Vec<u8> {
    if stream.dict.has(b"Filter") {
        match stream.decompressed_content() {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!("failed to decode stream: {err}");
                Vec::new()
            }
        }
    } else {
        stream.content.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn test_typed_getters_follow_references() {
        let mut doc = Document::with_version("1.5");
        let width = doc.add_object(Object::Integer(42));
        let dict = dictionary! {
            "Width" => width,
            "Scale" => 0.5,
            "Name" => "Foo",
            "Box" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        assert_eq!(get_f64(&doc, &dict, b"Width"), Some(42.0));
        assert_eq!(get_f64(&doc, &dict, b"Scale"), Some(0.5));
        assert_eq!(get_name(&doc, &dict, b"Name"), Some(&b"Foo"[..]));
        assert_eq!(get_rect(&doc, &dict, b"Box"), Some((0.0, 0.0, 612.0, 792.0)));
        assert_eq!(get_f64(&doc, &dict, b"Missing"), None);
        assert_eq!(get_matrix(&doc, &dict, b"Box"), None);
    }

    #[test]
    fn test_unfiltered_stream_data() {
        let stream = Stream::new(dictionary! {}, b"0 0 m".to_vec());
        assert_eq!(stream_data(&stream), b"0 0 m".to_vec());
    }
}
