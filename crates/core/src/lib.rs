//! pdf2msgpack - stream PDF page geometry as MessagePack.
//!
//! A document becomes one MessagePack array holding one array per page.
//! Depending on [`ExtractMode`], a page array holds the vector paths painted
//! on the page or the boxes and text of its glyphs.

pub mod document;
pub mod driver;
pub mod encoder;
pub mod error;
pub mod glyphs;
pub mod interp;
pub mod layout;
pub mod model;
pub mod paths;
pub mod record;
pub mod sandbox;
pub mod transform;
pub mod utils;

pub use document::{PdfDocument, PdfPage};
pub use driver::{DocumentDriver, ExtractMode, ExtractOptions, pdf_to_msgpack};
pub use encoder::{CountedBuffer, StreamEncoder};
pub use error::{ExtractError, Result};
pub use layout::LAParams;
pub use model::PathKind;
pub use record::{CURVE_TO, GlyphRecord, LINE_TO, PathRecord, Record};
