//! PDF document access on top of `lopdf`.
//!
//! - `catalog` - document loading and page lookup (PdfDocument)
//! - `page` - page attributes, contents and device mapping (PdfPage)
//! - `objects` - typed accessors for `lopdf` objects

pub mod catalog;
pub mod objects;
pub mod page;

pub use catalog::PdfDocument;
pub use page::PdfPage;
