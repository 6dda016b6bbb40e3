//! PDF document: load, page tree, page lookup.

use lopdf::{Document, ObjectId};

use super::objects::get_dict;
use super::page::PdfPage;
use crate::error::{ExtractError, Result};

/// A parsed, read-only PDF document.
pub struct PdfDocument {
    doc: Document,
    /// Page object ids in page order.
    pages: Vec<ObjectId>,
}

impl PdfDocument {
    /// Parses a document held in memory.
    ///
    /// Parse failures are [`ExtractError::Load`]; a document without a
    /// catalog or page tree is [`ExtractError::NoPageTree`].
    pub fn load(data: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(data)?;
        Self::from_document(doc)
    }

    pub fn from_document(doc: Document) -> Result<Self> {
        let catalog = doc.catalog().map_err(|_| ExtractError::NoPageTree)?;
        if get_dict(&doc, catalog, b"Pages").is_none() {
            return Err(ExtractError::NoPageTree);
        }
        let pages = doc.get_pages().into_values().collect();
        Ok(Self { doc, pages })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page by 1-based number. None when out of range or when the page
    /// object is broken.
    pub fn page(&self, number: usize) -> Option<PdfPage<'_>> {
        let id = *self.pages.get(number.checked_sub(1)?)?;
        PdfPage::load(&self.doc, id)
    }
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("pages", &self.pages.len())
            .finish()
    }
}
