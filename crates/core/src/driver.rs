//! Document driver: opens a document and streams every page as one
//! MessagePack array inside a document-level array.

use std::io::Write;
use std::path::Path;

use crate::document::{PdfDocument, PdfPage};
use crate::encoder::StreamEncoder;
use crate::error::{ExtractError, Result};
use crate::glyphs::WordGeometryExtractor;
use crate::interp::{Device, NopDevice, PageInterpreter, ResourceManager};
use crate::layout::{LAParams, TextOutputDevice};
use crate::paths::PathRecorder;
use crate::utils::WHOLE_PLANE;

/// Encodings text records can be written in.
const SUPPORTED_CODECS: &[&str] = &["UTF-8", "utf-8", "utf8"];

/// What each page array contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Glyph boxes with text, plus inter-word spaces
    #[default]
    Text,
    /// Line and curve records of painted paths
    Paths,
    /// Interpret pages but emit nothing (empty page arrays)
    Nop,
}

/// Options controlling extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub mode: ExtractMode,
    pub laparams: LAParams,
    /// Text encoding of emitted strings
    pub codec: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            mode: ExtractMode::default(),
            laparams: LAParams::default(),
            codec: "UTF-8".to_string(),
        }
    }
}

impl ExtractOptions {
    /// Fails with [`ExtractError::UnknownEncoding`] for codecs other than UTF-8.
    pub fn check_codec(&self) -> Result<()> {
        if SUPPORTED_CODECS.contains(&self.codec.as_str()) {
            Ok(())
        } else {
            Err(ExtractError::UnknownEncoding(self.codec.clone()))
        }
    }
}

/// Streams a whole document.
#[derive(Debug)]
pub struct DocumentDriver {
    doc: PdfDocument,
    options: ExtractOptions,
    rsrcmgr: ResourceManager,
}

impl DocumentDriver {
    /// Reads and parses the document at `path`.
    pub fn open(path: impl AsRef<Path>, options: ExtractOptions) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ExtractError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&data, options)
    }

    pub fn from_bytes(data: &[u8], options: ExtractOptions) -> Result<Self> {
        options.check_codec()?;
        let doc = PdfDocument::load(data)?;
        tracing::debug!(pages = doc.page_count(), mode = ?options.mode, "document loaded");
        Ok(Self {
            doc,
            options,
            rsrcmgr: ResourceManager::new(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    pub const fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Writes the document array: its header first, then one array per page
    /// in page order.
    pub fn dump_document<W: Write>(&mut self, out: &mut StreamEncoder<W>) -> Result<()> {
        let n_pages = self.page_count();
        out.begin_array(n_pages)?;
        for number in 1..=n_pages {
            self.dump_page(number, out)?;
        }
        tracing::debug!(fonts = self.rsrcmgr.font_count(), "document dumped");
        out.flush()
    }

    /// Writes the array of one page, by 1-based page number. A page the
    /// engine cannot load yields an empty array.
    pub fn dump_page<W: Write>(&mut self, number: usize, out: &mut StreamEncoder<W>) -> Result<()> {
        let Some(page) = self.doc.page(number) else {
            tracing::warn!(page = number, "page could not be loaded");
            return out.begin_array(0);
        };
        tracing::debug!(page = number, "extracting page");
        let rsrcmgr = &mut self.rsrcmgr;
        match self.options.mode {
            ExtractMode::Text => {
                let mut device = TextOutputDevice::new(self.options.laparams);
                run_page(&page, rsrcmgr, &mut device);
                let text_page = device.take_page();
                let selection = text_page.select(WHOLE_PLANE);
                let extractor = WordGeometryExtractor::new(&selection);
                out.write_array(extractor.count_records(), extractor.records())
            }
            ExtractMode::Paths => {
                let mut recorder = PathRecorder::new();
                run_page(&page, rsrcmgr, &mut recorder);
                let buffer = recorder.finish()?;
                out.write_counted(&buffer)
            }
            ExtractMode::Nop => {
                run_page(&page, rsrcmgr, &mut NopDevice);
                out.begin_array(0)
            }
        }
    }
}

fn run_page<'a, D: Device>(page: &PdfPage<'a>, rsrcmgr: &'a mut ResourceManager, device: &'a mut D) {
    let mut interpreter = PageInterpreter::new(page.document(), rsrcmgr, device);
    interpreter.process_page(page);
}

/// Converts a document held in memory, returning the writer.
pub fn pdf_to_msgpack<W: Write>(data: &[u8], options: ExtractOptions, writer: W) -> Result<W> {
    let mut driver = DocumentDriver::from_bytes(data, options)?;
    let mut out = StreamEncoder::new(writer);
    driver.dump_document(&mut out)?;
    Ok(out.into_inner())
}
