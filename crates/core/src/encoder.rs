//! Streaming MessagePack writer for length-prefixed record arrays.
//!
//! A MessagePack array header carries its element count, so a page array can
//! only be written once its size is known. Two strategies are offered:
//!
//! - **Analytic count**: the caller computes the count up front and streams
//!   records straight to the sink with [`StreamEncoder::write_array`].
//! - **Count via buffer**: records go into a [`CountedBuffer`] which is
//!   flushed behind its header with [`StreamEncoder::write_counted`].

use std::io::Write;

use rmp::encode::write_array_len;

use crate::error::{ExtractError, Result};
use crate::record::Record;

/// Records serialised into memory, with their count.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CountedBuffer {
    bytes: Vec<u8>,
    count: usize,
}

impl CountedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<R: Record>(&mut self, record: &R) -> Result<()> {
        record.encode(&mut self.bytes)?;
        self.count += 1;
        Ok(())
    }

    pub const fn count(&self) -> usize {
        self.count
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// The output sink of a document, passed by `&mut` to page extractors.
#[derive(Debug)]
pub struct StreamEncoder<W: Write> {
    wr: W,
}

impl<W: Write> StreamEncoder<W> {
    pub const fn new(wr: W) -> Self {
        Self { wr }
    }

    /// Writes an array header for `len` elements.
    pub fn begin_array(&mut self, len: usize) -> Result<()> {
        let len32 = u32::try_from(len).map_err(|_| ExtractError::TooManyRecords(len))?;
        write_array_len(&mut self.wr, len32)?;
        Ok(())
    }

    /// Writes a header for `declared` records, then the records. Fails with
    /// [`ExtractError::CountMismatch`] when the iterator yields a different
    /// number; surplus records are never written.
    pub fn write_array<R, I>(&mut self, declared: usize, records: I) -> Result<()>
    where
        R: Record,
        I: IntoIterator<Item = R>,
    {
        self.begin_array(declared)?;
        let mut written = 0usize;
        for record in records {
            if written == declared {
                return Err(ExtractError::CountMismatch {
                    declared,
                    written: written + 1,
                });
            }
            record.encode(&mut self.wr)?;
            written += 1;
        }
        if written != declared {
            return Err(ExtractError::CountMismatch { declared, written });
        }
        Ok(())
    }

    /// Writes a header for the buffered records, then their bytes verbatim.
    pub fn write_counted(&mut self, buffer: &CountedBuffer) -> Result<()> {
        self.begin_array(buffer.count())?;
        self.wr.write_all(buffer.as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.wr.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.wr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PathKind;
    use crate::record::{GlyphRecord, PathRecord};

    fn line(x: f64) -> PathRecord {
        PathRecord::LineTo {
            kind: PathKind::NonzeroFill,
            point: (x, 0.0),
        }
    }

    #[test]
    fn test_counted_buffer_is_written_behind_header() {
        let mut buffer = CountedBuffer::new();
        buffer.push(&line(1.0)).unwrap();
        buffer.push(&line(2.0)).unwrap();
        assert_eq!(buffer.count(), 2);

        let mut enc = StreamEncoder::new(Vec::new());
        enc.write_counted(&buffer).unwrap();
        let out = enc.into_inner();
        assert_eq!(out[0], 0x92);
        assert_eq!(&out[1..], buffer.as_bytes());
    }

    #[test]
    fn test_empty_buffer_writes_empty_array() {
        let mut enc = StreamEncoder::new(Vec::new());
        enc.write_counted(&CountedBuffer::new()).unwrap();
        assert_eq!(enc.into_inner(), vec![0x90]);
    }

    #[test]
    fn test_write_array_checks_declared_count() {
        let records = [GlyphRecord {
            bbox: (0.0, 0.0, 1.0, 1.0),
            text: "a",
        }];
        let mut enc = StreamEncoder::new(Vec::new());
        enc.write_array(1, records).unwrap();

        let mut enc = StreamEncoder::new(Vec::new());
        let err = enc.write_array(2, records).unwrap_err();
        assert!(matches!(err, ExtractError::CountMismatch { declared: 2, written: 1 }));

        let mut enc = StreamEncoder::new(Vec::new());
        let err = enc.write_array(0, records).unwrap_err();
        assert!(matches!(err, ExtractError::CountMismatch { declared: 0, written: 1 }));
        // only the header made it out
        assert_eq!(enc.into_inner(), vec![0x90]);
    }

    #[test]
    fn test_large_headers_use_array16() {
        let mut enc = StreamEncoder::new(Vec::new());
        enc.begin_array(300).unwrap();
        assert_eq!(enc.into_inner(), vec![0xdc, 0x01, 0x2c]);
    }
}
