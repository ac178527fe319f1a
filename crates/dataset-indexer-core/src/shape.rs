//! Row/column counting for delimited-text files.
//!
//! The first physical line is the header and fixes the column count. An empty
//! first line is a header with no columns. Every later record with at least
//! one non-blank field counts as a row. Quoted fields may span lines.
//!
//! A file is decoded as UTF-8 first. If any field is not valid UTF-8 the whole
//! file is re-read as Latin-1, which maps every byte to a character and so
//! cannot fail to decode.

use csv::{ByteRecord, ReaderBuilder};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    /// Degraded default for empty, headerless or unreadable files.
    pub const EMPTY: Shape = Shape { rows: 0, cols: 0 };

    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid {encoding} in record {record}")]
    Decode {
        encoding: &'static str,
        record: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextEncoding {
    Utf8,
    Latin1,
}

impl TextEncoding {
    fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Latin1 => "Latin-1",
        }
    }

    /// `None` when the field does not decode.
    fn is_blank(self, field: &[u8]) -> Option<bool> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(field)
                .ok()
                .map(|text| text.trim().is_empty()),
            TextEncoding::Latin1 => Some(field.iter().all(|&b| char::from(b).is_whitespace())),
        }
    }
}

/// Shape of the file at `path`, with the reason when it cannot be read.
/// Callers degrade a failure to [`Shape::EMPTY`].
pub fn inspect(path: &Path) -> Result<Shape, ShapeError> {
    match count_shape(BufReader::new(File::open(path)?), TextEncoding::Utf8) {
        Err(ShapeError::Decode { record, .. }) => {
            debug!(
                "{} is not valid UTF-8 (record {}), retrying as Latin-1",
                path.display(),
                record
            );
            count_shape(BufReader::new(File::open(path)?), TextEncoding::Latin1)
        }
        result => result,
    }
}

#[cfg(test)]
fn inspect_bytes(data: &[u8]) -> Result<Shape, ShapeError> {
    match count_shape(data, TextEncoding::Utf8) {
        Err(ShapeError::Decode { .. }) => count_shape(data, TextEncoding::Latin1),
        result => result,
    }
}

fn count_shape<R: BufRead>(mut reader: R, encoding: TextEncoding) -> Result<Shape, ShapeError> {
    // The csv reader skips empty lines, so an empty header line is detected here.
    let empty_header = matches!(reader.fill_buf()?.first(), Some(b'\n' | b'\r'));

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut record = ByteRecord::new();
    let mut cols = 0;
    let mut index = 0;
    if !empty_header {
        if !rdr.read_byte_record(&mut record)? {
            return Ok(Shape::EMPTY);
        }
        decoded_blank(&record, encoding, 0)?;
        cols = record.len();
        index = 1;
    }

    let mut rows = 0;
    while rdr.read_byte_record(&mut record)? {
        if !decoded_blank(&record, encoding, index)? {
            rows += 1;
        }
        index += 1;
    }

    Ok(Shape { rows, cols })
}

/// Decode every field of `record` and report whether all of them are blank.
fn decoded_blank(
    record: &ByteRecord,
    encoding: TextEncoding,
    index: u64,
) -> Result<bool, ShapeError> {
    let mut blank = true;
    for field in record.iter() {
        match encoding.is_blank(field) {
            Some(field_blank) => blank &= field_blank,
            None => {
                return Err(ShapeError::Decode {
                    encoding: encoding.name(),
                    record: index,
                })
            }
        }
    }
    Ok(blank)
}

/// Byte length of the file, or `None` when it cannot be stat'ed.
pub fn size(path: &Path) -> Option<u64> {
    match fs::metadata(path) {
        Ok(metadata) => Some(metadata.len()),
        Err(err) => {
            debug!("Failed to stat {}: {}", path.display(), err);
            None
        }
    }
}
