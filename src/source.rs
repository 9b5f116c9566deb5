//! Reading and decoding dump files.
//!
//! Dumps may be compressed (detected from the file extension) and are
//! decoded with a caller-chosen text encoding. phpMyAdmin exports of old
//! MySQL servers are typically latin1, which is the default.

use crate::error::{ImportError, Result};
use encoding_rs::Encoding;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const DEFAULT_ENCODING: &str = "latin1";

/// Labels decoded as strict ISO-8859-1 (every byte maps to the same code point).
const LATIN1_LABELS: &[&str] = &["latin1", "latin-1", "iso-8859-1", "iso8859-1", "l1"];

/// Compression format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl Compression {
    /// Detect compression format from file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("gz" | "gzip") => Compression::Gzip,
            Some("bz2" | "bzip2") => Compression::Bzip2,
            Some("xz" | "lzma") => Compression::Xz,
            Some("zst" | "zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }

    /// Wrap a reader with the appropriate decompressor
    pub fn wrap_reader<'a>(&self, reader: Box<dyn Read + 'a>) -> std::io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => reader,
            Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Compression::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
            Compression::Bzip2 => write!(f, "bzip2"),
            Compression::Xz => write!(f, "xz"),
            Compression::Zstd => write!(f, "zstd"),
        }
    }
}

/// Read a whole dump file, decompressing and decoding it.
pub fn read_dump(path: &Path, encoding: &str) -> Result<String> {
    let bytes = read_bytes(path)?;
    decode(&bytes, encoding).map_err(|err| match err {
        DecodeError::Unknown => ImportError::UnknownEncoding(encoding.to_string()),
        DecodeError::Malformed => ImportError::Decode {
            path: path.to_path_buf(),
            encoding: encoding.to_string(),
        },
    })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| ImportError::io(path, e))?;
    let mut reader = Compression::from_path(path)
        .wrap_reader(Box::new(file))
        .map_err(|e| ImportError::io(path, e))?;

    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ImportError::io(path, e))?;
    Ok(bytes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Label names no known encoding
    Unknown,
    /// Input is not valid in the encoding
    Malformed,
}

/// Decode bytes with an encoding label (`latin1`, `utf-8`, `windows-1252`, ...).
pub fn decode(bytes: &[u8], label: &str) -> std::result::Result<String, DecodeError> {
    let label = label.trim();
    if LATIN1_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
        return Ok(encoding_rs::mem::decode_latin1(bytes).into_owned());
    }

    let encoding = Encoding::for_label(label.as_bytes()).ok_or(DecodeError::Unknown)?;
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(DecodeError::Malformed);
    }
    Ok(text.into_owned())
}
