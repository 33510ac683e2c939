//! Text decoding for dump files.
//!
//! Dumps exported on Windows tooling are frequently UTF-16LE, everything else
//! is UTF-8. The decoder tries UTF-8 first and falls back to UTF-16LE; it never
//! returns lossy text.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

const BOM: char = '\u{feff}';

/// Encoding a [`SourceDocument`] was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-16le")]
    Utf16Le,
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceEncoding::Utf8 => write!(f, "utf-8"),
            SourceEncoding::Utf16Le => write!(f, "utf-16le"),
        }
    }
}

/// Decoded content of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    text: String,
    encoding: SourceEncoding,
}

impl SourceDocument {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Both decoding attempts failed.
#[derive(Debug, Error)]
#[error("not valid UTF-8 ({utf8}); not valid UTF-16LE ({utf16})")]
pub struct DecodeError {
    utf8: String,
    utf16: String,
}

/// Decode raw file bytes, UTF-8 first, then UTF-16LE.
///
/// Valid UTF-8 is never rejected. It is reread as UTF-16LE only when it has
/// the shape of BOM-less UTF-16LE (mostly ASCII units with a zero high byte)
/// and the wide decoding is clean; otherwise the UTF-8 text is kept.
pub fn decode(bytes: Vec<u8>) -> Result<SourceDocument, DecodeError> {
    let (utf8, bytes) = match String::from_utf8(bytes) {
        Ok(text) => {
            if text.contains('\0') && looks_like_utf16le(text.as_bytes()) {
                if let Ok(wide) = decode_utf16le(text.as_bytes()) {
                    if !wide.contains('\0') {
                        return Ok(SourceDocument {
                            text: wide,
                            encoding: SourceEncoding::Utf16Le,
                        });
                    }
                }
            }
            return Ok(SourceDocument {
                text,
                encoding: SourceEncoding::Utf8,
            });
        }
        Err(e) => (e.utf8_error().to_string(), e.into_bytes()),
    };

    match decode_utf16le(&bytes) {
        Ok(text) => Ok(SourceDocument {
            text,
            encoding: SourceEncoding::Utf16Le,
        }),
        Err(utf16) => Err(DecodeError { utf8, utf16 }),
    }
}

/// Even length, and at least half of the 16-bit units are non-NUL with a
/// zero high byte (ASCII-range characters encoded as UTF-16LE).
fn looks_like_utf16le(bytes: &[u8]) -> bool {
    if bytes.is_empty() || bytes.len() % 2 != 0 {
        return false;
    }
    let units = bytes.len() / 2;
    let narrow = bytes
        .chunks_exact(2)
        .filter(|pair| pair[0] != 0 && pair[1] == 0)
        .count();
    narrow * 2 >= units
}

fn decode_utf16le(bytes: &[u8]) -> Result<String, String> {
    if bytes.len() % 2 != 0 {
        return Err(format!("truncated data: odd byte count {}", bytes.len()));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    let mut text = String::from_utf16(&units).map_err(|e| e.to_string())?;
    if text.starts_with(BOM) {
        text.drain(..BOM.len_utf8());
    }
    Ok(text)
}
