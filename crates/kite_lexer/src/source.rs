//! Source buffer — an immutable sequence of Unicode scalar values.
//!
//! All indices are code-point offsets, never byte offsets. The driver
//! decodes files from UTF-8 before lexing; invalid UTF-8 is reported here,
//! not by the lexer.

/// UTF-8 decoding error, positioned at the offending byte.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid UTF-8 sequence at byte offset {byte_offset}")]
pub struct Utf8DecodeError {
    pub byte_offset: usize,
}

/// An immutable Unicode source text addressed by code point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    chars: Vec<char>,
}

impl SourceBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    /// Length in code points.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The code point at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    /// The text between two code-point offsets.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }
}

impl From<&str> for SourceBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Decode a raw byte stream into a source buffer.
///
/// The error carries the byte offset of the first invalid sequence so the
/// driver can render a positioned diagnostic.
pub fn decode_utf8(bytes: &[u8]) -> Result<SourceBuffer, Utf8DecodeError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(SourceBuffer::new(text)),
        Err(err) => Err(Utf8DecodeError {
            byte_offset: err.valid_up_to(),
        }),
    }
}
