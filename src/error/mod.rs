//! Error types for XML-to-map conversion.
//!
//! Tokenizer failures are reported as a [`ParseError`] carrying line, column
//! and byte offset information. The top-level [`Error`] distinguishes between
//! unreadable input, malformed XML and undecodable bytes. A failed parse never
//! yields a partial document map.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Source location within an XML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl SourceLocation {
    /// Computes the line and column of `byte_offset` within `input`.
    ///
    /// Offsets past the end of the input are clamped to the end. Invalid
    /// UTF-8 sequences count as one column per byte.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_offset(input: &[u8], byte_offset: usize) -> Self {
        let end = byte_offset.min(input.len());
        let consumed = &input[..end];
        let line_start = consumed
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);
        let line = consumed.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = String::from_utf8_lossy(&consumed[line_start..])
            .chars()
            .count()
            + 1;
        Self {
            line: line as u32,
            column: column as u32,
            byte_offset: end,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A failure reported while tokenizing or building a document map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The primary error message.
    pub message: String,
    /// Where in the source the error occurred.
    pub location: SourceLocation,
}

impl ParseError {
    /// Creates an error at the given byte offset of `input`.
    #[must_use]
    pub fn at(input: &[u8], byte_offset: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: SourceLocation::from_offset(input, byte_offset),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}: {}", self.location, self.message)
    }
}

impl std::error::Error for ParseError {}

/// The error type returned by the parse entry points.
#[derive(Debug)]
pub enum Error {
    /// The source file could not be read.
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The input is not well-formed XML.
    Parse(ParseError),
    /// The input bytes could not be decoded as text.
    Encoding(ParseError),
}

impl Error {
    /// Returns the parse location, if the error came from the input itself.
    #[must_use]
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Self::Io { .. } => None,
            Self::Parse(e) | Self::Encoding(e) => Some(e.location),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Parse(e) => write!(f, "{e}"),
            Self::Encoding(e) => write!(f, "encoding error at {}: {}", e.location, e.message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) | Self::Encoding(e) => Some(e),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}
