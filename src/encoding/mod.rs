//! Input encoding detection and transcoding.
//!
//! The tokenizer works on UTF-8 only. Input that announces another encoding,
//! either with a UTF-16 byte order mark or with an `encoding="..."` label in
//! its XML declaration, is transcoded through `encoding_rs` first. Input that
//! is already valid UTF-8 is passed through untouched whatever its
//! declaration says, so text taken from a Rust `&str` is never re-decoded.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{Error, ParseError};
use crate::trace;

/// Only this many leading bytes are searched for an XML declaration.
const DECLARATION_SCAN_LIMIT: usize = 200;

/// Returns the input as UTF-8 bytes, transcoding when necessary.
///
/// A UTF-8 byte order mark is stripped. Invalid UTF-8 without a declared
/// alternative is passed through so the tokenizer can report the exact
/// position of the bad sequence.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the declared encoding is unknown or the
/// input is malformed for its encoding.
pub(crate) fn decode_input(input: &[u8]) -> Result<Cow<'_, [u8]>, Error> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(input) {
        let body = &input[bom_len..];
        if encoding == UTF_8 {
            return Ok(Cow::Borrowed(body));
        }
        return transcode(input, body, encoding);
    }

    let Some(label) = declared_label(input) else {
        return Ok(Cow::Borrowed(input));
    };
    let encoding = Encoding::for_label(label).ok_or_else(|| {
        let label = String::from_utf8_lossy(label);
        Error::Encoding(ParseError::at(
            input,
            0,
            format!("unsupported encoding: {label}"),
        ))
    })?;
    if encoding == UTF_8 || std::str::from_utf8(input).is_ok() {
        return Ok(Cow::Borrowed(input));
    }
    transcode(input, input, encoding)
}

fn transcode<'a>(
    input: &[u8],
    body: &[u8],
    encoding: &'static Encoding,
) -> Result<Cow<'a, [u8]>, Error> {
    trace!(encoding = encoding.name(), bytes = body.len(), "transcoding input");
    match encoding.decode_without_bom_handling_and_without_replacement(body) {
        Some(text) => Ok(Cow::Owned(text.into_owned().into_bytes())),
        None => Err(Error::Encoding(ParseError::at(
            input,
            0,
            format!("malformed byte sequence for encoding {}", encoding.name()),
        ))),
    }
}

/// Extracts the `encoding` label from a leading XML declaration.
///
/// The declaration must be ASCII-compatible, so the raw bytes are scanned
/// directly without decoding.
fn declared_label(bytes: &[u8]) -> Option<&[u8]> {
    let scan = &bytes[..bytes.len().min(DECLARATION_SCAN_LIMIT)];
    if !scan.starts_with(b"<?xml") {
        return None;
    }
    let decl_end = scan.windows(2).position(|w| w == b"?>")?;
    let decl = &scan[..decl_end];

    let needle = b"encoding";
    let pos = decl.windows(needle.len()).position(|w| w == needle)?;
    let rest = skip_ascii_whitespace(&decl[pos + needle.len()..]);
    let rest = skip_ascii_whitespace(rest.strip_prefix(b"=")?);

    let (&quote, rest) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let end = rest.iter().position(|&b| b == quote)?;
    let label = &rest[..end];
    label.is_ascii().then_some(label)
}

fn skip_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count();
    &bytes[skip..]
}
