//! SAX-style event delivery.
//!
//! The tree builder is an event sink: it only sees start-element,
//! end-element, character data, CDATA and comment callbacks. This module
//! defines that callback surface as the [`SaxHandler`] trait and provides
//! [`parse_sax`], which drives a handler from the `quick-xml` tokenizer.
//!
//! # Examples
//!
//! ```
//! use xmldict::sax::{parse_sax, SaxHandler};
//!
//! struct Counter {
//!     elements: usize,
//! }
//!
//! impl SaxHandler for Counter {
//!     fn start_element(&mut self, _name: &str, _attributes: &[(String, String)]) {
//!         self.elements += 1;
//!     }
//! }
//!
//! let mut counter = Counter { elements: 0 };
//! parse_sax(b"<root><a/><b/><c/></root>", &mut counter).unwrap();
//! assert_eq!(counter.elements, 4);
//! ```

use std::borrow::Cow;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::encoding::decode_input;
use crate::error::{Error, ParseError};
use crate::trace;

/// Default maximum element nesting depth.
pub const DEFAULT_MAX_DEPTH: u32 = 256;

/// A SAX event handler.
///
/// All methods have no-op defaults so implementors only override the
/// callbacks they need. Events arrive in document order; an empty element
/// (`<a/>`) produces a start and an end event.
#[allow(unused_variables)]
pub trait SaxHandler {
    /// Called when an element start tag is encountered.
    ///
    /// `attributes` holds `(name, value)` pairs with entity references in the
    /// values already expanded.
    fn start_element(&mut self, name: &str, attributes: &[(String, String)]) {}

    /// Called when an element end tag is encountered (or a self-closing tag ends).
    fn end_element(&mut self, name: &str) {}

    /// Called for character data, with entity references expanded.
    fn characters(&mut self, content: &str) {}

    /// Called for CDATA sections.
    fn cdata(&mut self, content: &str) {}

    /// Called for XML comments.
    fn comment(&mut self, content: &str) {}
}

/// A default no-op SAX handler. Useful as a base or for testing.
pub struct DefaultHandler;

impl SaxHandler for DefaultHandler {}

/// Parses XML bytes, firing SAX events on `handler`.
///
/// Uses [`DEFAULT_MAX_DEPTH`] as the nesting limit.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the input is not well-formed, and
/// [`Error::Encoding`] if names, text or attribute values are not valid
/// UTF-8. Input with a UTF-16 byte order mark or a declared non-UTF-8
/// encoding is transcoded first.
pub fn parse_sax(input: &[u8], handler: &mut dyn SaxHandler) -> Result<(), Error> {
    parse_sax_with_depth(input, DEFAULT_MAX_DEPTH, handler)
}

/// Parses XML bytes with an explicit nesting limit.
///
/// # Errors
///
/// See [`parse_sax`]. Additionally fails when elements nest deeper than
/// `max_depth`.
pub fn parse_sax_with_depth(
    input: &[u8],
    max_depth: u32,
    handler: &mut dyn SaxHandler,
) -> Result<(), Error> {
    let input = decode_input(input)?;
    SaxDriver::new(&input, max_depth, handler).run()
}

/// Adapts `quick-xml`'s pull events to [`SaxHandler`] pushes.
struct SaxDriver<'a, 'h> {
    input: &'a [u8],
    reader: Reader<&'a [u8]>,
    handler: &'h mut dyn SaxHandler,
    /// Names of currently open elements; `quick-xml` checks end-tag names
    /// but not elements left open at end of input.
    open: Vec<String>,
    max_depth: u32,
    seen_root: bool,
}

impl<'a, 'h> SaxDriver<'a, 'h> {
    fn new(input: &'a [u8], max_depth: u32, handler: &'h mut dyn SaxHandler) -> Self {
        let mut reader = Reader::from_reader(input);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = true;
        config.expand_empty_elements = false;

        Self {
            input,
            reader,
            handler,
            open: Vec::new(),
            max_depth,
            seen_root: false,
        }
    }

    fn run(mut self) -> Result<(), Error> {
        loop {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(e) => return Err(self.syntax_error(e.to_string())),
            };
            match event {
                Event::Start(start) => {
                    let name = self.start(&start)?;
                    self.open.push(name);
                }
                Event::Empty(start) => {
                    let name = self.start(&start)?;
                    self.handler.end_element(&name);
                }
                Event::End(end) => {
                    let name = self.decode(end.name().as_ref())?.into_owned();
                    self.open.pop();
                    self.handler.end_element(&name);
                }
                Event::Text(text) => {
                    let raw = self.decode(&text)?;
                    let content = unescape(&raw).map_err(|e| self.syntax_error(e.to_string()))?;
                    if !self.open.is_empty() {
                        self.handler.characters(&content);
                    } else if !content.trim().is_empty() {
                        return Err(self.syntax_error("text outside of the root element"));
                    }
                }
                Event::CData(cdata) => {
                    if self.open.is_empty() {
                        return Err(self.syntax_error("CDATA outside of the root element"));
                    }
                    let content = self.decode(&cdata)?;
                    self.handler.cdata(&content);
                }
                Event::Comment(comment) => {
                    let content = self.decode(&comment)?;
                    self.handler.comment(&content);
                }
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(name) = self.open.last() {
            let message = format!("unexpected end of input: element <{name}> is not closed");
            return Err(self.syntax_error(message));
        }
        if !self.seen_root {
            return Err(self.syntax_error("document has no root element"));
        }
        Ok(())
    }

    /// Decodes a start tag, fires `start_element`, and returns the tag name.
    fn start(&mut self, start: &BytesStart<'_>) -> Result<String, Error> {
        if self.open.is_empty() {
            if self.seen_root {
                return Err(self.syntax_error("multiple root elements"));
            }
            self.seen_root = true;
        }
        if self.open.len() >= self.max_depth as usize {
            let message = format!("maximum nesting depth of {} exceeded", self.max_depth);
            return Err(self.syntax_error(message));
        }

        let name = self.decode(start.name().as_ref())?.into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| self.syntax_error(e.to_string()))?;
            let key = self.decode(attr.key.as_ref())?.into_owned();
            let raw = self.decode(&attr.value)?;
            let value = unescape(&raw)
                .map_err(|e| self.syntax_error(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }

        trace!(name = %name, attributes = attributes.len(), "start_element");
        self.handler.start_element(&name, &attributes);
        Ok(name)
    }

    fn decode<'b>(&self, bytes: &'b [u8]) -> Result<Cow<'b, str>, Error> {
        std::str::from_utf8(bytes).map(Cow::Borrowed).map_err(|e| {
            let offset = self.position().saturating_sub(bytes.len()) + e.valid_up_to();
            Error::Encoding(ParseError::at(self.input, offset, e.to_string()))
        })
    }

    fn position(&self) -> usize {
        usize::try_from(self.reader.buffer_position()).unwrap_or(usize::MAX)
    }

    fn syntax_error(&self, message: impl Into<String>) -> Error {
        let offset = usize::try_from(self.reader.error_position())
            .ok()
            .filter(|&p| p > 0)
            .unwrap_or_else(|| self.position());
        Error::Parse(ParseError::at(self.input, offset, message))
    }
}
