//! # xmldict
//!
//! Converts XML documents into ordered, string-keyed document maps and
//! renders such maps back to XML.
//!
//! Elements become nested maps keyed by tag name, repeated siblings become
//! lists, attributes are merged in under a sigil (or collected, kept bare, or
//! dropped), and text, comments and tag names are stored under reserved keys.
//! Text-only elements collapse to their bare text and empty elements are
//! stripped unless told otherwise.
//!
//! ## Quick Start
//!
//! ```
//! use xmldict::{parse_str, to_xml};
//!
//! let map = parse_str(r#"<root><book id="bk101">Title</book></root>"#).unwrap();
//! assert_eq!(map["book"]["_id"], "bk101");
//! assert_eq!(map["book"]["__text"], "Title");
//! assert_eq!(map.value_for_key_path("book._id").unwrap(), "bk101");
//!
//! let xml = to_xml(&map);
//! assert_eq!(xml, r#"<root><book id="bk101">Title</book></root>"#);
//! ```

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($tt:tt)*) => { tracing::trace!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

pub(crate) use trace;

mod encoding;
pub mod error;
pub mod map;
pub mod parser;
pub mod sax;
pub mod serial;

// Re-export primary types at the crate root for convenience.
pub use error::{Error, ParseError, SourceLocation};
pub use map::{DocumentMap, KeySpace, Value};
pub use parser::{
    parse_bytes, parse_bytes_with_options, parse_file, parse_file_with_options, parse_str,
    parse_str_with_options, AttributesMode, NodeNameMode, ParseOptions,
};
pub use serial::{render_node, to_xml, to_xml_with_options, SerializeOptions};
