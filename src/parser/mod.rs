//! XML to document-map conversion.
//!
//! [`ParseOptions`] holds the conversion toggles; each entry point builds a
//! fresh [`TreeBuilder`] from them, drives it with SAX events, and returns
//! the finished [`DocumentMap`]. The options are never mutated by a parse,
//! so one value can be shared freely between threads.
//!
//! ```
//! use xmldict::parser::{parse_str_with_options, AttributesMode, ParseOptions};
//!
//! let opts = ParseOptions::default()
//!     .attributes_mode(AttributesMode::Dictionary)
//!     .always_use_arrays(true);
//! let map = parse_str_with_options(r#"<r><a id="1">x</a></r>"#, &opts).unwrap();
//! assert_eq!(map["a"][0]["__attributes"]["id"], "1");
//! ```

mod builder;

pub use builder::TreeBuilder;

use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::map::{DocumentMap, KeySpace};
use crate::sax::{parse_sax_with_depth, DEFAULT_MAX_DEPTH};

/// Where element attributes are placed in the document map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributesMode {
    /// Merge into the node under the attribute sigil, e.g. `_id`.
    #[default]
    Prefixed,
    /// Collect into a nested map under the reserved attributes key.
    Dictionary,
    /// Merge into the node under the bare attribute name. A child element
    /// with the same name is promoted to a list alongside the attribute.
    Unprefixed,
    /// Drop attributes.
    Discard,
}

/// Which nodes record their tag name under the reserved node-name key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeNameMode {
    /// Only the root element.
    #[default]
    RootOnly,
    /// Every element.
    Always,
    /// No element.
    Never,
}

/// Options controlling how XML is mapped onto a [`DocumentMap`].
///
/// Use the builder pattern to configure options:
///
/// ```
/// use xmldict::parser::{NodeNameMode, ParseOptions};
///
/// let opts = ParseOptions::default()
///     .collapse_text_nodes(false)
///     .preserve_comments(true)
///     .node_name_mode(NodeNameMode::Always);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Replace text-only nodes by their bare text (default: true).
    pub collapse_text_nodes: bool,
    /// Omit nodes with no attributes, children, comments or text (default: true).
    pub strip_empty_nodes: bool,
    /// Trim leading and trailing whitespace from text (default: true).
    pub trim_whitespace: bool,
    /// Store every child element in a list, even the first (default: false).
    pub always_use_arrays: bool,
    /// Keep comments under the reserved comments key (default: false).
    pub preserve_comments: bool,
    /// Wrap the root under a map keyed by its tag name (default: false).
    pub wrap_root_node: bool,
    /// Attribute placement (default: [`AttributesMode::Prefixed`]).
    pub attributes_mode: AttributesMode,
    /// Tag name recording (default: [`NodeNameMode::RootOnly`]).
    pub node_name_mode: NodeNameMode,
    /// Reserved key vocabulary.
    pub keys: KeySpace,
    /// Maximum element nesting depth (default: 256).
    pub max_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            collapse_text_nodes: true,
            strip_empty_nodes: true,
            trim_whitespace: true,
            always_use_arrays: false,
            preserve_comments: false,
            wrap_root_node: false,
            attributes_mode: AttributesMode::default(),
            node_name_mode: NodeNameMode::default(),
            keys: KeySpace::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Enables or disables collapsing of text-only nodes.
    #[must_use]
    pub fn collapse_text_nodes(mut self, yes: bool) -> Self {
        self.collapse_text_nodes = yes;
        self
    }

    /// Enables or disables stripping of empty nodes.
    #[must_use]
    pub fn strip_empty_nodes(mut self, yes: bool) -> Self {
        self.strip_empty_nodes = yes;
        self
    }

    /// Enables or disables whitespace trimming of text.
    #[must_use]
    pub fn trim_whitespace(mut self, yes: bool) -> Self {
        self.trim_whitespace = yes;
        self
    }

    /// Enables or disables storing every child element in a list.
    #[must_use]
    pub fn always_use_arrays(mut self, yes: bool) -> Self {
        self.always_use_arrays = yes;
        self
    }

    /// Enables or disables comment preservation.
    #[must_use]
    pub fn preserve_comments(mut self, yes: bool) -> Self {
        self.preserve_comments = yes;
        self
    }

    /// Enables or disables wrapping the root under its tag name.
    #[must_use]
    pub fn wrap_root_node(mut self, yes: bool) -> Self {
        self.wrap_root_node = yes;
        self
    }

    /// Sets the attribute placement.
    #[must_use]
    pub fn attributes_mode(mut self, mode: AttributesMode) -> Self {
        self.attributes_mode = mode;
        self
    }

    /// Sets which nodes record their tag name.
    #[must_use]
    pub fn node_name_mode(mut self, mode: NodeNameMode) -> Self {
        self.node_name_mode = mode;
        self
    }

    /// Sets the reserved key vocabulary.
    #[must_use]
    pub fn keys(mut self, keys: KeySpace) -> Self {
        self.keys = keys;
        self
    }

    /// Sets the maximum element nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max: u32) -> Self {
        self.max_depth = max;
        self
    }
}

/// Parses an XML string with default options.
///
/// # Errors
///
/// Returns an error if the input is not well-formed XML.
///
/// # Examples
///
/// ```
/// let map = xmldict::parse_str("<root><a>x</a></root>").unwrap();
/// assert_eq!(map["a"], "x");
/// ```
pub fn parse_str(input: &str) -> Result<DocumentMap, Error> {
    parse_str_with_options(input, &ParseOptions::default())
}

/// Parses an XML string with the given options.
///
/// # Errors
///
/// Returns an error if the input is not well-formed XML.
pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<DocumentMap, Error> {
    parse_bytes_with_options(input.as_bytes(), options)
}

/// Parses UTF-8 encoded XML bytes with default options.
///
/// # Errors
///
/// Returns an error if the input is not well-formed XML or not valid UTF-8.
pub fn parse_bytes(input: &[u8]) -> Result<DocumentMap, Error> {
    parse_bytes_with_options(input, &ParseOptions::default())
}

/// Parses UTF-8 encoded XML bytes with the given options.
///
/// # Errors
///
/// Returns an error if the input is not well-formed XML or not valid UTF-8.
pub fn parse_bytes_with_options(input: &[u8], options: &ParseOptions) -> Result<DocumentMap, Error> {
    let mut builder = TreeBuilder::new(options);
    parse_sax_with_depth(input, options.max_depth, &mut builder)?;
    builder.finish()
}

/// Reads and parses an XML file with default options.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, otherwise any parse error.
pub fn parse_file(path: impl AsRef<Path>) -> Result<DocumentMap, Error> {
    parse_file_with_options(path, &ParseOptions::default())
}

/// Reads and parses an XML file with the given options.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, otherwise any parse error.
pub fn parse_file_with_options(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<DocumentMap, Error> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bytes_with_options(&bytes, options)
}
