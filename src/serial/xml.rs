//! XML serializer.
//!
//! Serializes a [`DocumentMap`] into an XML string. Output is compact: no
//! declaration, no indentation, and sibling segments (comments, children,
//! text) separated by a single newline.

use std::borrow::Cow;

use crate::map::{DocumentMap, KeySpace, Value};
use crate::trace;

/// Options controlling XML serialization output.
///
/// # Examples
///
/// ```
/// use xmldict::{parse_str, to_xml_with_options, SerializeOptions};
///
/// let map = parse_str("<doc><a>x</a></doc>").unwrap();
/// let mut fragment = map.clone();
/// fragment.remove("__name");
///
/// let xml = to_xml_with_options(&fragment, &SerializeOptions::default().root_name("doc"));
/// assert_eq!(xml, "<a>x</a>");
///
/// let opts = SerializeOptions::default().root_name("doc").force_root(true);
/// assert_eq!(to_xml_with_options(&fragment, &opts), "<doc><a>x</a></doc>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Reserved key vocabulary. Must match the one used when parsing.
    pub keys: KeySpace,
    /// Tag used for a top-level map that recorded no node name.
    /// Defaults to `"root"`.
    pub root_name: String,
    /// Always wrap the top-level map in an element, even when it holds a
    /// single child and could be emitted as a bare fragment.
    /// Defaults to `false`.
    pub force_root: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            keys: KeySpace::default(),
            root_name: "root".to_string(),
            force_root: false,
        }
    }
}

impl SerializeOptions {
    /// Sets the reserved key vocabulary.
    #[must_use]
    pub fn keys(mut self, keys: KeySpace) -> Self {
        self.keys = keys;
        self
    }

    /// Sets the tag used for a nameless top-level map.
    #[must_use]
    pub fn root_name(mut self, name: &str) -> Self {
        self.root_name = name.to_string();
        self
    }

    /// Enables or disables the enclosing root element for single-child maps.
    #[must_use]
    pub fn force_root(mut self, yes: bool) -> Self {
        self.force_root = yes;
        self
    }
}

/// Serializes a document map to an XML string.
///
/// A map holding a single child and no recorded node name is emitted as
/// that child alone; anything else is wrapped in an element named by the
/// recorded node name, or `root`.
///
/// # Examples
///
/// ```
/// use xmldict::{to_xml, DocumentMap};
///
/// let map: DocumentMap = [("a", "x")].into_iter().collect();
/// assert_eq!(to_xml(&map), "<a>x</a>");
/// ```
#[must_use]
pub fn to_xml(map: &DocumentMap) -> String {
    to_xml_with_options(map, &SerializeOptions::default())
}

/// Serializes a document map to an XML string with the given options.
#[must_use]
pub fn to_xml_with_options(map: &DocumentMap, options: &SerializeOptions) -> String {
    let keys = &options.keys;
    let node_name = keys.node_name(map);
    // The synthetic identity of a wrapped root is not content.
    let content_keys = map.keys().filter(|k| *k != keys.identifier).count();

    let mut out = String::new();
    if content_keys == 1 && node_name.is_none() && !options.force_root {
        trace!(keys = content_keys, "serializing fragment");
        write_inner_xml(&mut out, map, keys);
    } else {
        let tag = node_name.unwrap_or(&options.root_name);
        trace!(tag = %tag, keys = content_keys, "serializing element");
        write_map(&mut out, map, tag, keys);
    }
    out
}

/// Renders a value as one or more elements named `tag`, using the default
/// key vocabulary.
///
/// A list renders each element under the same tag, newline-separated.
///
/// ```
/// use xmldict::{render_node, Value};
///
/// let items = Value::List(vec!["1".into(), "2".into()]);
/// assert_eq!(render_node(&items, "n"), "<n>1</n>\n<n>2</n>");
/// ```
#[must_use]
pub fn render_node(value: &Value, tag: &str) -> String {
    render_node_with_options(value, tag, &SerializeOptions::default())
}

/// Renders a value as one or more elements named `tag`.
#[must_use]
pub fn render_node_with_options(value: &Value, tag: &str, options: &SerializeOptions) -> String {
    let mut out = String::new();
    write_node(&mut out, value, tag, &options.keys);
    out
}

/// Renders a node's content without its enclosing tag: comments first, then
/// child elements, then text, separated by newlines.
#[must_use]
pub fn inner_xml(map: &DocumentMap, options: &SerializeOptions) -> String {
    let mut out = String::new();
    write_inner_xml(&mut out, map, &options.keys);
    out
}

impl DocumentMap {
    /// Renders this node's content without its enclosing tag.
    ///
    /// ```
    /// use xmldict::parse_str;
    ///
    /// let map = parse_str("<r><a>1</a><b>2</b></r>").unwrap();
    /// assert_eq!(map.inner_xml(), "<a>1</a>\n<b>2</b>");
    /// ```
    #[must_use]
    pub fn inner_xml(&self) -> String {
        inner_xml(self, &SerializeOptions::default())
    }

    /// Serializes this map with default options. See [`to_xml`].
    #[must_use]
    pub fn xml_string(&self) -> String {
        to_xml(self)
    }
}

/// Escapes the five XML special characters.
///
/// Returns the input unchanged when there is nothing to escape.
///
/// ```
/// use xmldict::serial::escape;
///
/// assert_eq!(escape(r#"a < b & "c""#), "a &lt; b &amp; &quot;c&quot;");
/// assert_eq!(escape("plain"), "plain");
/// ```
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    write_escaped(&mut out, text);
    Cow::Owned(out)
}

fn write_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
}

fn write_node(out: &mut String, value: &Value, tag: &str, keys: &KeySpace) {
    match value {
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                write_node(out, item, tag, keys);
            }
        }
        Value::Map(map) => write_map(out, map, tag, keys),
        Value::Text(text) => write_scalar(out, text, tag),
        Value::Integer(n) => write_scalar(out, &n.to_string(), tag),
    }
}

fn write_scalar(out: &mut String, text: &str, tag: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    write_escaped(out, text);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_map(out: &mut String, map: &DocumentMap, tag: &str, keys: &KeySpace) {
    out.push('<');
    out.push_str(tag);
    if let Some(attributes) = keys.attributes(map) {
        for (name, value) in attributes {
            out.push(' ');
            write_escaped(out, name);
            out.push_str("=\"");
            write_escaped(out, value);
            out.push('"');
        }
    }

    let mut inner = String::new();
    write_inner_xml(&mut inner, map, keys);
    if inner.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        out.push_str(&inner);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn write_inner_xml(out: &mut String, map: &DocumentMap, keys: &KeySpace) {
    let start = out.len();
    let separate = |out: &mut String| {
        if out.len() > start {
            out.push('\n');
        }
    };

    for comment in keys.comments(map).unwrap_or_default() {
        separate(out);
        write_comment(out, comment);
    }
    for (name, value) in keys.child_nodes(map).unwrap_or_default() {
        separate(out);
        write_node(out, value, name, keys);
    }
    // The empty-text marker contributes nothing, so a marked node still
    // renders self-closing.
    if let Some(text) = keys.inner_text(map).filter(|t| !t.is_empty()) {
        separate(out);
        write_escaped(out, &text);
    }
}

/// Writes an escaped comment.
///
/// A comment may not contain `--` or end in `-`, so a space is inserted to
/// break such runs. The comment text does not survive a round trip unchanged
/// in that case.
fn write_comment(out: &mut String, comment: &str) {
    out.push_str("<!--");
    let mut previous = None;
    for ch in escape(comment).chars() {
        if ch == '-' && previous == Some('-') {
            out.push(' ');
        }
        out.push(ch);
        previous = Some(ch);
    }
    if previous == Some('-') {
        out.push(' ');
    }
    out.push_str("-->");
}
