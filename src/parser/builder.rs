//! Incremental document-map construction from SAX events.
//!
//! The builder keeps a stack of open elements, innermost last. Each frame
//! owns its in-progress node together with the tag name it will be stored
//! under, so a closing node is spliced into its parent directly instead of
//! being searched for. Collapse and strip decisions are made at that point,
//! when the node's full content is known.

use std::borrow::Cow;

use crate::error::{Error, ParseError, SourceLocation};
use crate::map::{DocumentMap, Value};
use crate::sax::SaxHandler;
use crate::trace;

use super::{AttributesMode, NodeNameMode, ParseOptions};

/// An open element.
#[derive(Debug)]
struct Frame {
    /// Key under which the node is stored in its parent. Empty for the
    /// synthetic root wrapper, which has no parent.
    name: String,
    node: DocumentMap,
}

impl Frame {
    fn is_wrapper(&self) -> bool {
        self.name.is_empty()
    }
}

/// A [`SaxHandler`] that assembles a [`DocumentMap`].
///
/// A builder holds the state of exactly one parse. The parse entry points
/// create one per call; drive it directly to build a map from another event
/// source.
///
/// ```
/// use xmldict::parser::{ParseOptions, TreeBuilder};
/// use xmldict::sax::SaxHandler;
///
/// let options = ParseOptions::default();
/// let mut builder = TreeBuilder::new(&options);
/// builder.start_element("root", &[]);
/// builder.start_element("a", &[("id".to_string(), "1".to_string())]);
/// builder.characters("text");
/// builder.end_element("a");
/// builder.end_element("root");
///
/// let map = builder.finish().unwrap();
/// assert_eq!(map["a"]["_id"], "1");
/// assert_eq!(map["a"]["__text"], "text");
/// ```
#[derive(Debug)]
pub struct TreeBuilder<'o> {
    options: &'o ParseOptions,
    stack: Vec<Frame>,
    /// Character data seen since the last element boundary.
    text: Option<String>,
    /// The closed root, once its end tag has been seen (unwrapped mode).
    root: Option<DocumentMap>,
    started: bool,
    next_id: i64,
}

impl<'o> TreeBuilder<'o> {
    /// Creates a builder with pristine parse state.
    #[must_use]
    pub fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            text: None,
            root: None,
            started: false,
            next_id: 0,
        }
    }

    /// Consumes the builder and returns the finished document map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if no root element was seen or the root
    /// element was never closed.
    pub fn finish(mut self) -> Result<DocumentMap, Error> {
        self.flush_text();
        if let Some(root) = self.root.take() {
            return Ok(root);
        }
        if self.options.wrap_root_node && self.stack.len() == 1 {
            if let Some(wrapper) = self.stack.pop() {
                return Ok(wrapper.node);
            }
        }
        let message = if self.started {
            "root element was not closed"
        } else {
            "document has no root element"
        };
        Err(Error::Parse(ParseError {
            message: message.to_string(),
            location: SourceLocation::default(),
        }))
    }

    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Commits pending text into the node on top of the stack.
    fn flush_text(&mut self) {
        let Some(mut text) = self.text.take() else {
            return;
        };
        if self.options.trim_whitespace {
            let trimmed = text.trim();
            if trimmed.len() != text.len() {
                text = trimmed.to_string();
            }
        }
        if text.is_empty() {
            return;
        }
        if let Some(top) = self.stack.last_mut() {
            top.node
                .append(&self.options.keys.text, Value::Text(text), false);
        }
    }

    fn new_node(&self, name: &str, attributes: &[(String, String)]) -> DocumentMap {
        let keys = &self.options.keys;
        let mut node = DocumentMap::new();

        let record_name = match self.options.node_name_mode {
            NodeNameMode::RootOnly => !self.started,
            NodeNameMode::Always => true,
            NodeNameMode::Never => false,
        };
        if record_name {
            node.insert(keys.node_name.to_string(), name);
        }

        if attributes.is_empty() {
            return node;
        }
        match self.options.attributes_mode {
            AttributesMode::Prefixed => {
                for (key, value) in attributes {
                    node.insert(keys.prefixed(key), value.as_str());
                }
            }
            AttributesMode::Dictionary => {
                let attrs: DocumentMap = attributes
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                node.insert(keys.attributes.to_string(), attrs);
            }
            AttributesMode::Unprefixed => {
                for (key, value) in attributes {
                    node.insert(key.as_str(), value.as_str());
                }
            }
            AttributesMode::Discard => {}
        }
        node
    }

    /// Decides what a closing node contributes to its parent.
    ///
    /// Returns `None` when the node is stripped.
    fn close_node(&self, mut node: DocumentMap) -> Option<Value> {
        let options = self.options;
        let keys = &options.keys;
        if !keys.is_raw(&node) {
            return Some(Value::Map(node));
        }

        let text = keys.inner_text(&node).map(Cow::into_owned);
        match text {
            Some(text) if options.collapse_text_nodes => Some(Value::Text(text)),
            Some(_) => Some(Value::Map(node)),
            None if options.strip_empty_nodes => None,
            None => {
                if !options.collapse_text_nodes {
                    node.insert(keys.text.to_string(), "");
                }
                Some(Value::Map(node))
            }
        }
    }
}

impl SaxHandler for TreeBuilder<'_> {
    fn start_element(&mut self, name: &str, attributes: &[(String, String)]) {
        self.flush_text();
        let node = self.new_node(name, attributes);

        if !self.started {
            self.started = true;
            if self.options.wrap_root_node {
                let mut wrapper = DocumentMap::new();
                let id = self.next_id();
                wrapper.insert(self.options.keys.identifier.to_string(), id);
                self.stack.push(Frame {
                    name: String::new(),
                    node: wrapper,
                });
            }
        }

        self.stack.push(Frame {
            name: name.to_string(),
            node,
        });
    }

    fn end_element(&mut self, _name: &str) {
        self.flush_text();
        let Some(Frame { name, mut node }) = self.stack.pop() else {
            return;
        };

        if self.stack.is_empty() {
            let options = self.options;
            if !options.collapse_text_nodes
                && !options.strip_empty_nodes
                && options.keys.is_raw(&node)
                && options.keys.inner_text(&node).is_none()
            {
                node.insert(options.keys.text.to_string(), "");
            }
            trace!(name = %name, "root closed");
            self.root = Some(node);
            return;
        }

        let closed = self.close_node(node);
        trace!(
            name = %name,
            collapsed = matches!(closed, Some(crate::map::Value::Text(_))),
            stripped = closed.is_none(),
            "node closed"
        );
        if let (Some(value), Some(parent)) = (closed, self.stack.last_mut()) {
            // The wrapper holds the root as a bare value.
            let always_list = self.options.always_use_arrays && !parent.is_wrapper();
            parent.node.append(&name, value, always_list);
        }
    }

    fn characters(&mut self, content: &str) {
        self.text.get_or_insert_with(String::new).push_str(content);
    }

    fn cdata(&mut self, content: &str) {
        self.characters(content);
    }

    fn comment(&mut self, content: &str) {
        if !self.options.preserve_comments {
            return;
        }
        // Comments outside the root element are dropped on both sides of it.
        if let Some(top) = self.stack.last_mut().filter(|top| !top.is_wrapper()) {
            top.node.append(
                &self.options.keys.comments,
                Value::Text(content.to_string()),
                true,
            );
        }
    }
}
