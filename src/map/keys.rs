//! Reserved-key vocabulary shared by the tree builder and the serializer.

use std::borrow::Cow;

use indexmap::IndexMap;

use super::{DocumentMap, Value};

/// The reserved keys and attribute sigil used in a document map.
///
/// The builder writes metadata under these keys and the serializer reads it
/// back, so both sides of a round trip must agree on the same `KeySpace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    /// Key holding the nested attribute map in dictionary attribute mode.
    pub attributes: Cow<'static, str>,
    /// Key holding the list of preserved comments.
    pub comments: Cow<'static, str>,
    /// Key holding accumulated text.
    pub text: Cow<'static, str>,
    /// Key holding the element tag name.
    pub node_name: Cow<'static, str>,
    /// Key holding the synthetic identity of a wrapped root.
    pub identifier: Cow<'static, str>,
    /// Prefix marking a flattened attribute.
    pub attribute_prefix: Cow<'static, str>,
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl KeySpace {
    /// The stock vocabulary: `__attributes`, `__comments`, `__text`,
    /// `__name`, `__identifier` and the `_` attribute sigil.
    pub const DEFAULT: Self = Self {
        attributes: Cow::Borrowed("__attributes"),
        comments: Cow::Borrowed("__comments"),
        text: Cow::Borrowed("__text"),
        node_name: Cow::Borrowed("__name"),
        identifier: Cow::Borrowed("__identifier"),
        attribute_prefix: Cow::Borrowed("_"),
    };

    /// Returns `true` if `key` is one of the five reserved keys.
    #[must_use]
    pub fn is_reserved(&self, key: &str) -> bool {
        key == self.attributes
            || key == self.comments
            || key == self.text
            || key == self.node_name
            || key == self.identifier
    }

    /// Returns `true` if `key` names a flattened attribute.
    #[must_use]
    pub fn is_attribute_key(&self, key: &str) -> bool {
        !self.attribute_prefix.is_empty()
            && !self.is_reserved(key)
            && key.starts_with(&*self.attribute_prefix)
    }

    /// Builds the flattened key for an attribute name.
    #[must_use]
    pub fn prefixed(&self, name: &str) -> String {
        let mut key = String::with_capacity(self.attribute_prefix.len() + name.len());
        key.push_str(&self.attribute_prefix);
        key.push_str(name);
        key
    }

    /// Extracts a node's attributes.
    ///
    /// A non-empty reserved attribute map is returned as is (text values
    /// only). Otherwise every string-valued, sigil-prefixed key is collected
    /// with the sigil stripped. An empty result is `None`.
    #[must_use]
    pub fn attributes<'a>(&self, node: &'a DocumentMap) -> Option<IndexMap<&'a str, &'a str>> {
        if let Some(Value::Map(attrs)) = node.get(&self.attributes) {
            let result: IndexMap<&str, &str> = attrs
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k, s)))
                .collect();
            if !result.is_empty() {
                return Some(result);
            }
        }

        let result: IndexMap<&str, &str> = node
            .iter()
            .filter(|(k, _)| self.is_attribute_key(k))
            .filter_map(|(k, v)| {
                let value = v.as_str()?;
                Some((&k[self.attribute_prefix.len()..], value))
            })
            .collect();
        (!result.is_empty()).then_some(result)
    }

    /// Returns every entry that is neither reserved nor a flattened attribute.
    #[must_use]
    pub fn child_nodes<'a>(&self, node: &'a DocumentMap) -> Option<IndexMap<&'a str, &'a Value>> {
        let result: IndexMap<&str, &Value> = node
            .iter()
            .filter(|(k, _)| !self.is_reserved(k) && !self.is_attribute_key(k))
            .collect();
        (!result.is_empty()).then_some(result)
    }

    /// Returns the preserved comments, in document order.
    #[must_use]
    pub fn comments<'a>(&self, node: &'a DocumentMap) -> Option<Vec<&'a str>> {
        match node.get(&self.comments)? {
            Value::List(items) => Some(items.iter().filter_map(Value::as_str).collect()),
            Value::Text(s) => Some(vec![s.as_str()]),
            _ => None,
        }
    }

    /// Returns the recorded tag name.
    #[must_use]
    pub fn node_name<'a>(&self, node: &'a DocumentMap) -> Option<&'a str> {
        node.get(&self.node_name).and_then(Value::as_str)
    }

    /// Returns the node's text; several text runs are joined with `\n`.
    #[must_use]
    pub fn inner_text<'a>(&self, node: &'a DocumentMap) -> Option<Cow<'a, str>> {
        match node.get(&self.text)? {
            Value::List(runs) => {
                let joined = runs
                    .iter()
                    .filter_map(Value::scalar_text)
                    .collect::<Vec<_>>()
                    .join("\n");
                Some(Cow::Owned(joined))
            }
            other => other.scalar_text(),
        }
    }

    /// Returns `true` if the node carries no attributes, children or comments.
    #[must_use]
    pub fn is_raw(&self, node: &DocumentMap) -> bool {
        self.attributes(node).is_none()
            && self.child_nodes(node).is_none()
            && self.comments(node).is_none()
    }
}

impl DocumentMap {
    /// Returns the attributes under the default [`KeySpace`].
    #[must_use]
    pub fn attributes(&self) -> Option<IndexMap<&str, &str>> {
        KeySpace::DEFAULT.attributes(self)
    }

    /// Returns the child nodes under the default [`KeySpace`].
    #[must_use]
    pub fn child_nodes(&self) -> Option<IndexMap<&str, &Value>> {
        KeySpace::DEFAULT.child_nodes(self)
    }

    /// Returns the preserved comments under the default [`KeySpace`].
    #[must_use]
    pub fn comments(&self) -> Option<Vec<&str>> {
        KeySpace::DEFAULT.comments(self)
    }

    /// Returns the recorded tag name under the default [`KeySpace`].
    #[must_use]
    pub fn node_name(&self) -> Option<&str> {
        KeySpace::DEFAULT.node_name(self)
    }

    /// Returns the text content under the default [`KeySpace`].
    #[must_use]
    pub fn inner_text(&self) -> Option<Cow<'_, str>> {
        KeySpace::DEFAULT.inner_text(self)
    }

    /// Looks up a single attribute by its unprefixed name.
    ///
    /// ```
    /// use xmldict::parse_str;
    ///
    /// let map = parse_str(r#"<book id="bk101"><title>T</title></book>"#).unwrap();
    /// assert_eq!(map.attribute_for_key("id"), Some("bk101"));
    /// ```
    #[must_use]
    pub fn attribute_for_key(&self, key: &str) -> Option<&str> {
        self.attributes()?.get(key).copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(entries: &[(&str, Value)]) -> DocumentMap {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_reserved_keys() {
        let keys = KeySpace::default();
        assert!(keys.is_reserved("__text"));
        assert!(keys.is_reserved("__identifier"));
        assert!(!keys.is_reserved("_id"));
        assert!(keys.is_attribute_key("_id"));
        assert!(!keys.is_attribute_key("__name"));
        assert!(!keys.is_attribute_key("title"));
    }

    #[test]
    fn test_attributes_prefixed() {
        let n = node(&[
            ("__name", Value::from("book")),
            ("_id", Value::from("bk101")),
            ("_lang", Value::from("en")),
            ("title", Value::from("T")),
        ]);
        let attrs = n.attributes().unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["id"], "bk101");
        assert_eq!(attrs["lang"], "en");
    }

    #[test]
    fn test_attributes_dictionary() {
        let attrs: DocumentMap = [("id", "7")].into_iter().collect();
        let n = node(&[("__attributes", Value::Map(attrs))]);
        assert_eq!(n.attribute_for_key("id"), Some("7"));
    }

    #[test]
    fn test_empty_attribute_dictionary_is_none() {
        let n = node(&[("__attributes", Value::Map(DocumentMap::new()))]);
        assert!(n.attributes().is_none());
    }

    #[test]
    fn test_prefixed_non_text_is_not_attribute() {
        let n = node(&[("_weird", Value::Map(DocumentMap::new()))]);
        assert!(n.attributes().is_none());
        assert!(n.child_nodes().is_none());
    }

    #[test]
    fn test_child_nodes_excludes_metadata() {
        let n = node(&[
            ("__name", Value::from("root")),
            ("__text", Value::from("hello")),
            ("__identifier", Value::Integer(0)),
            ("_id", Value::from("1")),
            ("child", Value::from("c")),
        ]);
        let children = n.child_nodes().unwrap();
        assert_eq!(children.keys().copied().collect::<Vec<_>>(), vec!["child"]);
    }

    #[test]
    fn test_inner_text_joins_runs() {
        let n = node(&[(
            "__text",
            Value::List(vec![Value::from("a"), Value::from("b")]),
        )]);
        assert_eq!(n.inner_text().unwrap(), "a\nb");
    }

    #[test]
    fn test_comments() {
        let n = node(&[(
            "__comments",
            Value::List(vec![Value::from("one"), Value::from("two")]),
        )]);
        assert_eq!(n.comments().unwrap(), vec!["one", "two"]);
        assert!(node(&[]).comments().is_none());
    }

    #[test]
    fn test_is_raw() {
        let keys = KeySpace::default();
        assert!(keys.is_raw(&node(&[("__text", Value::from("x"))])));
        assert!(keys.is_raw(&node(&[("__name", Value::from("x"))])));
        assert!(!keys.is_raw(&node(&[("_id", Value::from("x"))])));
        assert!(!keys.is_raw(&node(&[("c", Value::from("x"))])));
        assert!(!keys.is_raw(&node(&[(
            "__comments",
            Value::List(vec![Value::from("c")])
        )])));
    }

    #[test]
    fn test_custom_key_space() {
        let keys = KeySpace {
            text: "#text".into(),
            attribute_prefix: "@".into(),
            ..KeySpace::default()
        };
        let n = node(&[("@id", Value::from("1")), ("#text", Value::from("body"))]);
        assert_eq!(keys.attributes(&n).unwrap()["id"], "1");
        assert_eq!(keys.inner_text(&n).unwrap(), "body");
        assert!(keys.child_nodes(&n).is_none());
    }
}
