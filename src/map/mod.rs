//! The generic document map.
//!
//! Parsing produces a [`DocumentMap`]: an insertion-ordered mapping from
//! string keys to [`Value`]s. A value is text, a nested map, a sequence of
//! values, or (for the synthetic identity only) an integer.
//!
//! Keys are split into two spaces by a [`KeySpace`]: reserved keys carrying
//! structural metadata (attributes, comments, text, node name, identity) and
//! ordinary keys naming child elements or sigil-prefixed attributes.
//!
//! ```
//! use xmldict::parse_str;
//!
//! let map = parse_str(r#"<root><item id="1">one</item><item id="2">two</item></root>"#).unwrap();
//! assert_eq!(map["item"][1]["_id"], "2");
//! assert_eq!(map.node_name(), Some("root"));
//! ```

mod keys;
mod path;

pub use keys::KeySpace;

use std::borrow::Cow;
use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;

/// A value stored under a key of a [`DocumentMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text content, an attribute value, or a collapsed text-only element.
    Text(String),
    /// A synthetic node identity. Rendered with `Display` when serialized.
    Integer(i64),
    /// A nested element.
    Map(DocumentMap),
    /// Repeated siblings, repeated text runs, or accumulated comments.
    List(Vec<Value>),
}

impl Value {
    /// Returns the text if this is a [`Value::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested map if this is a [`Value::Map`].
    #[must_use]
    pub fn as_map(&self) -> Option<&DocumentMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the elements if this is a [`Value::List`].
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`Value::Integer`].
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Returns the element at `index` if this value is a list.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_list().and_then(|items| items.get(index))
    }

    /// Renders a scalar as a string. Maps and lists yield `None`.
    pub(crate) fn scalar_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(s) => Some(Cow::Borrowed(s)),
            Self::Integer(n) => Some(Cow::Owned(n.to_string())),
            Self::Map(_) | Self::List(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Map(m) => write!(f, "{m:?}"),
            Self::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<DocumentMap> for Value {
    fn from(m: DocumentMap) -> Self {
        Self::Map(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// Indexes into a map value.
///
/// # Panics
///
/// Panics if the value is not a map or the key is absent.
impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self {
            Self::Map(m) => &m[key],
            other => panic!("cannot index {other:?} with key {key:?}"),
        }
    }
}

/// Indexes into a list value.
///
/// # Panics
///
/// Panics if the value is not a list or the index is out of bounds.
impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self {
            Self::List(items) => &items[index],
            other => panic!("cannot index {other:?} with position {index}"),
        }
    }
}

/// An insertion-ordered, string-keyed document map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMap {
    entries: IndexMap<String, Value>,
}

impl DocumentMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Looks up a key for mutation.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns `true` if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a value, returning the previous value for the key.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes a key while preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Stores `value` under `key`, promoting an existing value to a list.
    ///
    /// An absent key receives `value` as is (or wrapped in a one-element
    /// list when `always_list` is set), a bare value becomes a two-element
    /// list, and an existing list is appended to.
    pub fn append(&mut self, key: &str, value: Value, always_list: bool) {
        match self.entries.get_mut(key) {
            Some(Value::List(items)) => items.push(value),
            Some(existing) => {
                let previous = std::mem::replace(existing, Value::List(Vec::with_capacity(2)));
                if let Value::List(items) = existing {
                    items.push(previous);
                    items.push(value);
                }
            }
            None if always_list => {
                self.entries.insert(key.to_string(), Value::List(vec![value]));
            }
            None => {
                self.entries.insert(key.to_string(), value);
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DocumentMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DocumentMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// # Panics
///
/// Panics if the key is absent.
impl Index<&str> for DocumentMap {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.entries.get(key) {
            Some(v) => v,
            None => panic!("key {key:?} not present in document map"),
        }
    }
}
