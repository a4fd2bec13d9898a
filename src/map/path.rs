//! Dot-separated key-path navigation over a document map.
//!
//! Each path segment selects a key of a map. A segment made of ASCII digits
//! selects an element of a list; applied to a single non-list value, whether
//! a scalar or a map without such a key, index `0` selects the value itself
//! so paths work whether or not siblings were promoted to a list.

use std::borrow::Cow;

use super::{DocumentMap, KeySpace, Value};

#[derive(Clone, Copy)]
enum Cursor<'a> {
    Map(&'a DocumentMap),
    Value(&'a Value),
}

impl DocumentMap {
    /// Resolves a dot-separated key path.
    ///
    /// ```
    /// use xmldict::parse_str;
    ///
    /// let map = parse_str(r#"<r><book id="a"/><book id="b"/></r>"#).unwrap();
    /// assert_eq!(map.value_for_key_path("book.1._id").unwrap(), "b");
    /// assert!(map.value_for_key_path("book.2").is_none());
    /// ```
    #[must_use]
    pub fn value_for_key_path(&self, path: &str) -> Option<&Value> {
        let mut cursor = Cursor::Map(self);
        for segment in path.split('.') {
            let next = match cursor {
                Cursor::Map(map) => map.get(segment)?,
                Cursor::Value(value @ Value::Map(map)) => match map.get(segment) {
                    Some(next) => next,
                    None if parse_index(segment) == Some(0) => value,
                    None => return None,
                },
                Cursor::Value(Value::List(items)) => items.get(parse_index(segment)?)?,
                Cursor::Value(scalar) => {
                    if parse_index(segment)? != 0 {
                        return None;
                    }
                    scalar
                }
            };
            cursor = Cursor::Value(next);
        }
        match cursor {
            Cursor::Value(v) => Some(v),
            Cursor::Map(_) => None,
        }
    }

    /// Resolves a key path to a string.
    ///
    /// A list yields its first element; a map yields its inner text.
    #[must_use]
    pub fn string_value_for_key_path(&self, path: &str) -> Option<Cow<'_, str>> {
        let value = first_of(self.value_for_key_path(path)?)?;
        match value {
            Value::Map(map) => map.inner_text(),
            other => other.scalar_text(),
        }
    }

    /// Resolves a key path to a map.
    ///
    /// A list yields its first element; a string `s` yields `{ __text: s }`.
    #[must_use]
    pub fn dictionary_value_for_key_path(&self, path: &str) -> Option<Cow<'_, DocumentMap>> {
        match first_of(self.value_for_key_path(path)?)? {
            Value::Map(map) => Some(Cow::Borrowed(map)),
            Value::Text(s) => {
                let mut wrapped = DocumentMap::new();
                wrapped.insert(KeySpace::DEFAULT.text.to_string(), s.clone());
                Some(Cow::Owned(wrapped))
            }
            Value::Integer(_) | Value::List(_) => None,
        }
    }

    /// Resolves a key path to a list; a single value is wrapped in one.
    #[must_use]
    pub fn array_value_for_key_path(&self, path: &str) -> Option<Cow<'_, [Value]>> {
        match self.value_for_key_path(path)? {
            Value::List(items) => Some(Cow::Borrowed(items.as_slice())),
            other => Some(Cow::Owned(vec![other.clone()])),
        }
    }
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn first_of(value: &Value) -> Option<&Value> {
    match value {
        Value::List(items) => items.first(),
        other => Some(other),
    }
}
