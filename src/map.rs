//! Ordered multimap types.
//!
//! [`UrlValues`] is the external form of the codec: each key maps to an
//! ordered list of strings, exactly like the query part of a URL or a
//! submitted HTML form. [`ValueMap`] is the untyped counterpart of a record,
//! one dynamic [`Value`] per key.
//!
//! Both wrap [`IndexMap`] so that iteration follows insertion order and output
//! is deterministic.
//!
//! ## Examples
//!
//! ```rust
//! use urlvalues::UrlValues;
//!
//! let mut values = UrlValues::new();
//! values.append("tag", "a");
//! values.append("tag", "b");
//! values.set("page", "2");
//!
//! assert_eq!(values.get("tag"), Some("a"));
//! assert_eq!(values.get_all("tag"), Some(&["a".to_string(), "b".to_string()][..]));
//! assert_eq!(values.encode(), "page=2&tag=a&tag=b");
//! ```

use crate::{EncodeOptions, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use url::form_urlencoded;

/// A string-keyed multimap of string values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlValues(IndexMap<String, Vec<String>>);

impl UrlValues {
    #[must_use]
    pub fn new() -> Self {
        UrlValues(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        UrlValues(IndexMap::with_capacity(capacity))
    }

    /// Returns the first value of `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use urlvalues::UrlValues;
    ///
    /// let mut values = UrlValues::new();
    /// assert_eq!(values.get("k"), None);
    /// values.append("k", "1");
    /// values.append("k", "2");
    /// assert_eq!(values.get("k"), Some("1"));
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|list| list.first()).map(String::as_str)
    }

    /// Returns every value of `key`, in order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Replaces all values of `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), vec![value.into()]);
    }

    /// Adds a value to the end of the list for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces the whole list for `key`.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) -> Option<Vec<String>> {
        self.0.insert(key.into(), values)
    }

    /// Removes `key`, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Vec<String>> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }

    /// Renders `application/x-www-form-urlencoded` text with keys sorted.
    #[must_use]
    pub fn encode(&self) -> String {
        self.encode_with(&EncodeOptions::default())
    }

    pub fn encode_with(&self, options: &EncodeOptions) -> String {
        let mut entries: Vec<(&String, &Vec<String>)> = self.0.iter().collect();
        if options.sort_keys {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, list) in entries {
            for value in list {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Parses `application/x-www-form-urlencoded` text.
    ///
    /// Parsing is lenient: malformed percent escapes are kept literally and
    /// a pair without `=` yields an empty value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use urlvalues::UrlValues;
    ///
    /// let values = UrlValues::parse("a=1&b=x+y&a=2&flag");
    /// assert_eq!(values.get_all("a").map(|v| v.len()), Some(2));
    /// assert_eq!(values.get("b"), Some("x y"));
    /// assert_eq!(values.get("flag"), Some(""));
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Self {
        form_urlencoded::parse(input.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

impl FromIterator<(String, String)> for UrlValues {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut values = UrlValues::new();
        for (key, value) in iter {
            values.append(key, value);
        }
        values
    }
}

impl IntoIterator for UrlValues {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a UrlValues {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<HashMap<String, Vec<String>>> for UrlValues {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        UrlValues(map.into_iter().collect())
    }
}

impl From<UrlValues> for HashMap<String, Vec<String>> {
    fn from(values: UrlValues) -> Self {
        values.0.into_iter().collect()
    }
}

impl Serialize for UrlValues {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UrlValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IndexMap::deserialize(deserializer).map(UrlValues)
    }
}

/// An ordered map of string keys to dynamic values.
///
/// # Examples
///
/// ```rust
/// use urlvalues::{ValueMap, Value};
///
/// let mut map = ValueMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap(IndexMap<String, Value>);

impl ValueMap {
    #[must_use]
    pub fn new() -> Self {
        ValueMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value of the key.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for ValueMap {
    fn from(map: HashMap<String, Value>) -> Self {
        ValueMap(map.into_iter().collect())
    }
}

impl From<ValueMap> for HashMap<String, Value> {
    fn from(map: ValueMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        ValueMap(IndexMap::from_iter(iter))
    }
}
