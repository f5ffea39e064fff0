use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::access::ParameterAccess;
use super::config::ExpansionSettings;
use super::expand::{ExpansionReport, NestedKeyExpander};
use super::request::Request;
use super::source::ParameterSource;
use super::value::{ParamValue, ValueRef, collapse};
use crate::errors::OverlayError;

/// Request parameters with dotted names also exposed as nested maps.
///
/// Built once from a request. Every raw parameter is kept under its full
/// literal name, and names like `book.author.name` additionally appear as
/// `book -> author -> name`. After construction it is an ordinary mutable map.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use nested_params::{ParameterAccess, ParameterMap, Request};
///
/// let request = Arc::new(Request::from_uri("/books/save?book.title=Groovy&id=7"));
/// let params = ParameterMap::from_request(request);
///
/// assert_eq!(params.get("book.title").unwrap().as_str(), Some("Groovy"));
/// let book = params.get("book").unwrap().as_map().unwrap();
/// assert_eq!(book.get("title").unwrap().as_str(), Some("Groovy"));
/// assert_eq!(params.size(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParameterMap {
    pub(crate) entries: IndexMap<String, ParamValue>,
    pub(crate) request: Option<Arc<Request>>,
}

impl ParameterMap {
    /// An empty map with no originating request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the map from a request's parameters, keeping a reference to it.
    pub fn from_request(request: Arc<Request>) -> Self {
        Self::builder().request(Arc::clone(&request)).build(&*request)
    }

    /// Builds the map from any parameter source, without a request reference.
    pub fn from_source<S>(source: &S) -> Self
    where
        S: ParameterSource + ?Sized,
    {
        Self::builder().build(source)
    }

    /// Wraps prepared entries as-is. No expansion is performed.
    pub fn with_values(values: IndexMap<String, ParamValue>, request: Option<Arc<Request>>) -> Self {
        Self {
            entries: values,
            request,
        }
    }

    pub fn builder() -> ParameterMapBuilder {
        ParameterMapBuilder::new()
    }

    /// The request this map was built from, if any.
    pub fn request(&self) -> Option<&Arc<Request>> {
        self.request.as_ref()
    }

    /// The entry exactly as stored, without read-time collapsing.
    pub fn get_raw(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ParamValue> {
        self.entries.get_mut(key)
    }

    /// Walks nested maps along `path` and reads the last segment with `get`.
    pub fn get_path(&self, path: &[&str]) -> Option<ValueRef<'_>> {
        let (last, parents) = path.split_last()?;
        let mut level = self;
        for segment in parents {
            level = level.entries.get(*segment)?.as_map()?;
        }
        level.get(last)
    }

    /// Applies a textual `key=value` overlay, replacing any existing entry.
    pub fn apply_overlay(&mut self, overlay: &str) -> Result<Option<ParamValue>, OverlayError> {
        let (key, value) = parse_overlay(overlay)?;
        Ok(self.put(key, value))
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ParamValue> {
        self.entries.iter()
    }
}

impl ParameterAccess for ParameterMap {
    fn size(&self) -> usize {
        self.entries.len()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn contains_value(&self, value: &ParamValue) -> bool {
        let wanted = value.collapsed();
        self.entries.values().any(|stored| stored.collapsed() == wanted)
    }

    fn get(&self, key: &str) -> Option<ValueRef<'_>> {
        self.entries.get(key).map(ParamValue::collapsed)
    }

    fn put(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.entries.insert(key.into(), value.into())
    }

    fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.shift_remove(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn values(&self) -> impl Iterator<Item = &ParamValue> {
        self.entries.values()
    }

    fn entries(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Nested maps are torn down with an explicit work list, so dropping a map
/// never recurses once per nesting level.
impl Drop for ParameterMap {
    fn drop(&mut self) {
        let mut pending = vec![std::mem::take(&mut self.entries)];
        while let Some(mut entries) = pending.pop() {
            for (_, value) in entries.drain(..) {
                if let ParamValue::Nested(mut child) = value {
                    pending.push(std::mem::take(&mut child.entries));
                }
            }
        }
    }
}

/// Entries are compared regardless of order; the request reference is ignored.
impl PartialEq for ParameterMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for ParameterMap {}

impl Serialize for ParameterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ParameterMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = IndexMap::<String, ParamValue>::deserialize(deserializer)?;
        Ok(Self::with_values(entries, None))
    }
}

impl<'a> IntoIterator for &'a ParameterMap {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = indexmap::map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> Extend<(K, V)> for ParameterMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

/// Splits `key=value` at the first `=`.
pub fn parse_overlay(overlay: &str) -> Result<(String, String), OverlayError> {
    let (key, value) = overlay
        .split_once('=')
        .ok_or_else(|| OverlayError::MissingEquals(overlay.to_string()))?;
    if key.is_empty() {
        return Err(OverlayError::EmptyKey(overlay.to_string()));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Builder for a [`ParameterMap`] with non-default expansion options.
///
/// # Example
///
/// ```
/// use nested_params::{ParameterAccess, ParameterMap, RawParameters};
///
/// let raw = RawParameters::from_query("book_title=Groovy");
/// let (params, report) = ParameterMap::builder()
///     .separator('_')
///     .build_with_report(&raw);
///
/// assert!(report.is_clean());
/// assert_eq!(params.get_path(&["book", "title"]).unwrap().as_str(), Some("Groovy"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParameterMapBuilder {
    expander: NestedKeyExpander,
    request: Option<Arc<Request>>,
}

impl ParameterMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn separator(mut self, separator: char) -> Self {
        self.expander = self.expander.with_separator(separator);
        self
    }

    pub fn keep_partial_keys(mut self, keep: bool) -> Self {
        self.expander = self.expander.keep_partial_keys(keep);
        self
    }

    /// Applies the `[expansion]` section of the loaded settings.
    pub fn settings(self, settings: &ExpansionSettings) -> Self {
        self.separator(settings.separator())
            .keep_partial_keys(settings.keep_partial_keys)
    }

    /// Request the built map (and all its nested maps) will refer to.
    pub fn request(mut self, request: Arc<Request>) -> Self {
        self.request = Some(request);
        self
    }

    pub fn build<S>(self, source: &S) -> ParameterMap
    where
        S: ParameterSource + ?Sized,
    {
        self.build_with_report(source).0
    }

    /// Builds the map and returns what the expansion ran into.
    pub fn build_with_report<S>(self, source: &S) -> (ParameterMap, ExpansionReport)
    where
        S: ParameterSource + ?Sized,
    {
        let mut map = ParameterMap::with_values(IndexMap::new(), self.request);
        for (key, values) in source.parameters() {
            map.entries.insert(key.to_string(), collapse(values).into());
        }
        let report = self.expander.expand(source, &mut map);
        (map, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::source::RawParameters;

    fn params(query: &str) -> ParameterMap {
        ParameterMap::from_request(Arc::new(Request::from_uri(format!("/test?{}", query))))
    }

    #[test]
    fn test_literal_entries_keep_full_names() {
        let map = params("book.title=Groovy&id=7");
        assert_eq!(map.get("book.title"), Some(ValueRef::Scalar("Groovy")));
        assert_eq!(map.get("id"), Some(ValueRef::Scalar("7")));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["book.title", "id", "book"]);
    }

    #[test]
    fn test_nested_children_share_the_request() {
        let map = params("a.b.c=x");
        let request = map.request().unwrap();
        let a = map.get("a").unwrap().as_map().unwrap();
        let b = a.get("b").unwrap().as_map().unwrap();
        assert!(Arc::ptr_eq(request, a.request().unwrap()));
        assert!(Arc::ptr_eq(request, b.request().unwrap()));
    }

    #[test]
    fn test_from_source_has_no_request() {
        let map = ParameterMap::from_source(&RawParameters::from_query("a=1"));
        assert!(map.request().is_none());
        assert_eq!(map.size(), 1);
    }

    #[test]
    fn test_with_values_does_not_expand() {
        let mut seed = IndexMap::new();
        seed.insert("a.b".to_string(), ParamValue::from("x"));
        let map = ParameterMap::with_values(seed, None);
        assert_eq!(map.size(), 1);
        assert!(!map.contains_key("a"));
    }

    #[test]
    fn test_get_collapses_one_element_sequences_put_later() {
        let mut map = ParameterMap::new();
        map.put("list", vec!["only"]);
        assert_eq!(map.get("list"), Some(ValueRef::Scalar("only")));
        assert_eq!(map.get_raw("list"), Some(&ParamValue::from(vec!["only"])));
    }

    #[test]
    fn test_put_does_not_expand() {
        let mut map = params("x=1");
        assert_eq!(map.put("a.b", "v"), None);
        assert!(!map.contains_key("a"));
        assert_eq!(map.put("a.b", "w"), Some(ParamValue::from("v")));
    }

    #[test]
    fn test_remove_and_clear_stay_at_one_level() {
        let mut map = params("book.title=T");
        let book = map.get("book").unwrap().to_owned_value();
        assert_eq!(map.remove("book.title"), Some(ParamValue::from("T")));
        assert_eq!(map.get("book").unwrap().to_owned_value(), book);
        map.clear();
        assert!(map.is_empty());
        assert!(map.request().is_some());
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut map = params("a=1&b=2&c=3");
        map.remove("a");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_contains_value_uses_collapsed_view() {
        let map = params("k=v&m=1&m=2");
        assert!(map.contains_value(&ParamValue::from("v")));
        assert!(map.contains_value(&ParamValue::from(vec!["v"])));
        assert!(map.contains_value(&ParamValue::from(vec!["1", "2"])));
        assert!(!map.contains_value(&ParamValue::from("1")));
    }

    #[test]
    fn test_get_path_stops_at_non_maps() {
        let map = params("a.b=x");
        assert_eq!(map.get_path(&["a", "b"]).unwrap().as_str(), Some("x"));
        assert!(map.get_path(&["a", "b", "c"]).is_none());
        assert!(map.get_path(&["missing"]).is_none());
        assert!(map.get_path(&[]).is_none());
    }

    #[test]
    fn test_overlay() {
        let mut map = params("page=1");
        assert_eq!(map.apply_overlay("page=2").unwrap(), Some(ParamValue::from("1")));
        map.apply_overlay("q=a=b").unwrap();
        assert_eq!(map.get("q").unwrap().as_str(), Some("a=b"));
        map.apply_overlay("empty=").unwrap();
        assert_eq!(map.get("empty").unwrap().as_str(), Some(""));
        assert!(map.apply_overlay("novalue").is_err());
        assert!(map.apply_overlay("=v").is_err());
    }

    #[test]
    fn test_put_all_and_extend() {
        let mut map = ParameterMap::new();
        map.put_all(vec![("a", "1"), ("b", "2")]);
        map.extend(vec![("c".to_string(), ParamValue::from(vec!["x", "y"]))]);
        assert_eq!(map.size(), 3);
        assert_eq!(map.values().count(), 3);
        assert_eq!((&map).into_iter().count(), 3);
    }

    #[test]
    fn test_equality_ignores_order_and_request() {
        let left = params("a=1&b=2");
        let right = ParameterMap::from_source(&RawParameters::from_query("b=2&a=1"));
        assert_eq!(left, right);
    }

    #[test]
    fn test_dropping_a_deep_map() {
        let mut map = ParameterMap::new();
        for _ in 0..100_000 {
            let mut parent = ParameterMap::new();
            parent.put("a", map);
            map = parent;
        }
        assert!(map.get("a").unwrap().as_map().is_some());
        drop(map);
    }

    #[test]
    fn test_serde_shape() {
        let map = params("book.title=T&tag=a&tag=b");
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "book.title": "T",
                "tag": ["a", "b"],
                "book": { "title": "T" }
            })
        );

        let back: ParameterMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
        assert!(back.request().is_none());
    }
}
