use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

/// Anything that can hand over raw request parameters.
///
/// A source lists every parameter name with its values (never mutated by this
/// crate) and answers whether a string is one of its literal parameter names.
/// The order of [`parameters`](ParameterSource::parameters) is the order in
/// which a [`ParameterMap`](crate::ParameterMap) is built.
pub trait ParameterSource {
    /// Iterates every `(name, values)` pair in source order.
    fn parameters(&self) -> impl Iterator<Item = (&str, &[String])>;

    /// Raw values for one parameter name.
    fn values(&self, name: &str) -> Option<&[String]>;

    /// Whether `name` is a literal parameter name of this source.
    fn has_parameter(&self, name: &str) -> bool {
        self.values(name).is_some()
    }
}

macro_rules! impl_source_for_map {
    ($($map:ident),*) => {
        $(
            impl ParameterSource for $map<String, Vec<String>> {
                fn parameters(&self) -> impl Iterator<Item = (&str, &[String])> {
                    self.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
                }

                fn values(&self, name: &str) -> Option<&[String]> {
                    self.get(name).map(Vec::as_slice)
                }
            }
        )*
    };
}

impl_source_for_map!(IndexMap, HashMap, BTreeMap);

/// An insertion-ordered, multi-valued parameter table.
///
/// Built from query strings and form bodies, or directly from name/value pairs.
/// Repeated names accumulate their values in arrival order.
///
/// # Example
///
/// ```
/// use nested_params::{ParameterSource, RawParameters};
///
/// let raw = RawParameters::from_query("tag=a&tag=b&book.title=Groovy+in+Action");
/// assert_eq!(raw.values("tag").unwrap(), ["a", "b"]);
/// assert_eq!(raw.first("book.title"), Some("Groovy in Action"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    entries: IndexMap<String, Vec<String>>,
}

impl RawParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored. A name without `=` gets an empty value.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::new();
        params.extend_from_form(query.strip_prefix('?').unwrap_or(query));
        params
    }

    /// Appends the pairs of a form-encoded body after the existing parameters.
    pub fn extend_from_form(&mut self, body: &str) {
        for (name, value) in form_urlencoded::parse(body.as_bytes()) {
            self.append(name.into_owned(), value.into_owned());
        }
    }

    /// Adds one value to the end of `name`'s value list.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(name.into()).or_default().push(value.into());
    }

    /// First value of `name`, the way a servlet's `getParameter` reads it.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.entries
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.entries
    }
}

impl ParameterSource for RawParameters {
    fn parameters(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.parameters()
    }

    fn values(&self, name: &str) -> Option<&[String]> {
        ParameterSource::values(&self.entries, name)
    }
}

impl<K, V> FromIterator<(K, V)> for RawParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for RawParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

impl From<IndexMap<String, Vec<String>>> for RawParameters {
    fn from(entries: IndexMap<String, Vec<String>>) -> Self {
        Self { entries }
    }
}
