use super::value::{ParamValue, ValueRef};

/// The map contract exposed to data-binding code.
///
/// Every operation works on the entries of one level only. Nested maps are
/// ordinary values here; nothing cascades into them and nothing is re-expanded
/// after a write.
pub trait ParameterAccess {
    /// Number of entries at this level.
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn contains_key(&self, key: &str) -> bool;

    /// Whether any entry holds `value`.
    ///
    /// Values are compared through their collapsed view, so a one-element
    /// sequence matches the equivalent scalar.
    fn contains_value(&self, value: &ParamValue) -> bool;

    /// Looks up an entry, unwrapping one-element sequences.
    ///
    /// A missing key is `None`, never an error.
    fn get(&self, key: &str) -> Option<ValueRef<'_>>;

    /// Stores a value as-is and returns the previous one.
    fn put(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue>;

    fn remove(&mut self, key: &str) -> Option<ParamValue>;

    fn put_all<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        for (key, value) in entries {
            self.put(key, value);
        }
    }

    fn clear(&mut self);

    fn keys(&self) -> impl Iterator<Item = &str>;

    /// Stored values, without read-time collapsing.
    fn values(&self) -> impl Iterator<Item = &ParamValue>;

    /// Stored entries, without read-time collapsing.
    fn entries(&self) -> impl Iterator<Item = (&str, &ParamValue)>;
}
