use serde::{Deserialize, Serialize};

use super::params::ParameterMap;

/// A request-derived value after collapsing: one string, or several in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlatValue {
    Scalar(String),
    Sequence(Vec<String>),
}

/// Collapses the raw values of one parameter for presentation.
///
/// A single value becomes a scalar. Anything else, including an empty list,
/// is kept as a sequence in its original order.
///
/// # Example
///
/// ```
/// use nested_params::{collapse, FlatValue};
///
/// assert_eq!(collapse(&["x".to_string()]), FlatValue::Scalar("x".into()));
/// assert_eq!(
///     collapse(&["a".to_string(), "b".to_string()]),
///     FlatValue::Sequence(vec!["a".into(), "b".into()])
/// );
/// ```
pub fn collapse(values: &[String]) -> FlatValue {
    match values {
        [single] => FlatValue::Scalar(single.clone()),
        _ => FlatValue::Sequence(values.to_vec()),
    }
}

/// A value stored in a [`ParameterMap`].
///
/// Serializes as plain JSON: a string, an array of strings, or an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(String),
    Sequence(Vec<String>),
    Nested(ParameterMap),
}

impl ParamValue {
    /// Borrows the value with read-time collapsing applied.
    ///
    /// A one-element sequence reads as its only element; every other shape
    /// passes through unchanged.
    pub fn collapsed(&self) -> ValueRef<'_> {
        match self {
            ParamValue::Scalar(s) => ValueRef::Scalar(s),
            ParamValue::Sequence(values) => match values.as_slice() {
                [single] => ValueRef::Scalar(single),
                all => ValueRef::Sequence(all),
            },
            ParamValue::Nested(map) => ValueRef::Nested(map),
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, ParamValue::Nested(_))
    }

    pub fn as_map(&self) -> Option<&ParameterMap> {
        match self {
            ParamValue::Nested(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut ParameterMap> {
        match self {
            ParamValue::Nested(map) => Some(map),
            _ => None,
        }
    }
}

impl From<FlatValue> for ParamValue {
    fn from(value: FlatValue) -> Self {
        match value {
            FlatValue::Scalar(s) => ParamValue::Scalar(s),
            FlatValue::Sequence(values) => ParamValue::Sequence(values),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Sequence(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::Sequence(values.into_iter().map(String::from).collect())
    }
}

impl From<ParameterMap> for ParamValue {
    fn from(map: ParameterMap) -> Self {
        ParamValue::Nested(map)
    }
}

/// Borrowed view of a [`ParamValue`] as returned by lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRef<'a> {
    Scalar(&'a str),
    Sequence(&'a [String]),
    Nested(&'a ParameterMap),
}

impl<'a> ValueRef<'a> {
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            ValueRef::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&'a [String]> {
        match self {
            ValueRef::Sequence(values) => Some(*values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&'a ParameterMap> {
        match self {
            ValueRef::Nested(map) => Some(*map),
            _ => None,
        }
    }

    pub fn to_owned_value(&self) -> ParamValue {
        match self {
            ValueRef::Scalar(s) => ParamValue::Scalar(s.to_string()),
            ValueRef::Sequence(values) => ParamValue::Sequence(values.to_vec()),
            ValueRef::Nested(map) => ParamValue::Nested((*map).clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_collapse_single_value() {
        assert_eq!(collapse(&strings(&["Groovy"])), FlatValue::Scalar("Groovy".into()));
    }

    #[test]
    fn test_collapse_keeps_order_of_many() {
        assert_eq!(
            collapse(&strings(&["b", "a", "c"])),
            FlatValue::Sequence(strings(&["b", "a", "c"]))
        );
    }

    #[test]
    fn test_collapse_empty_passes_through() {
        assert_eq!(collapse(&[]), FlatValue::Sequence(Vec::new()));
    }

    #[test]
    fn test_collapsed_view_unwraps_single_element_sequence() {
        let value = ParamValue::Sequence(strings(&["only"]));
        assert_eq!(value.collapsed(), ValueRef::Scalar("only"));
        assert_eq!(value.collapsed().as_str(), Some("only"));
    }

    #[test]
    fn test_collapsed_view_leaves_other_shapes() {
        let scalar = ParamValue::from("v");
        assert_eq!(scalar.collapsed(), ValueRef::Scalar("v"));

        let many = ParamValue::from(vec!["a", "b"]);
        assert_eq!(many.collapsed().as_slice(), Some(&strings(&["a", "b"])[..]));

        let empty = ParamValue::Sequence(Vec::new());
        assert_eq!(empty.collapsed(), ValueRef::Sequence(&[]));
    }

    #[test]
    fn test_nested_accessors() {
        let mut value = ParamValue::from(ParameterMap::new());
        assert!(value.is_nested());
        assert!(value.as_map().is_some());
        assert!(value.as_map_mut().is_some());
        assert!(ParamValue::from("x").as_map().is_none());
    }

    #[test]
    fn test_json_shapes() {
        let value: ParamValue = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(value, ParamValue::from(vec!["a", "b"]));

        let value: ParamValue = serde_json::from_str(r#""a""#).unwrap();
        assert_eq!(value, ParamValue::from("a"));

        let value: ParamValue = serde_json::from_str(r#"{"title":"Groovy"}"#).unwrap();
        assert!(value.is_nested());
    }
}
