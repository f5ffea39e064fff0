use indexmap::IndexMap;

use super::params::ParameterMap;
use super::source::ParameterSource;
use super::value::{FlatValue, ParamValue, collapse};

/// Default character that separates nesting levels in a parameter name.
pub const DEFAULT_SEPARATOR: char = '.';

/// What happened when two parameters expanded onto the same nested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// A leaf value replaced another leaf value.
    LeafOverwritten,
    /// A leaf value replaced a nested map.
    NodeReplacedByLeaf,
    /// A nested map replaced a leaf value.
    LeafReplacedByNode,
}

/// One last-write-wins conflict seen during expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// Literal parameter name whose expansion won the write.
    pub key: String,
    /// Nested path that was written, root segment first.
    pub path: Vec<String>,
    pub kind: CollisionKind,
}

/// Diagnostics collected while expanding one parameter source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// Number of parameters that produced a nested leaf value.
    pub expanded: usize,
    /// Parameters whose expansion stopped at a prefix that is itself a literal name.
    pub suppressed: Vec<String>,
    pub collisions: Vec<Collision>,
}

impl ExpansionReport {
    /// True when no two parameters fought over the same nested path.
    pub fn is_clean(&self) -> bool {
        self.collisions.is_empty()
    }

    fn record(&mut self, key: &str, path: &[String], kind: CollisionKind) {
        tracing::debug!(key, path = %path.join("/"), ?kind, "nested expansion collision");
        self.collisions.push(Collision {
            key: key.to_string(),
            path: path.to_vec(),
            kind,
        });
    }
}

/// Derives nested maps from separator-delimited parameter names.
///
/// `book.author.name=Jane` yields `{"book": {"author": {"name": "Jane"}}}` in
/// addition to the literal entry. Expansion of a name stops as soon as one of
/// its prefixes is itself a literal parameter name of the source. Every
/// intermediate level is purely structural; only the deepest level receives
/// the collapsed value of the whole parameter.
///
/// # Example
///
/// ```
/// use nested_params::{NestedKeyExpander, ParameterMap, RawParameters};
///
/// let raw = RawParameters::from_query("a.b.c=x");
/// let mut root = ParameterMap::new();
/// let report = NestedKeyExpander::new().expand(&raw, &mut root);
///
/// assert_eq!(report.expanded, 1);
/// assert_eq!(root.get_path(&["a", "b", "c"]).unwrap().as_str(), Some("x"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedKeyExpander {
    separator: char,
    keep_partial_keys: bool,
}

impl Default for NestedKeyExpander {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            keep_partial_keys: false,
        }
    }
}

impl NestedKeyExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits names at `separator` instead of `.`.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Also stores the unsplit remainder (`b.c` under `a`) at every
    /// intermediate level.
    pub fn keep_partial_keys(mut self, keep: bool) -> Self {
        self.keep_partial_keys = keep;
        self
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Writes the nested entries implied by `source` into `root`.
    ///
    /// Literal entries are not touched here. The source is only read, both
    /// for values and as the literal-name oracle at every level.
    pub fn expand<S>(&self, source: &S, root: &mut ParameterMap) -> ExpansionReport
    where
        S: ParameterSource + ?Sized,
    {
        let mut report = ExpansionReport::default();
        for (key, values) in source.parameters() {
            if !key.contains(self.separator) {
                continue;
            }
            tracing::trace!(key, "expanding nested parameter");
            let value = collapse(values);
            self.expand_key(source, key, &value, root, &mut report);
        }
        report
    }

    /// Walks `key` left to right, one separator-delimited segment per level.
    fn expand_key<S>(
        &self,
        source: &S,
        key: &str,
        value: &FlatValue,
        root: &mut ParameterMap,
        report: &mut ExpansionReport,
    ) where
        S: ParameterSource + ?Sized,
    {
        let mut level = root;
        let mut path = Vec::new();
        let mut rest = key;

        while let Some((prefix, remainder)) = rest.split_once(self.separator) {
            if source.has_parameter(prefix) {
                tracing::debug!(key, prefix, "literal parameter prefix suppresses expansion");
                report.suppressed.push(key.to_string());
                return;
            }

            path.push(prefix.to_string());
            self.ensure_node(level, prefix, key, &path, report);

            level = match level.entries.get_mut(prefix).and_then(ParamValue::as_map_mut) {
                Some(child) => child,
                None => return,
            };

            // Trailing separator: the level exists but nothing is assigned in it.
            if remainder.is_empty() {
                return;
            }

            if !remainder.contains(self.separator) {
                self.write_leaf(level, remainder, value, key, &path, report);
                report.expanded += 1;
                return;
            }

            if self.keep_partial_keys {
                self.write_leaf(level, remainder, value, key, &path, report);
            }
            rest = remainder;
        }
    }

    fn ensure_node(
        &self,
        level: &mut ParameterMap,
        prefix: &str,
        key: &str,
        path: &[String],
        report: &mut ExpansionReport,
    ) {
        let replaces_leaf = match level.entries.get(prefix) {
            Some(ParamValue::Nested(_)) => return,
            Some(_) => true,
            None => false,
        };
        if replaces_leaf {
            report.record(key, path, CollisionKind::LeafReplacedByNode);
        }
        let child = ParameterMap::with_values(IndexMap::new(), level.request.clone());
        level
            .entries
            .insert(prefix.to_string(), ParamValue::Nested(child));
    }

    fn write_leaf(
        &self,
        level: &mut ParameterMap,
        name: &str,
        value: &FlatValue,
        key: &str,
        path: &[String],
        report: &mut ExpansionReport,
    ) {
        let previous = level
            .entries
            .insert(name.to_string(), ParamValue::from(value.clone()));
        let kind = match previous {
            None => return,
            Some(ParamValue::Nested(_)) => CollisionKind::NodeReplacedByLeaf,
            Some(_) => CollisionKind::LeafOverwritten,
        };
        let mut leaf_path = path.to_vec();
        leaf_path.push(name.to_string());
        report.record(key, &leaf_path, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::access::ParameterAccess;
    use crate::map::source::RawParameters;
    use crate::map::value::ValueRef;

    fn expand(query: &str) -> (ParameterMap, ExpansionReport) {
        expand_with(NestedKeyExpander::new(), query)
    }

    fn expand_with(expander: NestedKeyExpander, query: &str) -> (ParameterMap, ExpansionReport) {
        let raw = RawParameters::from_query(query);
        let mut root = ParameterMap::new();
        let report = expander.expand(&raw, &mut root);
        (root, report)
    }

    #[test]
    fn test_plain_keys_produce_nothing() {
        let (root, report) = expand("a=1&b=2");
        assert!(root.is_empty());
        assert_eq!(report, ExpansionReport::default());
    }

    #[test]
    fn test_single_level() {
        let (root, report) = expand("book.title=Groovy");
        let book = root.get("book").unwrap().as_map().unwrap();
        assert_eq!(book.get("title"), Some(ValueRef::Scalar("Groovy")));
        assert_eq!(book.size(), 1);
        assert_eq!(report.expanded, 1);
    }

    #[test]
    fn test_intermediate_levels_are_structural() {
        let (root, _) = expand("a.b.c=x");
        let a = root.get("a").unwrap().as_map().unwrap();
        assert_eq!(a.keys().collect::<Vec<_>>(), vec!["b"]);
        let b = a.get("b").unwrap().as_map().unwrap();
        assert_eq!(b.keys().collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(b.get("c"), Some(ValueRef::Scalar("x")));
    }

    #[test]
    fn test_shared_prefixes_share_a_node() {
        let (root, report) = expand("book.title=T&book.author.name=Jane&book.author.age=40");
        assert_eq!(root.size(), 1);
        let book = root.get("book").unwrap().as_map().unwrap();
        assert_eq!(book.size(), 2);
        assert_eq!(root.get_path(&["book", "author", "name"]).unwrap().as_str(), Some("Jane"));
        assert_eq!(root.get_path(&["book", "author", "age"]).unwrap().as_str(), Some("40"));
        assert_eq!(report.expanded, 3);
        assert!(report.is_clean());
    }

    #[test]
    fn test_multi_values_are_carried_whole() {
        let (root, _) = expand("book.tags=a&book.tags=b");
        let tags = root.get_path(&["book", "tags"]).unwrap();
        assert_eq!(tags.as_slice().unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_literal_prefix_suppresses_expansion() {
        let (root, report) = expand("author=Jane&author.name=ignored");
        assert!(root.is_empty());
        assert_eq!(report.suppressed, vec!["author.name".to_string()]);
        assert_eq!(report.expanded, 0);
    }

    #[test]
    fn test_literal_check_applies_at_deeper_levels() {
        // "b" is a literal name, so expansion of a.b.c stops below "a".
        let (root, report) = expand("b=1&a.b.c=x");
        let a = root.get("a").unwrap().as_map().unwrap();
        assert!(a.is_empty());
        assert_eq!(report.suppressed, vec!["a.b.c".to_string()]);
    }

    #[test]
    fn test_literal_check_ignores_dotted_prefixes() {
        // The oracle sees segments, not cumulative paths.
        let (root, _) = expand("a.b=1&a.b.c=x");
        assert!(root.get("a").is_some());
    }

    #[test]
    fn test_trailing_separator_creates_empty_level() {
        let (root, report) = expand("a.=x");
        let a = root.get("a").unwrap().as_map().unwrap();
        assert!(a.is_empty());
        assert_eq!(report.expanded, 0);
    }

    #[test]
    fn test_leading_and_doubled_separators_degrade() {
        let (root, _) = expand(".a=x&b..c=y");
        assert_eq!(root.get_path(&["", "a"]).unwrap().as_str(), Some("x"));
        assert_eq!(root.get_path(&["b", "", "c"]).unwrap().as_str(), Some("y"));
    }

    #[test]
    fn test_leaf_then_node_collision_is_last_write_wins() {
        let (root, report) = expand("a.b=1&a.b.c=2");
        assert_eq!(root.get_path(&["a", "b", "c"]).unwrap().as_str(), Some("2"));
        assert_eq!(
            report.collisions,
            vec![Collision {
                key: "a.b.c".into(),
                path: vec!["a".into(), "b".into()],
                kind: CollisionKind::LeafReplacedByNode,
            }]
        );
    }

    #[test]
    fn test_node_then_leaf_collision_is_last_write_wins() {
        let (root, report) = expand("a.b.c=2&a.b=1");
        assert_eq!(root.get_path(&["a", "b"]).unwrap().as_str(), Some("1"));
        assert_eq!(report.collisions.len(), 1);
        assert_eq!(report.collisions[0].kind, CollisionKind::NodeReplacedByLeaf);
        assert_eq!(report.collisions[0].path, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_custom_separator() {
        let expander = NestedKeyExpander::new().with_separator('_');
        let (root, _) = expand_with(expander, "book_title=T&plain.dotted=x");
        assert_eq!(root.get_path(&["book", "title"]).unwrap().as_str(), Some("T"));
        assert!(!root.contains_key("plain"));
    }

    #[test]
    fn test_keep_partial_keys() {
        let expander = NestedKeyExpander::new().keep_partial_keys(true);
        let (root, _) = expand_with(expander, "a.b.c=x");
        let a = root.get("a").unwrap().as_map().unwrap();
        assert_eq!(a.get("b.c"), Some(ValueRef::Scalar("x")));
        assert_eq!(a.get_path(&["b", "c"]).unwrap().as_str(), Some("x"));
        let b = a.get("b").unwrap().as_map().unwrap();
        assert_eq!(b.size(), 1);
    }

    #[test]
    fn test_source_is_not_mutated() {
        let raw = RawParameters::from_query("a.b=1&c=2");
        let before = raw.clone();
        let mut root = ParameterMap::new();
        NestedKeyExpander::new().expand(&raw, &mut root);
        assert_eq!(raw, before);
    }

    #[test]
    fn test_very_deep_key_does_not_exhaust_the_stack() {
        let depth = 200_000;
        let key = vec!["a"; depth + 1].join(".");
        let raw: RawParameters = [(key, "x")].into_iter().collect();
        let mut root = ParameterMap::new();
        let report = NestedKeyExpander::new().expand(&raw, &mut root);

        assert_eq!(report.expanded, 1);
        let path = vec!["a"; depth + 1];
        assert_eq!(root.get_path(&path), Some(ValueRef::Scalar("x")));
    }
}
