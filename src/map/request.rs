use super::source::{ParameterSource, RawParameters};

/// The inbound request a parameter map was built from.
///
/// Holds the request URI and its decoded parameters. Parameter maps keep a
/// shared, read-only reference to it and consult it only to ask whether a
/// string is a literal parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    uri: String,
    parameters: RawParameters,
}

impl Request {
    pub fn new(uri: impl Into<String>, parameters: RawParameters) -> Self {
        Self {
            uri: uri.into(),
            parameters,
        }
    }

    /// Builds a request from a URI, decoding the query string after `?`.
    ///
    /// A bare query string without a path (`a=1&b=2`, or just `flag`) is
    /// accepted as well. Input without `?` is a path only if it contains `/`
    /// and no `=`.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let query = split_query(&uri).unwrap_or("");
        let parameters = RawParameters::from_query(query);
        Self { uri, parameters }
    }

    /// Appends form-encoded body parameters after the query parameters.
    pub fn with_form_body(mut self, body: &str) -> Self {
        self.parameters.extend_from_form(body);
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn path(&self) -> &str {
        let end = self.uri.find(['?', '#']).unwrap_or(self.uri.len());
        let path = &self.uri[..end];
        if self.uri[end..].starts_with('?') || !is_bare_query(path) {
            path
        } else {
            ""
        }
    }

    pub fn query(&self) -> Option<&str> {
        split_query(&self.uri)
    }

    pub fn raw_parameters(&self) -> &RawParameters {
        &self.parameters
    }

    /// First value of a parameter.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.first(name)
    }

    pub fn parameter_values(&self, name: &str) -> Option<&[String]> {
        ParameterSource::values(&self.parameters, name)
    }
}

impl ParameterSource for Request {
    fn parameters(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.parameters.parameters()
    }

    fn values(&self, name: &str) -> Option<&[String]> {
        self.parameter_values(name)
    }
}

fn split_query(uri: &str) -> Option<&str> {
    let without_fragment = uri.split('#').next().unwrap_or(uri);
    match without_fragment.split_once('?') {
        Some((_, query)) => Some(query),
        None if is_bare_query(without_fragment) => Some(without_fragment),
        None => None,
    }
}

fn is_bare_query(text: &str) -> bool {
    text.contains('=') || !text.contains('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_uri_with_path_and_query() {
        let request = Request::from_uri("/books/save?book.title=Groovy&id=7#top");
        assert_eq!(request.path(), "/books/save");
        assert_eq!(request.query(), Some("book.title=Groovy&id=7"));
        assert_eq!(request.parameter("book.title"), Some("Groovy"));
        assert_eq!(request.parameter("id"), Some("7"));
        assert_eq!(request.raw_parameters().len(), 2);
    }

    #[test]
    fn test_from_bare_query() {
        let request = Request::from_uri("a=1&a=2");
        assert_eq!(request.path(), "");
        assert_eq!(request.parameter_values("a").unwrap(), ["1", "2"]);
    }

    #[test]
    fn test_path_without_query() {
        let request = Request::from_uri("/index");
        assert_eq!(request.path(), "/index");
        assert_eq!(request.query(), None);
        assert!(request.raw_parameters().is_empty());
    }

    #[test]
    fn test_form_body_merges_after_query() {
        let request = Request::from_uri("/save?x=q").with_form_body("x=b&y=2");
        assert_eq!(request.parameter_values("x").unwrap(), ["q", "b"]);
        assert_eq!(request.parameter("y"), Some("2"));
        assert!(request.has_parameter("y"));
    }

    #[test]
    fn test_bare_name_is_a_query() {
        let request = Request::from_uri("flag");
        assert_eq!(request.path(), "");
        assert_eq!(request.query(), Some("flag"));
        assert_eq!(request.parameter("flag"), Some(""));

        let request = Request::from_uri("flag?x=1");
        assert_eq!(request.path(), "flag");
        assert!(!request.has_parameter("flag"));
    }

    #[test]
    fn test_new_keeps_uri_and_parameters() {
        let parameters = RawParameters::from_query("book.title=Groovy");
        let request = Request::new("/books/save", parameters.clone());
        assert_eq!(request.uri(), "/books/save");
        assert_eq!(request.raw_parameters(), &parameters);
        assert_eq!(request.query(), None);

        let request = Request::from_uri("/books?id=7");
        assert_eq!(request.uri(), "/books?id=7");
    }
}
