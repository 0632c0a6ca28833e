//! Request-side types: methods, captured parameters and the dispatched request.

use std::fmt;
use std::str::FromStr;

use crate::error::RouterError;

/// HTTP methods a route can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
}

impl Method {
    /// Returns the method as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(RouterError::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path parameters captured by a matched route, in placeholder order.
///
/// Values are positional. Lookup by name returns the first placeholder
/// with that name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    names: Vec<String>,
    values: Vec<String>,
}

impl Params {
    /// Creates new empty params.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a captured value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.names.push(name.into());
        self.values.push(value.into());
    }

    /// Gets the value at a position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Gets the first value captured under `name`.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.get(i))
    }

    /// Parses the value at a position as a specific type.
    #[must_use]
    pub fn parse<T: FromStr>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|v| v.parse().ok())
    }

    /// Returns the captured values in order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .zip(&self.values)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A request as seen by middleware after a route matched.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request path, without query string.
    pub path: String,
    /// Parameters captured from the path.
    pub params: Params,
    /// Name of the matched route, if it has one.
    pub route_name: Option<String>,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: Method, path: impl Into<String>, params: Params) -> Self {
        Self {
            method,
            path: path.into(),
            params,
            route_name: None,
        }
    }
}

/// Strips the query string and fragment from a request URI.
pub(crate) fn request_path(uri: &str) -> &str {
    let end = uri.find(['?', '#']).unwrap_or(uri.len());
    &uri[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("patch".parse::<Method>().unwrap(), Method::Patch);
        assert!(matches!(
            "HEAD".parse::<Method>(),
            Err(RouterError::InvalidMethod(m)) if m == "HEAD"
        ));
    }

    #[test]
    fn test_params_positional_and_named() {
        let mut params = Params::new();
        params.push("id", "123");
        params.push("post_id", "7");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get(0), Some("123"));
        assert_eq!(params.named("post_id"), Some("7"));
        assert_eq!(params.parse::<i64>(0), Some(123));
        assert_eq!(params.get(2), None);
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![("id", "123"), ("post_id", "7")]
        );
    }

    #[test]
    fn test_params_duplicate_names() {
        let mut params = Params::new();
        params.push("id", "1");
        params.push("id", "2");
        assert_eq!(params.values(), ["1", "2"]);
        assert_eq!(params.named("id"), Some("1"));
    }

    #[test]
    fn test_request_path() {
        assert_eq!(request_path("/users?page=2"), "/users");
        assert_eq!(request_path("/users#top"), "/users");
        assert_eq!(request_path("/"), "/");
        assert_eq!(request_path(""), "");
    }
}
