//! Router configuration.

use serde::Deserialize;

use crate::error::Result;

/// Default separator between a controller class and its method.
pub const DEFAULT_CALLBACK_SEPARATOR: &str = "::";

/// Default separator joining a namespace and a controller class.
pub const DEFAULT_NAMESPACE_SEPARATOR: &str = "\\";

/// Immutable settings owned by a router.
///
/// # Example
///
/// ```
/// use oxide_dispatch::RouterConfig;
///
/// let config = RouterConfig::from_json(r#"{"base_domain": "https://example.com/"}"#).unwrap();
/// assert_eq!(config.base_domain(), "https://example.com");
/// assert_eq!(config.callback_separator(), "::");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    base_domain: String,
    callback_separator: String,
    namespace_separator: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_domain: String::new(),
            callback_separator: DEFAULT_CALLBACK_SEPARATOR.to_string(),
            namespace_separator: DEFAULT_NAMESPACE_SEPARATOR.to_string(),
        }
    }
}

impl RouterConfig {
    /// Creates a configuration for the given base domain.
    ///
    /// A trailing slash on the domain is stripped.
    #[must_use]
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into(),
            ..Self::default()
        }
        .normalized()
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Config`](crate::RouterError::Config) if the input is not
    /// a valid configuration object.
    pub fn from_json(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        Ok(config.normalized())
    }

    /// Sets the controller callback separator.
    #[must_use]
    pub fn with_callback_separator(mut self, separator: impl Into<String>) -> Self {
        self.callback_separator = separator.into();
        self.normalized()
    }

    /// Sets the namespace separator.
    #[must_use]
    pub fn with_namespace_separator(mut self, separator: impl Into<String>) -> Self {
        self.namespace_separator = separator.into();
        self
    }

    /// Returns the base domain, without trailing slash.
    #[must_use]
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Returns the controller callback separator.
    #[must_use]
    pub fn callback_separator(&self) -> &str {
        &self.callback_separator
    }

    /// Returns the namespace separator.
    #[must_use]
    pub fn namespace_separator(&self) -> &str {
        &self.namespace_separator
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.base_domain.trim_end_matches('/').len();
        self.base_domain.truncate(trimmed);
        // An empty separator would split every reference at offset zero.
        if self.callback_separator.is_empty() {
            self.callback_separator = DEFAULT_CALLBACK_SEPARATOR.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.base_domain(), "");
        assert_eq!(config.callback_separator(), "::");
        assert_eq!(config.namespace_separator(), "\\");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        assert_eq!(
            RouterConfig::new("http://localhost:8000/").base_domain(),
            "http://localhost:8000"
        );
        assert_eq!(RouterConfig::new("http://a.b//").base_domain(), "http://a.b");
    }

    #[test]
    fn test_from_json() {
        let config = RouterConfig::from_json(
            r#"{"base_domain": "https://example.com/", "callback_separator": "@"}"#,
        )
        .unwrap();
        assert_eq!(config.base_domain(), "https://example.com");
        assert_eq!(config.callback_separator(), "@");
        assert_eq!(config.namespace_separator(), "\\");
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(RouterConfig::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_empty_separator_falls_back() {
        let config = RouterConfig::new("").with_callback_separator("");
        assert_eq!(config.callback_separator(), "::");
    }
}
