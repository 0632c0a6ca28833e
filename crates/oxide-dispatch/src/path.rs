//! Path template compilation and matching.

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::request::Params;

/// A piece of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Literal text, matched verbatim.
    Literal(String),
    /// A `{name}` placeholder, matching one or more non-`/` characters.
    Param(String),
}

/// A compiled path template.
///
/// Placeholders may appear anywhere in the template, not only as whole
/// segments: `/files/{name}.txt` is valid.
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// The original template string.
    template: String,
    /// Parsed segments.
    segments: Vec<PathSegment>,
    /// Anchored regex for matching.
    regex: Regex,
    /// Placeholder names in order.
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compiles a path template.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_dispatch::PathPattern;
    ///
    /// let pattern = PathPattern::new("/user/{id}/posts/{postId}").unwrap();
    /// let params = pattern.match_path("/user/42/posts/7").unwrap();
    /// assert_eq!(params.values(), ["42", "7"]);
    /// assert!(pattern.match_path("/user/42/posts/7/edit").is_none());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] when a brace is not part of a
    /// well-formed `{identifier}` placeholder.
    pub fn new(template: &str) -> Result<Self> {
        let segments = parse_template(template)?;

        let mut regex_str = String::from("^");
        let mut param_names = Vec::new();
        for segment in &segments {
            match segment {
                PathSegment::Literal(text) => regex_str.push_str(&regex::escape(text)),
                PathSegment::Param(name) => {
                    param_names.push(name.clone());
                    regex_str.push_str("([^/]+)");
                }
            }
        }
        regex_str.push('$');

        let regex = Regex::new(&regex_str)
            .map_err(|e| RouterError::InvalidPattern(format!("{template}: {e}")))?;

        Ok(Self {
            template: template.to_string(),
            segments,
            regex,
            param_names,
        })
    }

    /// Attempts to match a full path against this pattern.
    ///
    /// Returns the captured values in placeholder order.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;

        let mut params = Params::new();
        for (i, name) in self.param_names.iter().enumerate() {
            if let Some(value) = caps.get(i + 1) {
                params.push(name.as_str(), value.as_str());
            }
        }

        Some(params)
    }

    /// Returns the original template string.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the placeholder names in order.
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Substitutes parameters into the template. See [`substitute`].
    pub fn reverse<I, K, V>(&self, params: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        substitute(&self.template, params)
    }
}

/// Replaces every `{key}` in `template` with the stringified value.
///
/// Placeholders without a value are left as literal text.
///
/// ```
/// use oxide_dispatch::path::substitute;
///
/// assert_eq!(substitute("/user/{id}/{tab}", [("id", 42)]), "/user/42/{tab}");
/// ```
pub fn substitute<I, K, V>(template: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: ToString,
{
    params
        .into_iter()
        .fold(template.to_string(), |path, (key, value)| {
            path.replace(&format!("{{{}}}", key.as_ref()), &value.to_string())
        })
}

fn parse_template(template: &str) -> Result<Vec<PathSegment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        literal.push_str(&rest[..pos]);
        if rest[pos..].starts_with('}') {
            return Err(RouterError::InvalidPattern(format!(
                "{template}: unmatched '}}'"
            )));
        }

        let after = &rest[pos + 1..];
        let close = after.find('}').ok_or_else(|| {
            RouterError::InvalidPattern(format!("{template}: unclosed '{{'"))
        })?;
        let name = &after[..close];
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(RouterError::InvalidPattern(format!(
                "{template}: invalid placeholder name {name:?}"
            )));
        }

        if !literal.is_empty() {
            segments.push(PathSegment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(PathSegment::Param(name.to_string()));
        rest = &after[close + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(PathSegment::Literal(literal));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_path() {
        let pattern = PathPattern::new("/users").unwrap();
        assert!(pattern.match_path("/users").is_some());
        assert!(pattern.match_path("/users/").is_none());
        assert!(pattern.match_path("/users/1").is_none());
        assert!(pattern.match_path("/api/users").is_none());
    }

    #[test]
    fn test_root_path() {
        let pattern = PathPattern::new("/").unwrap();
        assert!(pattern.match_path("/").unwrap().is_empty());
        assert!(pattern.match_path("").is_none());
    }

    #[test]
    fn test_multiple_params_in_order() {
        let pattern = PathPattern::new("/posts/{post_id}/comments/{comment_id}").unwrap();
        assert_eq!(pattern.param_names(), ["post_id", "comment_id"]);

        let params = pattern.match_path("/posts/42/comments/7").unwrap();
        assert_eq!(params.values(), ["42", "7"]);
        assert_eq!(params.named("comment_id"), Some("7"));
    }

    #[test]
    fn test_param_excludes_separator() {
        let pattern = PathPattern::new("/files/{name}").unwrap();
        assert!(pattern.match_path("/files/docs/readme.md").is_none());
        assert!(pattern.match_path("/files/").is_none());
    }

    #[test]
    fn test_param_inside_segment() {
        let pattern = PathPattern::new("/files/{name}.txt").unwrap();
        let params = pattern.match_path("/files/notes.txt").unwrap();
        assert_eq!(params.values(), ["notes"]);
        assert!(pattern.match_path("/files/notes.md").is_none());
    }

    #[test]
    fn test_literal_metacharacters_escaped() {
        let pattern = PathPattern::new("/a.b/(x)+").unwrap();
        assert!(pattern.match_path("/a.b/(x)+").is_some());
        assert!(pattern.match_path("/aXb/xx").is_none());
    }

    #[test]
    fn test_duplicate_names_capture_twice() {
        let pattern = PathPattern::new("/{id}/{id}").unwrap();
        let params = pattern.match_path("/1/2").unwrap();
        assert_eq!(params.values(), ["1", "2"]);
    }

    #[test]
    fn test_n_placeholders_yield_n_captures() {
        let cases = [
            ("/", 0),
            ("/a/{x}", 1),
            ("/{a}/{b}/c/{d}", 3),
            ("/{a}-{b}", 2),
        ];
        for (template, n) in cases {
            let pattern = PathPattern::new(template).unwrap();
            let path = pattern.param_names().iter().fold(template.to_string(), |p, name| {
                p.replacen(&format!("{{{name}}}"), "v", 1)
            });
            let params = pattern.match_path(&path).unwrap();
            assert_eq!(params.len(), n, "template {template}");
        }
    }

    #[test]
    fn test_segments() {
        let pattern = PathPattern::new("/user/{id}").unwrap();
        assert_eq!(
            pattern.segments(),
            [
                PathSegment::Literal("/user/".to_string()),
                PathSegment::Param("id".to_string()),
            ]
        );
    }

    #[test]
    fn test_malformed_templates() {
        for template in ["/user/{}", "/user/{id", "/user/id}", "/user/{a-b}", "/{{id}}"] {
            assert!(
                matches!(PathPattern::new(template), Err(RouterError::InvalidPattern(_))),
                "template {template}"
            );
        }
    }

    #[test]
    fn test_reverse() {
        let pattern = PathPattern::new("/posts/{id}").unwrap();
        assert_eq!(pattern.reverse([("id", "123")]), "/posts/123");
    }

    #[test]
    fn test_substitute_leaves_missing_placeholders() {
        assert_eq!(
            substitute("/a/{x}/{y}/{x}", [("x", "1")]),
            "/a/1/{y}/1"
        );
        assert_eq!(substitute("/a/{x}", Vec::<(&str, &str)>::new()), "/a/{x}");
    }
}
