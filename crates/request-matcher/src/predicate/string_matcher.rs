//! String predicates used for the path and body dimensions.
//!
//! Every matcher renders a stable, human-legible description that is
//! reproduced verbatim in assertion failures.

use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Caller-provided predicate with its own description.
pub struct CustomMatcher<T: ?Sized> {
    description: String,
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: ?Sized> CustomMatcher<T> {
    pub fn new<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn test(&self, value: &T) -> bool {
        (self.predicate)(value)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

// Manual impl: a derive would require `T: Clone`, which `str` is not.
impl<T: ?Sized> Clone for CustomMatcher<T> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T: ?Sized> fmt::Debug for CustomMatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomMatcher")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Predicate over an optional string value.
///
/// `None` stands for an absent value (no body, missing map entry).
#[derive(Debug, Clone)]
pub enum StringMatcher {
    /// Exact equality
    Is(String),
    /// Substring
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    /// Regex search
    Matches(Arc<Regex>),
    /// Structural JSON equality
    JsonEquals(serde_json::Value),
    /// Absent or empty
    EmptyOrNone,
    Custom(CustomMatcher<str>),
}

impl StringMatcher {
    pub fn is(value: impl Into<String>) -> Self {
        Self::Is(value.into())
    }

    pub fn contains(value: impl Into<String>) -> Self {
        Self::Contains(value.into())
    }

    pub fn starts_with(value: impl Into<String>) -> Self {
        Self::StartsWith(value.into())
    }

    pub fn ends_with(value: impl Into<String>) -> Self {
        Self::EndsWith(value.into())
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Matches(Arc::new(Regex::new(pattern)?)))
    }

    pub fn json_eq(value: serde_json::Value) -> Self {
        Self::JsonEquals(value)
    }

    pub fn empty() -> Self {
        Self::EmptyOrNone
    }

    pub fn custom<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Custom(CustomMatcher::new(description, predicate))
    }

    /// Check a value against this matcher.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (StringMatcher::EmptyOrNone, v) => v.map_or(true, str::is_empty),

            // Every other matcher needs a value
            (_, None) => false,

            (StringMatcher::Is(expected), Some(v)) => v == expected,
            (StringMatcher::Contains(needle), Some(v)) => v.contains(needle.as_str()),
            (StringMatcher::StartsWith(prefix), Some(v)) => v.starts_with(prefix.as_str()),
            (StringMatcher::EndsWith(suffix), Some(v)) => v.ends_with(suffix.as_str()),
            (StringMatcher::Matches(regex), Some(v)) => regex.is_match(v),
            (StringMatcher::JsonEquals(expected), Some(v)) => {
                serde_json::from_str::<serde_json::Value>(v)
                    .map(|actual| &actual == expected)
                    .unwrap_or(false)
            }
            (StringMatcher::Custom(custom), Some(v)) => custom.test(v),
        }
    }
}

impl fmt::Display for StringMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringMatcher::Is(v) => write!(f, "is {v:?}"),
            StringMatcher::Contains(v) => write!(f, "a string containing {v:?}"),
            StringMatcher::StartsWith(v) => write!(f, "a string starting with {v:?}"),
            StringMatcher::EndsWith(v) => write!(f, "a string ending with {v:?}"),
            StringMatcher::Matches(re) => {
                write!(f, "a string matching the pattern {:?}", re.as_str())
            }
            StringMatcher::JsonEquals(v) => write!(f, "json equal to {v}"),
            StringMatcher::EmptyOrNone => f.write_str("(null or an empty string)"),
            StringMatcher::Custom(custom) => f.write_str(custom.description()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_matcher_is() {
        let matcher = StringMatcher::is("/post");
        assert!(matcher.matches(Some("/post")));
        assert!(!matcher.matches(Some("/get")));
        assert!(!matcher.matches(None));
        assert_eq!(matcher.to_string(), r#"is "/post""#);
    }

    #[test]
    fn test_string_matcher_contains_escapes_quotes() {
        let matcher = StringMatcher::contains(r#""property": "value""#);
        assert!(matcher.matches(Some(r#"{"property": "value"}"#)));
        assert!(!matcher.matches(Some(r#"{"another": "someother"}"#)));
        assert_eq!(
            matcher.to_string(),
            r#"a string containing "\"property\": \"value\"""#
        );
    }

    #[test]
    fn test_string_matcher_prefix_suffix() {
        let prefix = StringMatcher::starts_with("/api");
        assert!(prefix.matches(Some("/api/v1")));
        assert!(!prefix.matches(Some("/v1/api")));

        let suffix = StringMatcher::ends_with(".json");
        assert!(suffix.matches(Some("/data.json")));
        assert!(!suffix.matches(Some("/data.xml")));
        assert_eq!(suffix.to_string(), r#"a string ending with ".json""#);
    }

    #[test]
    fn test_string_matcher_regex() {
        let matcher = StringMatcher::regex(r"^/body/\d+$").unwrap();
        assert!(matcher.matches(Some("/body/0")));
        assert!(!matcher.matches(Some("/body/x")));
        assert_eq!(
            matcher.to_string(),
            r#"a string matching the pattern "^/body/\\d+$""#
        );
        assert!(StringMatcher::regex("(unclosed").is_err());
    }

    #[test]
    fn test_string_matcher_empty_or_none() {
        let matcher = StringMatcher::empty();
        assert!(matcher.matches(None));
        assert!(matcher.matches(Some("")));
        assert!(!matcher.matches(Some("{}")));
        assert_eq!(matcher.to_string(), "(null or an empty string)");
    }

    #[test]
    fn test_string_matcher_json_equals_ignores_formatting() {
        let matcher = StringMatcher::json_eq(serde_json::json!({"key": 0}));
        assert!(matcher.matches(Some(r#"{"key" : 0}"#)));
        assert!(!matcher.matches(Some(r#"{"key" : 1}"#)));
        assert!(!matcher.matches(Some("not json")));
        assert_eq!(matcher.to_string(), r#"json equal to {"key":0}"#);
    }

    #[test]
    fn test_custom_matcher() {
        let matcher = StringMatcher::custom("a string of length 3", |v| v.len() == 3);
        assert!(matcher.matches(Some("abc")));
        assert!(!matcher.matches(Some("abcd")));
        assert_eq!(matcher.to_string(), "a string of length 3");
    }

    #[test]
    fn test_cloned_custom_matcher_shares_predicate() {
        let matcher = StringMatcher::custom("upper case", |v| v.chars().all(char::is_uppercase));
        let cloned = matcher.clone();
        assert!(cloned.matches(Some("ABC")));
        assert!(!cloned.matches(Some("abc")));
        assert_eq!(cloned.to_string(), matcher.to_string());
    }
}
