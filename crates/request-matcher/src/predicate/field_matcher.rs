//! Map predicates shared by the query and header dimensions.

use super::string_matcher::{CustomMatcher, StringMatcher};
use std::collections::HashMap;
use std::fmt;

/// Predicate over a string-to-string map.
#[derive(Debug, Clone)]
pub enum MapMatcher {
    /// Entry with exactly this value: `map containing ["k"->"v"]`
    Containing { key: String, value: String },
    /// Key present with any value
    ContainingKey(String),
    /// Entry whose value satisfies a string matcher
    Entry { key: String, value: StringMatcher },
    Custom(CustomMatcher<HashMap<String, String>>),
}

impl MapMatcher {
    pub fn containing(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Containing {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn containing_key(key: impl Into<String>) -> Self {
        Self::ContainingKey(key.into())
    }

    pub fn entry(key: impl Into<String>, value: StringMatcher) -> Self {
        Self::Entry {
            key: key.into(),
            value,
        }
    }

    pub fn custom<F>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&HashMap<String, String>) -> bool + Send + Sync + 'static,
    {
        Self::Custom(CustomMatcher::new(description, predicate))
    }

    /// Check a map against this matcher.
    ///
    /// With `fold_case` the key is looked up lower-cased; header maps are
    /// stored with lower-cased names.
    pub fn matches(&self, map: &HashMap<String, String>, fold_case: bool) -> bool {
        let lookup = |key: &str| {
            let value = if fold_case {
                map.get(&key.to_ascii_lowercase())
            } else {
                map.get(key)
            };
            value.map(String::as_str)
        };

        match self {
            MapMatcher::Containing { key, value } => lookup(key) == Some(value.as_str()),
            MapMatcher::ContainingKey(key) => lookup(key).is_some(),
            MapMatcher::Entry { key, value } => lookup(key).is_some_and(|v| value.matches(Some(v))),
            MapMatcher::Custom(custom) => custom.test(map),
        }
    }
}

impl fmt::Display for MapMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapMatcher::Containing { key, value } => write!(f, "map containing [{key:?}->{value:?}]"),
            MapMatcher::ContainingKey(key) => write!(f, "map containing [{key:?}->ANYTHING]"),
            MapMatcher::Entry { key, value } => write!(f, "map containing [{key:?}->{value}]"),
            MapMatcher::Custom(custom) => f.write_str(custom.description()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_containing() {
        let matcher = MapMatcher::containing("key", "value");
        assert!(matcher.matches(&map(&[("key", "value")]), false));
        assert!(!matcher.matches(&map(&[("no_key", "no_value")]), false));
        assert!(!matcher.matches(&map(&[("key", "other")]), false));
        assert!(!matcher.matches(&HashMap::new(), false));
        assert_eq!(matcher.to_string(), r#"map containing ["key"->"value"]"#);
    }

    #[test]
    fn test_containing_folds_case_for_headers() {
        let headers = map(&[("x-api-key", "secret")]);
        let matcher = MapMatcher::containing("X-Api-Key", "secret");
        assert!(matcher.matches(&headers, true));
        // Query keys are case sensitive
        assert!(!matcher.matches(&headers, false));
        // The description keeps the key as written
        assert_eq!(matcher.to_string(), r#"map containing ["X-Api-Key"->"secret"]"#);
    }

    #[test]
    fn test_containing_key() {
        let matcher = MapMatcher::containing_key("page");
        assert!(matcher.matches(&map(&[("page", "")]), false));
        assert!(!matcher.matches(&map(&[("size", "10")]), false));
        assert_eq!(matcher.to_string(), r#"map containing ["page"->ANYTHING]"#);
    }

    #[test]
    fn test_entry_with_string_matcher() {
        let matcher = MapMatcher::entry("content-type", StringMatcher::contains("json"));
        assert!(matcher.matches(&map(&[("content-type", "application/json")]), true));
        assert!(!matcher.matches(&map(&[("content-type", "text/plain")]), true));
        assert_eq!(
            matcher.to_string(),
            r#"map containing ["content-type"->a string containing "json"]"#
        );
    }

    #[test]
    fn test_custom_map_matcher() {
        let matcher = MapMatcher::custom("an empty map", |m| m.is_empty());
        assert!(matcher.matches(&HashMap::new(), false));
        assert!(!matcher.matches(&map(&[("a", "b")]), false));
        assert_eq!(matcher.to_string(), "an empty map");
    }
}
