//! HTTP method predicates.

use hyper::Method;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum MethodMatcher {
    Is(Method),
    OneOf(Vec<Method>),
}

impl MethodMatcher {
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodMatcher::Is(expected) => expected == method,
            MethodMatcher::OneOf(allowed) => allowed.contains(method),
        }
    }
}

impl fmt::Display for MethodMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodMatcher::Is(method) => write!(f, "is <{method}>"),
            MethodMatcher::OneOf(methods) => {
                let listed: Vec<String> = methods.iter().map(|m| format!("<{m}>")).collect();
                write!(f, "one of {{{}}}", listed.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_is() {
        let matcher = MethodMatcher::Is(Method::POST);
        assert!(matcher.matches(&Method::POST));
        assert!(!matcher.matches(&Method::GET));
        assert_eq!(matcher.to_string(), "is <POST>");
    }

    #[test]
    fn test_method_one_of() {
        let matcher = MethodMatcher::OneOf(vec![Method::GET, Method::HEAD]);
        assert!(matcher.matches(&Method::HEAD));
        assert!(!matcher.matches(&Method::DELETE));
        assert_eq!(matcher.to_string(), "one of {<GET>, <HEAD>}");
    }
}
