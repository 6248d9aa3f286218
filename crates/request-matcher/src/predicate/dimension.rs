//! Request dimensions and the per-fixture predicate set.

use super::field_matcher::MapMatcher;
use super::method_matcher::MethodMatcher;
use super::string_matcher::StringMatcher;
use crate::error::FixtureError;
use crate::request::IncomingRequest;
use std::collections::BTreeMap;
use std::fmt;

/// One request dimension a matcher can inspect.
///
/// The declaration order is the order diagnostics are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Method,
    Path,
    Query,
    Headers,
    Body,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Method,
        Dimension::Path,
        Dimension::Query,
        Dimension::Headers,
        Dimension::Body,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Method => "method",
            Dimension::Path => "path",
            Dimension::Query => "query",
            Dimension::Headers => "headers",
            Dimension::Body => "body",
        }
    }

    /// Name used in diagnostics, e.g. `pathMatcher`.
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Method => "methodMatcher",
            Dimension::Path => "pathMatcher",
            Dimension::Query => "queryMatcher",
            Dimension::Headers => "headersMatcher",
            Dimension::Body => "bodyMatcher",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A describable predicate bound to one request dimension.
#[derive(Debug, Clone)]
pub enum Matcher {
    Method(MethodMatcher),
    Path(StringMatcher),
    Query(MapMatcher),
    Headers(MapMatcher),
    Body(StringMatcher),
}

/// Applied when a fixture sets no body matcher.
static IMPLICIT_EMPTY_BODY: Matcher = Matcher::Body(StringMatcher::EmptyOrNone);

impl Matcher {
    pub fn dimension(&self) -> Dimension {
        match self {
            Matcher::Method(_) => Dimension::Method,
            Matcher::Path(_) => Dimension::Path,
            Matcher::Query(_) => Dimension::Query,
            Matcher::Headers(_) => Dimension::Headers,
            Matcher::Body(_) => Dimension::Body,
        }
    }

    pub fn evaluate(&self, request: &IncomingRequest) -> bool {
        match self {
            Matcher::Method(m) => m.matches(&request.method),
            Matcher::Path(m) => m.matches(Some(request.path.as_str())),
            Matcher::Query(m) => m.matches(&request.query, false),
            Matcher::Headers(m) => m.matches(&request.headers, true),
            // An empty body is "", not an absent value
            Matcher::Body(m) => m.matches(Some(request.body_text().as_ref())),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Matcher::Method(m) => m.to_string(),
            Matcher::Path(m) | Matcher::Body(m) => m.to_string(),
            Matcher::Query(m) | Matcher::Headers(m) => m.to_string(),
        }
    }
}

impl fmt::Display for Matcher {
    /// Diagnostic line: `<dimension>Matcher = <description>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.dimension().label(), self.describe())
    }
}

/// At most one matcher per dimension, iterated in dimension order.
#[derive(Debug, Clone, Default)]
pub struct RequestPredicates {
    matchers: BTreeMap<Dimension, Matcher>,
}

impl RequestPredicates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a matcher, rejecting a second matcher for the same dimension.
    pub fn insert(&mut self, matcher: Matcher) -> Result<(), FixtureError> {
        let dimension = matcher.dimension();
        if self.matchers.contains_key(&dimension) {
            return Err(FixtureError::DuplicateMatcher(dimension));
        }
        self.matchers.insert(dimension, matcher);
        Ok(())
    }

    pub fn get(&self, dimension: Dimension) -> Option<&Matcher> {
        self.matchers.get(&dimension)
    }

    /// Explicitly configured matchers only.
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Effective matchers in dimension order, including the implicit
    /// empty-body requirement when no body matcher was set.
    pub fn iter(&self) -> impl Iterator<Item = &Matcher> {
        let implicit_body = (!self.matchers.contains_key(&Dimension::Body))
            .then_some(&IMPLICIT_EMPTY_BODY);
        self.matchers.values().chain(implicit_body)
    }

    /// True when every effective matcher accepts the request.
    pub fn matches(&self, request: &IncomingRequest) -> bool {
        self.iter().all(|m| m.evaluate(request))
    }

    /// Diagnostic lines for every matcher that rejects the request.
    pub fn failures(&self, request: &IncomingRequest) -> Vec<String> {
        self.iter()
            .filter(|m| !m.evaluate(request))
            .map(ToString::to_string)
            .collect()
    }
}
