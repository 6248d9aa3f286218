//! Fluent fixture construction.
//!
//! ```ignore
//! server
//!     .add_fixture(200, "body.json")
//!     .if_request_matches()
//!     .method_is(Method::POST)
//!     .path_is("/post")
//!     .body_contains(r#""property": "value""#)
//!     .register()?;
//! ```
//!
//! Each dimension accepts one matcher. Setting the same dimension twice is a
//! configuration error reported by [`RequestMatcherBuilder::register`].

use super::store::FixtureStore;
use super::types::{Fixture, ResponseSource};
use crate::error::FixtureError;
use crate::predicate::{
    Dimension, MapMatcher, Matcher, MethodMatcher, RequestPredicates, StringMatcher,
};
use crate::resource::FixtureResources;
use hyper::{Method, StatusCode};
use std::sync::Arc;
use tracing::debug;

/// Builds one fixture and appends it to the owning store on [`register`](Self::register).
#[must_use = "a fixture is only added to the store by calling `register`"]
pub struct RequestMatcherBuilder<'a> {
    store: &'a FixtureStore,
    resources: Option<&'a FixtureResources>,
    status: Option<StatusCode>,
    source: ResponseSource,
    headers: Vec<(String, String)>,
    order: Option<i32>,
    predicates: RequestPredicates,
    error: Option<FixtureError>,
}

impl<'a> RequestMatcherBuilder<'a> {
    pub fn new(store: &'a FixtureStore, status: u16, source: ResponseSource) -> Self {
        let status_code = StatusCode::from_u16(status).ok();
        Self {
            store,
            resources: None,
            status: status_code,
            source,
            headers: Vec::new(),
            order: None,
            predicates: RequestPredicates::new(),
            error: status_code.is_none().then_some(FixtureError::InvalidStatus(status)),
        }
    }

    /// Check at registration time that the fixture's resource exists.
    pub(crate) fn validated_against(mut self, resources: &'a FixtureResources) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Marker that starts the predicate section; does nothing.
    pub fn if_request_matches(self) -> Self {
        self
    }

    pub fn method_is(self, method: Method) -> Self {
        self.attach(Matcher::Method(MethodMatcher::Is(method)))
    }

    pub fn method_is_one_of(self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.attach(Matcher::Method(MethodMatcher::OneOf(
            methods.into_iter().collect(),
        )))
    }

    pub fn path_is(self, path: &str) -> Self {
        self.attach(Matcher::Path(StringMatcher::is(path)))
    }

    pub fn path_starts_with(self, prefix: &str) -> Self {
        self.attach(Matcher::Path(StringMatcher::starts_with(prefix)))
    }

    pub fn path_matches_regex(self, pattern: &str) -> Self {
        match StringMatcher::regex(pattern) {
            Ok(matcher) => self.attach(Matcher::Path(matcher)),
            Err(source) => self.fail(FixtureError::InvalidPattern {
                dimension: Dimension::Path,
                source,
            }),
        }
    }

    pub fn path_matches(self, matcher: StringMatcher) -> Self {
        self.attach(Matcher::Path(matcher))
    }

    pub fn queries_contain(self, key: &str, value: &str) -> Self {
        self.attach(Matcher::Query(MapMatcher::containing(key, value)))
    }

    pub fn queries_contain_key(self, key: &str) -> Self {
        self.attach(Matcher::Query(MapMatcher::containing_key(key)))
    }

    pub fn queries_matches(self, matcher: MapMatcher) -> Self {
        self.attach(Matcher::Query(matcher))
    }

    pub fn headers_contain(self, name: &str, value: &str) -> Self {
        self.attach(Matcher::Headers(MapMatcher::containing(name, value)))
    }

    pub fn headers_contain_key(self, name: &str) -> Self {
        self.attach(Matcher::Headers(MapMatcher::containing_key(name)))
    }

    pub fn headers_matches(self, matcher: MapMatcher) -> Self {
        self.attach(Matcher::Headers(matcher))
    }

    pub fn body_matches(self, matcher: StringMatcher) -> Self {
        self.attach(Matcher::Body(matcher))
    }

    pub fn body_is(self, body: &str) -> Self {
        self.attach(Matcher::Body(StringMatcher::is(body)))
    }

    pub fn body_contains(self, fragment: &str) -> Self {
        self.attach(Matcher::Body(StringMatcher::contains(fragment)))
    }

    pub fn body_json_eq(self, expected: serde_json::Value) -> Self {
        self.attach(Matcher::Body(StringMatcher::json_eq(expected)))
    }

    /// Explicit spelling of the default: the request must carry no body.
    pub fn has_empty_body(self) -> Self {
        self.attach(Matcher::Body(StringMatcher::empty()))
    }

    /// Priority among matching fixtures; lower values win. Fixtures without an
    /// order rank after every fixture that has one.
    pub fn order_is(mut self, order: i32) -> Self {
        if self.order.is_some() {
            return self.fail(FixtureError::DuplicateOrder);
        }
        self.order = Some(order);
        self
    }

    /// Add a header to the fixture's response.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Value for a `${key}` placeholder of a template fixture.
    pub fn with_value_for_key(mut self, key: &str, value: &str) -> Self {
        match &mut self.source {
            ResponseSource::Template { values, .. } => {
                values.insert(key.to_string(), value.to_string());
                self
            }
            other => {
                let name = other.to_string();
                self.fail(FixtureError::NotATemplate(name))
            }
        }
    }

    /// Finish the fixture and append it to the store.
    pub fn register(self) -> Result<Arc<Fixture>, FixtureError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let status = self
            .status
            .ok_or(FixtureError::InvalidStatus(0))?;

        if let (Some(resources), Some(name)) = (self.resources, self.source.resource_name()) {
            resources.ensure_exists(name)?;
        }

        let fixture = self.store.append(Fixture {
            sequence: 0,
            order: self.order,
            status,
            source: self.source,
            headers: self.headers,
            predicates: self.predicates,
        });
        debug!("Registered {}", fixture);
        Ok(fixture)
    }

    fn attach(mut self, matcher: Matcher) -> Self {
        if self.error.is_none() {
            if let Err(error) = self.predicates.insert(matcher) {
                self.error = Some(error);
            }
        }
        self
    }

    /// Keep the first configuration error; later ones are usually consequences.
    fn fail(mut self, error: FixtureError) -> Self {
        if self.error.is_none() {
            self.error = Some(error);
        }
        self
    }
}
