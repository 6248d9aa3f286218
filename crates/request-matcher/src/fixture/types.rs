//! Fixture definitions and the store-owned consumption wrapper.

use crate::predicate::RequestPredicates;
use crate::response::ResponseDescriptor;
use hyper::StatusCode;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Where a fixture's response body comes from.
#[derive(Debug, Clone)]
pub enum ResponseSource {
    /// Bundled resource served verbatim
    Resource(String),
    /// Bundled resource with `${key}` placeholders
    Template {
        name: String,
        values: BTreeMap<String, String>,
    },
    /// Fully specified response, no resource involved
    Inline(ResponseDescriptor),
}

impl ResponseSource {
    /// Logical resource name, if the source reads one.
    pub fn resource_name(&self) -> Option<&str> {
        match self {
            ResponseSource::Resource(name) | ResponseSource::Template { name, .. } => {
                Some(name.as_str())
            }
            ResponseSource::Inline(_) => None,
        }
    }
}

impl fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseSource::Resource(name) => f.write_str(name),
            ResponseSource::Template { name, .. } => write!(f, "template {name}"),
            ResponseSource::Inline(_) => f.write_str("inline response"),
        }
    }
}

/// An immutable fixture: response description, predicate set and ordering.
///
/// Consumption state lives in [`FixtureEntry`], so a fixture value can be
/// inspected or shared freely.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub(crate) sequence: u64,
    pub(crate) order: Option<i32>,
    pub(crate) status: StatusCode,
    pub(crate) source: ResponseSource,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) predicates: RequestPredicates,
}

impl Fixture {
    /// Insertion index within the owning store.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn order(&self) -> Option<i32> {
        self.order
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn source(&self) -> &ResponseSource {
        &self.source
    }

    /// Extra response headers configured on the fixture.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn predicates(&self) -> &RequestPredicates {
        &self.predicates
    }

    /// Sort key for winner selection: explicit orders first (ascending),
    /// then fixtures without one; insertion order breaks ties.
    pub(crate) fn precedence(&self) -> (bool, i32, u64) {
        (
            self.order.is_none(),
            self.order.unwrap_or_default(),
            self.sequence,
        )
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fixture #{} ({} {}",
            self.sequence,
            self.status.as_u16(),
            self.source
        )?;
        if let Some(order) = self.order {
            write!(f, ", order {order}")?;
        }
        f.write_str(")")?;

        let matchers: Vec<String> = self.predicates.iter().map(ToString::to_string).collect();
        write!(f, " where {}", matchers.join(", "))
    }
}

/// Store-owned wrapper pairing a fixture with its consumption flag.
///
/// `consumed` flips to true once, when the dispatcher selects the entry.
#[derive(Debug, Clone)]
pub struct FixtureEntry {
    pub(crate) fixture: Arc<Fixture>,
    pub(crate) consumed: bool,
}

impl FixtureEntry {
    pub(crate) fn new(fixture: Arc<Fixture>) -> Self {
        Self {
            fixture,
            consumed: false,
        }
    }

    pub fn fixture(&self) -> &Arc<Fixture> {
        &self.fixture
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}
