//! Error types for fixture registration, resource lookup and request assertions.

use crate::predicate::Dimension;
use std::path::PathBuf;

/// The single failure kind surfaced to the owning test.
///
/// Raised while dispatching a request that no fixture accepts, or at the end of
/// the session when registered fixtures were never consumed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssertionFailure {
    #[error(
        "Failed assertion for request {request}\nClosest fixture: {fixture}\n{}",
        .failures.join("\n")
    )]
    NoMatchingFixture {
        /// Summary of the offending request (`METHOD /path?query`)
        request: String,
        /// Description of the best-candidate fixture
        fixture: String,
        /// One `"<dimension>Matcher = <description>"` line per failing predicate
        failures: Vec<String>,
    },

    #[error("Failed assertion for request {request}\nThere are no unused fixtures left to answer it.")]
    NoFixturesLeft { request: String },

    #[error(
        "Failed assertion. There are fixtures that were not used.\n{}",
        .fixtures.join("\n")
    )]
    UnusedFixtures { fixtures: Vec<String> },

    #[error("Failed to serve fixture resource '{resource}': {reason}")]
    ResourceUnavailable { resource: String, reason: String },

    #[error("Failed assertion for request {request}\nThe request body could not be read: {reason}")]
    UnreadableRequest { request: String, reason: String },
}

impl AssertionFailure {
    /// The message on a single line, with `; ` between its lines.
    pub fn single_line(&self) -> String {
        self.to_string().lines().collect::<Vec<_>>().join("; ")
    }
}

/// Configuration errors detected when a fixture is registered.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("a {} is already set on this fixture", .0.label())]
    DuplicateMatcher(Dimension),

    #[error("invalid pattern for {}: {source}", .dimension.label())]
    InvalidPattern {
        dimension: Dimension,
        #[source]
        source: regex::Error,
    },

    #[error("fixture resource is not available")]
    MissingResource(#[from] ResourceError),

    #[error("template values were given for '{0}', which is not a template fixture")]
    NotATemplate(String),

    #[error("invalid status code {0}")]
    InvalidStatus(u16),

    #[error("an explicit order is already set on this fixture")]
    DuplicateOrder,
}

/// Errors raised while resolving a bundled fixture resource.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("invalid resource name '{0}'")]
    InvalidName(String),

    #[error("resource '{name}' not found at {}", .path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("failed to read resource '{name}'")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}
