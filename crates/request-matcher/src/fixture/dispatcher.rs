//! Request dispatch against a [`FixtureStore`].

use super::store::FixtureStore;
use super::types::Fixture;
use crate::error::AssertionFailure;
use crate::request::IncomingRequest;
use crate::resource::FixtureResources;
use crate::response::ResponseDescriptor;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Selects and consumes the fixture that answers each request.
#[derive(Debug, Clone)]
pub struct MatcherDispatcher {
    store: Arc<FixtureStore>,
}

impl MatcherDispatcher {
    pub fn new(store: Arc<FixtureStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<FixtureStore> {
        &self.store
    }

    /// Find the winning fixture for a request and mark it consumed.
    ///
    /// Scanning, winner selection and consumption happen under one lock
    /// acquisition. No I/O is done while the lock is held.
    pub fn select(&self, request: &IncomingRequest) -> Result<Arc<Fixture>, AssertionFailure> {
        let mut entries = self.store.lock();

        let winner = entries
            .iter_mut()
            .filter(|entry| !entry.consumed && entry.fixture.predicates.matches(request))
            .min_by_key(|entry| entry.fixture.precedence());

        if let Some(entry) = winner {
            entry.consumed = true;
            let fixture = Arc::clone(&entry.fixture);
            drop(entries);
            debug!("Request {} matched {}", request.summary(), fixture);
            return Ok(fixture);
        }

        // Diagnostics come from the first unconsumed fixture only
        let failure = match entries.iter().find(|entry| !entry.consumed) {
            Some(candidate) => AssertionFailure::NoMatchingFixture {
                request: request.summary(),
                fixture: candidate.fixture.to_string(),
                failures: candidate.fixture.predicates.failures(request),
            },
            None => AssertionFailure::NoFixturesLeft {
                request: request.summary(),
            },
        };
        drop(entries);

        warn!("{}", failure.single_line());
        Err(failure)
    }

    /// Select a fixture and build its response.
    pub async fn dispatch(
        &self,
        request: &IncomingRequest,
        resources: &FixtureResources,
    ) -> Result<ResponseDescriptor, AssertionFailure> {
        let fixture = self.select(request)?;
        fixture
            .render(resources)
            .await
            .map_err(|err| Self::resource_failure(&fixture, err))
    }

    /// Blocking variant of [`dispatch`](Self::dispatch), for callers outside a runtime.
    pub fn dispatch_blocking(
        &self,
        request: &IncomingRequest,
        resources: &FixtureResources,
    ) -> Result<ResponseDescriptor, AssertionFailure> {
        let fixture = self.select(request)?;
        fixture
            .render_blocking(resources)
            .map_err(|err| Self::resource_failure(&fixture, err))
    }

    fn resource_failure(fixture: &Fixture, err: crate::error::ResourceError) -> AssertionFailure {
        error!("Failed to render {}: {}", fixture, err);
        AssertionFailure::ResourceUnavailable {
            resource: fixture
                .source
                .resource_name()
                .unwrap_or_default()
                .to_string(),
            reason: err.to_string(),
        }
    }
}
