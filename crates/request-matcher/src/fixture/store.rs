//! The per-session fixture store.

use super::builder::RequestMatcherBuilder;
use super::types::{Fixture, FixtureEntry, ResponseSource};
use crate::error::AssertionFailure;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tracing::debug;

/// Ordered collection of fixtures registered for one test.
///
/// Registration and dispatch share the same lock, so a fixture is either
/// visible to a request in full or not at all.
#[derive(Debug, Default)]
pub struct FixtureStore {
    entries: Mutex<Vec<FixtureEntry>>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a fixture served from a bundled resource.
    pub fn add_fixture(&self, status: u16, resource: &str) -> RequestMatcherBuilder<'_> {
        RequestMatcherBuilder::new(self, status, ResponseSource::Resource(resource.to_string()))
    }

    /// Append a finished fixture, assigning its insertion sequence.
    pub(crate) fn append(&self, mut fixture: Fixture) -> Arc<Fixture> {
        let mut entries = self.entries.lock();
        fixture.sequence = entries.len() as u64;
        let fixture = Arc::new(fixture);
        entries.push(FixtureEntry::new(Arc::clone(&fixture)));
        fixture
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Snapshot of every registered fixture with its consumption flag.
    pub fn fixtures(&self) -> Vec<FixtureEntry> {
        self.entries.lock().clone()
    }

    /// Fixtures not yet consumed, in insertion order.
    pub fn unconsumed(&self) -> Vec<Arc<Fixture>> {
        self.entries
            .lock()
            .iter()
            .filter(|e| !e.consumed)
            .map(|e| Arc::clone(&e.fixture))
            .collect()
    }

    pub fn consumed_count(&self) -> usize {
        self.entries.lock().iter().filter(|e| e.consumed).count()
    }

    /// Teardown check: every registered fixture must have been consumed.
    pub fn assert_all_consumed(&self) -> Result<(), AssertionFailure> {
        let fixtures = self.fixtures();
        let unused: Vec<String> = fixtures
            .iter()
            .filter(|entry| !entry.is_consumed())
            .map(|entry| entry.fixture().to_string())
            .collect();

        if unused.is_empty() {
            debug!("All {} fixtures consumed", fixtures.len());
            Ok(())
        } else {
            Err(AssertionFailure::UnusedFixtures { fixtures: unused })
        }
    }

    /// Exclusive access for the dispatcher's select-and-consume step.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Vec<FixtureEntry>> {
        self.entries.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_assigns_sequence() {
        let store = FixtureStore::new();
        let first = store.add_fixture(200, "a.json").register().unwrap();
        let second = store.add_fixture(200, "b.json").register().unwrap();

        assert_eq!(first.sequence(), 0);
        assert_eq!(second.sequence(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.consumed_count(), 0);
    }

    #[test]
    fn test_empty_store_passes_teardown() {
        let store = FixtureStore::new();
        assert!(store.is_empty());
        assert!(store.assert_all_consumed().is_ok());
    }

    #[test]
    fn test_teardown_lists_unconsumed_fixtures() {
        let store = FixtureStore::new();
        store
            .add_fixture(200, "body.json")
            .if_request_matches()
            .path_is("/get")
            .register()
            .unwrap();

        let err = store.assert_all_consumed().unwrap_err();
        match err {
            AssertionFailure::UnusedFixtures { fixtures } => {
                assert_eq!(fixtures.len(), 1);
                assert_eq!(
                    fixtures[0],
                    r#"fixture #0 (200 body.json) where pathMatcher = is "/get", bodyMatcher = (null or an empty string)"#
                );
            }
            other => panic!("unexpected failure {other:?}"),
        }
    }

    #[test]
    fn test_teardown_skips_consumed_fixtures() {
        let store = FixtureStore::new();
        store.add_fixture(200, "a.json").path_is("/a").register().unwrap();
        store.add_fixture(200, "b.json").path_is("/b").register().unwrap();
        store.lock()[0].consumed = true;

        let snapshot = store.fixtures();
        assert!(snapshot[0].is_consumed());
        assert!(!snapshot[1].is_consumed());

        match store.assert_all_consumed().unwrap_err() {
            AssertionFailure::UnusedFixtures { fixtures } => {
                assert_eq!(fixtures.len(), 1);
                assert!(fixtures[0].starts_with("fixture #1 (200 b.json)"));
            }
            other => panic!("unexpected failure {other:?}"),
        }
    }
}
