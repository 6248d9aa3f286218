//! The HTTP side of a request-matcher session.
//!
//! - `session`: `RequestMatcherServer`, binding, serve loop and verification
//! - `handler`: per-request capture, dispatch and failure responses

mod handler;
mod session;

pub use session::RequestMatcherServer;

use crate::error::AssertionFailure;
use crate::fixture::MatcherDispatcher;
use crate::request::IncomingRequest;
use crate::resource::FixtureResources;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};

/// State shared between the session handle and its connection tasks.
pub(crate) struct SessionState {
    pub dispatcher: MatcherDispatcher,
    pub resources: FixtureResources,
    /// Failures raised while serving, in arrival order
    pub failures: Mutex<Vec<AssertionFailure>>,
    pub received: RwLock<Vec<IncomingRequest>>,
    pub request_count: AtomicU64,
}

impl SessionState {
    pub fn new(dispatcher: MatcherDispatcher, resources: FixtureResources) -> Self {
        Self {
            dispatcher,
            resources,
            failures: Mutex::new(Vec::new()),
            received: RwLock::new(Vec::new()),
            request_count: AtomicU64::new(0),
        }
    }

    pub fn increment_request_count(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn record_request(&self, request: &IncomingRequest) {
        self.received.write().push(request.clone());
    }

    pub fn record_failure(&self, failure: AssertionFailure) {
        self.failures.lock().push(failure);
    }

    pub fn first_failure(&self) -> Option<AssertionFailure> {
        self.failures.lock().first().cloned()
    }
}
