//! `RequestMatcherServer`: one mock endpoint bound for the length of a test.

use super::handler::handle_request;
use super::SessionState;
use crate::config::SessionConfig;
use crate::error::{AssertionFailure, ResourceError};
use crate::fixture::{FixtureStore, MatcherDispatcher, RequestMatcherBuilder, ResponseSource};
use crate::request::IncomingRequest;
use crate::resource::FixtureResources;
use crate::response::ResponseDescriptor;
use anyhow::Context;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// A running mock endpoint.
///
/// Register fixtures, point the client under test at [`url`](Self::url), then
/// call [`verify`](Self::verify). If the server is dropped unverified, the
/// check runs on drop and panics on failure (unless `verify_on_drop` is off).
pub struct RequestMatcherServer {
    address: SocketAddr,
    store: Arc<FixtureStore>,
    state: Arc<SessionState>,
    shutdown_tx: broadcast::Sender<()>,
    verify_on_drop: bool,
    verified: AtomicBool,
}

impl RequestMatcherServer {
    /// Start a session with configuration taken from the environment.
    pub async fn start() -> Result<Self, anyhow::Error> {
        Self::start_with(SessionConfig::from_env()?).await
    }

    /// Bind the listener and spawn the serve loop.
    pub async fn start_with(config: SessionConfig) -> Result<Self, anyhow::Error> {
        config.validate()?;

        let listener = TcpListener::bind((config.host.as_str(), config.port))
            .await
            .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
        let address = listener
            .local_addr()
            .context("failed to read bound address")?;
        info!("Request matcher bound to {}", address);

        let store = Arc::new(FixtureStore::new());
        let state = Arc::new(SessionState::new(
            MatcherDispatcher::new(Arc::clone(&store)),
            FixtureResources::new(config.fixtures_dir.clone()),
        ));

        let (shutdown_tx, _) = broadcast::channel(1);
        let mut shutdown_rx = shutdown_tx.subscribe();
        let serve_state = Arc::clone(&state);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, peer)) => {
                                let state = Arc::clone(&serve_state);
                                tokio::spawn(async move {
                                    let io = TokioIo::new(stream);
                                    let service = service_fn(move |req| {
                                        handle_request(req, Arc::clone(&state))
                                    });
                                    if let Err(e) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection error from {}: {}", peer, e);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Accept error on {}: {}", address, e);
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Request matcher on {} shutting down", address);
                        break;
                    }
                }
            }
        });

        Ok(Self {
            address,
            store,
            state,
            shutdown_tx,
            verify_on_drop: config.verify_on_drop,
            verified: AtomicBool::new(false),
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Absolute URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("http://{}{}", self.address, path)
        } else {
            format!("http://{}/{}", self.address, path)
        }
    }

    /// Serve a bundled resource with the given status.
    pub fn add_fixture(&self, status: u16, resource: &str) -> RequestMatcherBuilder<'_> {
        self.builder(status, ResponseSource::Resource(resource.to_string()))
    }

    /// Serve a bundled resource with `200 OK`.
    pub fn add_fixture_ok(&self, resource: &str) -> RequestMatcherBuilder<'_> {
        self.add_fixture(200, resource)
    }

    /// Serve a resource whose `${key}` placeholders are filled through
    /// [`RequestMatcherBuilder::with_value_for_key`].
    pub fn add_template(&self, status: u16, resource: &str) -> RequestMatcherBuilder<'_> {
        self.builder(
            status,
            ResponseSource::Template {
                name: resource.to_string(),
                values: Default::default(),
            },
        )
    }

    /// Serve a response defined entirely in code.
    pub fn add_response(&self, response: ResponseDescriptor) -> RequestMatcherBuilder<'_> {
        self.builder(response.status.as_u16(), ResponseSource::Inline(response))
    }

    fn builder(&self, status: u16, source: ResponseSource) -> RequestMatcherBuilder<'_> {
        RequestMatcherBuilder::new(&self.store, status, source)
            .validated_against(&self.state.resources)
    }

    /// Raw bytes of a bundled resource.
    pub fn read_binary_fixture(&self, name: &str) -> Result<Vec<u8>, ResourceError> {
        self.state.resources.read_binary(name)
    }

    /// A bundled resource as text.
    pub fn read_fixture(&self, name: &str) -> Result<String, ResourceError> {
        let bytes = self.read_binary_fixture(name)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn resources(&self) -> &FixtureResources {
        &self.state.resources
    }

    pub fn store(&self) -> &Arc<FixtureStore> {
        &self.store
    }

    pub fn dispatcher(&self) -> &MatcherDispatcher {
        &self.state.dispatcher
    }

    /// Number of requests received so far, matched or not.
    pub fn request_count(&self) -> u64 {
        self.state.request_count()
    }

    /// Every captured request, in arrival order.
    pub fn received_requests(&self) -> Vec<IncomingRequest> {
        self.state.received.read().clone()
    }

    /// End-of-session check.
    ///
    /// Reports the first failure raised while serving, otherwise fails if
    /// any registered fixture was never consumed.
    pub fn verify(&self) -> Result<(), AssertionFailure> {
        self.verified.store(true, Ordering::SeqCst);
        if let Some(failure) = self.state.first_failure() {
            return Err(failure);
        }
        self.store.assert_all_consumed()
    }
}

impl Drop for RequestMatcherServer {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());

        if !self.verify_on_drop
            || self.verified.load(Ordering::SeqCst)
            || std::thread::panicking()
        {
            return;
        }
        if let Err(failure) = self.verify() {
            panic!("{failure}");
        }
    }
}

impl std::fmt::Debug for RequestMatcherServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestMatcherServer")
            .field("address", &self.address)
            .field("fixtures", &self.store.len())
            .field("requests", &self.request_count())
            .finish()
    }
}
