//! A mock HTTP endpoint for tests.
//!
//! Register fixtures describing the requests a client under test should make,
//! let the client talk to the server, then verify every fixture was used:
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use hyper::Method;
//! use request_matcher::RequestMatcherServer;
//!
//! let server = RequestMatcherServer::start().await?;
//! server
//!     .add_fixture(200, "body.json")
//!     .if_request_matches()
//!     .method_is(Method::GET)
//!     .path_is("/get")
//!     .register()?;
//!
//! let body = reqwest::get(server.url("/get")).await?.text().await?;
//! assert!(body.contains("property"));
//! server.verify()?;
//! # Ok(())
//! # }
//! ```
//!
//! Each fixture answers exactly one request. Among fixtures matching a
//! request, the lowest explicit order wins, then the earliest registered.

pub mod config;
pub mod error;
pub mod fixture;
pub mod logging;
pub mod predicate;
pub mod request;
pub mod resource;
pub mod response;
pub mod server;

pub use config::SessionConfig;
pub use error::{AssertionFailure, FixtureError, ResourceError};
pub use fixture::{
    Fixture, FixtureEntry, FixtureStore, MatcherDispatcher, RequestMatcherBuilder, ResponseSource,
};
pub use predicate::{
    CustomMatcher, Dimension, MapMatcher, Matcher, MethodMatcher, RequestPredicates, StringMatcher,
};
pub use request::IncomingRequest;
pub use response::ResponseDescriptor;
pub use server::RequestMatcherServer;
