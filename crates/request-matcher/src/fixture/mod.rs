//! Fixture registration and request dispatch.
//!
//! ## Module Structure
//!
//! - `types`: `Fixture`, `FixtureEntry` and `ResponseSource`
//! - `builder`: the fluent `RequestMatcherBuilder`
//! - `store`: `FixtureStore`, the ordered per-session store
//! - `dispatcher`: `MatcherDispatcher`, winner selection and diagnostics
//! - `response`: rendering a selected fixture into a `ResponseDescriptor`

mod builder;
mod dispatcher;
mod response;
mod store;
mod types;


pub use builder::RequestMatcherBuilder;
pub use dispatcher::MatcherDispatcher;
pub use store::FixtureStore;
pub use types::{Fixture, FixtureEntry, ResponseSource};
