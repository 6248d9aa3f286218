//! Request predicates.
//!
//! Each fixture carries at most one [`Matcher`] per request [`Dimension`]
//! (method, path, query, headers, body). A matcher is a small tagged variant
//! that can both evaluate a request and describe itself; descriptions end up
//! verbatim in assertion failures, so they are kept stable.
//!
//! # Module Structure
//!
//! - `string_matcher` - String predicates for path and body (`is`, containing, regex, ...)
//! - `field_matcher` - Map predicates for query parameters and headers
//! - `method_matcher` - HTTP method predicates
//! - `dimension` - `Dimension`, the `Matcher` variant and the per-fixture `RequestPredicates`

mod dimension;
mod field_matcher;
mod method_matcher;
mod string_matcher;

pub use dimension::{Dimension, Matcher, RequestPredicates};
pub use field_matcher::MapMatcher;
pub use method_matcher::MethodMatcher;
pub use string_matcher::{CustomMatcher, StringMatcher};
