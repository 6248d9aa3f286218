//! Request handling for a running session.

use super::SessionState;
use crate::error::AssertionFailure;
use crate::request::IncomingRequest;
use crate::response::{build_response_with_headers, FAILURE_HEADER};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, warn};

/// Handle one request: capture it, dispatch it, and write the result.
///
/// Assertion failures are answered with `500` and the failure message, and
/// are kept for the end-of-session check. There is no fallback response.
pub(crate) async fn handle_request<B>(
    req: Request<B>,
    state: Arc<SessionState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Display,
{
    let count = state.increment_request_count();
    let target = format!("{} {}", req.method(), req.uri());

    let request = match IncomingRequest::from_hyper(req).await {
        Ok(request) => request,
        Err(e) => {
            let failure = AssertionFailure::UnreadableRequest {
                request: target,
                reason: e.to_string(),
            };
            warn!("{}", failure.single_line());
            let message = failure.to_string();
            state.record_failure(failure);
            return Ok(build_response_with_headers(
                StatusCode::BAD_REQUEST,
                [(FAILURE_HEADER, "true"), ("content-type", "text/plain")],
                message,
            ));
        }
    };
    debug!("Request #{}: {}", count, request.summary());
    state.record_request(&request);

    match state.dispatcher.dispatch(&request, &state.resources).await {
        Ok(descriptor) => Ok(descriptor.into_response()),
        Err(failure) => {
            let message = failure.to_string();
            state.record_failure(failure);
            Ok(build_response_with_headers(
                StatusCode::INTERNAL_SERVER_ERROR,
                [(FAILURE_HEADER, "true"), ("content-type", "text/plain")],
                message,
            ))
        }
    }
}
