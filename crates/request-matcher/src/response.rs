//! Response descriptors and hyper response construction.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use std::str::FromStr;

/// Marks responses produced for a failed request assertion.
pub const FAILURE_HEADER: &str = "x-request-matcher-failure";

/// What the transport writes back for a matched request.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDescriptor {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl ResponseDescriptor {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Shorthand for a `200 OK` descriptor.
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// First header with this name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Set the content type unless one is already present.
    pub fn with_default_content_type(self, content_type: &str) -> Self {
        if self.content_type().is_some() {
            self
        } else {
            self.with_header(CONTENT_TYPE.as_str(), content_type)
        }
    }

    /// Convert into a hyper response. Headers that are not valid HTTP are skipped.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = build_response(self.status, self.body);
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (HeaderName::from_str(name), HeaderValue::from_str(value))
            {
                response.headers_mut().append(name, value);
            }
        }
        response
    }
}

/// Build an HTTP response with a status and body.
pub fn build_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
}

/// Build an HTTP response with headers.
///
/// Falls back to a bare 500 if the headers cannot be encoded.
pub fn build_response_with_headers(
    status: StatusCode,
    headers: impl IntoIterator<Item = (impl AsRef<str>, impl AsRef<str>)>,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(status);
    for (key, value) in headers {
        builder = builder.header(key.as_ref(), value.as_ref());
    }
    builder
        .body(Full::new(body.into()))
        .unwrap_or_else(|_| build_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"))
}
