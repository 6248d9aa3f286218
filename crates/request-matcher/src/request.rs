//! Inbound request capture.
//!
//! The body is collected once into a [`Bytes`] buffer when the request is
//! received, so matchers and the response step can read it any number of
//! times without exhausting it.

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::{Method, Request};
use std::borrow::Cow;
use std::collections::HashMap;

/// A fully buffered request, as seen by the matcher dispatcher.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub path: String,
    /// Decoded query parameters. Repeated keys keep the last value.
    pub query: HashMap<String, String>,
    /// Header map keyed by lower-cased header name. Repeated headers keep the last value.
    pub headers: HashMap<String, String>,
    pub body: Bytes,
    raw_query: Option<String>,
}

impl IncomingRequest {
    /// Create a request from a method and a `path?query` target.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, raw_query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (target, None),
        };

        Self {
            method,
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            query: raw_query.map(parse_query_string).unwrap_or_default(),
            headers: HashMap::new(),
            body: Bytes::new(),
            raw_query: raw_query.filter(|q| !q.is_empty()).map(str::to_string),
        }
    }

    /// Add a header (name is stored lower-cased).
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Capture a hyper request, buffering its body.
    pub async fn from_hyper<B>(req: Request<B>) -> Result<Self, B::Error>
    where
        B: Body,
    {
        let (parts, body) = req.into_parts();
        let body = body.collect().await?.to_bytes();

        let headers = parts
            .headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();

        let raw_query = parts.uri.query().filter(|q| !q.is_empty());

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: raw_query.map(parse_query_string).unwrap_or_default(),
            headers,
            body,
            raw_query: raw_query.map(str::to_string),
        })
    }

    /// Look up a header by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The body decoded as UTF-8 (lossy). Reading it does not consume the buffer.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Short `METHOD /path?query` form used in diagnostics and logs.
    pub fn summary(&self) -> String {
        match &self.raw_query {
            Some(query) => format!("{} {}?{}", self.method, self.path, query),
            None => format!("{} {}", self.method, self.path),
        }
    }
}

/// Parse a raw query string into a map, URL-decoding keys and values.
///
/// Keys without `=` map to an empty value; a repeated key keeps its last value.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in query.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_component(key), decode_component(value));
    }
    params
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    #[test]
    fn test_parse_query_string() {
        let parsed = parse_query_string("name=alice&age=30&flag");
        assert_eq!(parsed.get("name"), Some(&"alice".to_string()));
        assert_eq!(parsed.get("age"), Some(&"30".to_string()));
        assert_eq!(parsed.get("flag"), Some(&String::new()));
    }

    #[test]
    fn test_parse_query_string_decodes_and_last_wins() {
        let parsed = parse_query_string("q=a%2Cb&q=hello+world&k%20y=v");
        assert_eq!(parsed.get("q"), Some(&"hello world".to_string()));
        assert_eq!(parsed.get("k y"), Some(&"v".to_string()));
    }

    #[test]
    fn test_new_splits_target() {
        let req = IncomingRequest::new(Method::GET, "/get?key=value");
        assert_eq!(req.path, "/get");
        assert_eq!(req.query.get("key"), Some(&"value".to_string()));
        assert_eq!(req.summary(), "GET /get?key=value");

        let bare = IncomingRequest::new(Method::POST, "/post");
        assert!(bare.query.is_empty());
        assert_eq!(bare.summary(), "POST /post");
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let req = IncomingRequest::new(Method::GET, "/").with_header("X-Api-Key", "secret");
        assert_eq!(req.header("x-api-key"), Some("secret"));
        assert_eq!(req.header("X-API-KEY"), Some("secret"));
        assert_eq!(req.header("missing"), None);
    }

    #[tokio::test]
    async fn test_from_hyper_buffers_body() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("http://localhost/body/0?key=value")
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from_static(b"{\"key\" : 0}")))
            .unwrap();

        let captured = IncomingRequest::from_hyper(req).await.unwrap();
        assert_eq!(captured.method, Method::POST);
        assert_eq!(captured.path, "/body/0");
        assert_eq!(captured.query.get("key"), Some(&"value".to_string()));
        assert_eq!(captured.header("content-type"), Some("application/json"));

        // Reading the body twice yields the same bytes both times
        assert_eq!(captured.body_text(), "{\"key\" : 0}");
        assert_eq!(captured.body_text(), "{\"key\" : 0}");
        assert_eq!(captured.body.len(), 11);
    }
}
