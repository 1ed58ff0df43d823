//! Immutable incoming request.
//!
//! # Responsibilities
//! - Carry method, raw path, headers and body for one request
//! - Hold the derived `ParsedUrl` so routing never re-parses
//! - Decode the JSON payload for commands that carry one
//!
//! # Design Decisions
//! - Immutable once constructed; owned exclusively by the dispatch call
//!   processing it
//! - Header lookup is case-insensitive via `http::HeaderMap`

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method};

use crate::protocol::errors::ProtocolError;
use crate::protocol::url::ParsedUrl;

/// One HTTP request as seen by the dispatch core.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    url: ParsedUrl,
}

impl IncomingRequest {
    pub fn new(method: Method, path: impl Into<String>, headers: HeaderMap, body: Bytes) -> Self {
        let path = path.into();
        let url = ParsedUrl::parse(&path);
        Self {
            method,
            path,
            headers,
            body,
            url,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn url(&self) -> &ParsedUrl {
        &self.url
    }

    /// Content-Type header value, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Decode the body as a JSON value. Empty bodies decode to `null`.
    pub fn json_body(&self) -> Result<serde_json::Value, ProtocolError> {
        if self.body.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&self.body)
            .map_err(|e| ProtocolError::invalid_argument(format!("malformed JSON body: {e}")))
    }
}
