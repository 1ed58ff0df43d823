//! Write-once response sink.
//!
//! # Responsibilities
//! - Buffer status, headers and body for one response
//! - Enforce the write-once-then-closed lifecycle
//! - Derive `Content-Length` from the actual body bytes on close
//!
//! # Design Decisions
//! - Any mutation after `close` fails with a typed `SinkError`; a second
//!   `close` is a defect, not a no-op
//! - `Content-Length` is always derived at close time, never hand-set, so a
//!   declared length can never drift from the body
//! - Converting an unclosed sink into a response yields a generic 500 rather
//!   than a half-written reply

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use thiserror::Error;

use crate::protocol::errors::ProtocolError;

/// Misuse of the sink lifecycle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    /// A mutation was attempted after `close`, or `close` was called twice.
    #[error("response sink is already closed")]
    AlreadyClosed,

    /// Header name or value was not valid HTTP.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

impl From<SinkError> for ProtocolError {
    fn from(err: SinkError) -> Self {
        ProtocolError::unexpected(format!("response sink misuse: {err}"))
    }
}

/// Buffered destination for exactly one HTTP response.
#[derive(Debug)]
pub struct ResponseSink {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    closed: bool,
}

impl ResponseSink {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            closed: false,
        }
    }

    fn ensure_open(&self) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::AlreadyClosed);
        }
        Ok(())
    }

    pub fn set_status(&mut self, status: StatusCode) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.status = status;
        Ok(())
    }

    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), SinkError> {
        self.ensure_open()?;
        let name: HeaderName = name
            .parse()
            .map_err(|_| SinkError::InvalidHeader(name.to_string()))?;
        let value: HeaderValue = value
            .parse()
            .map_err(|_| SinkError::InvalidHeader(name.to_string()))?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Append bytes to the buffered body.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.body.extend_from_slice(bytes);
        Ok(())
    }

    /// Finalize the response. Derives `Content-Length` from the buffered
    /// body and seals the sink against further mutation.
    pub fn close(&mut self) -> Result<(), SinkError> {
        self.ensure_open()?;
        let len = HeaderValue::from_str(&self.body.len().to_string())
            .map_err(|_| SinkError::InvalidHeader(header::CONTENT_LENGTH.to_string()))?;
        self.headers.insert(header::CONTENT_LENGTH, len);
        self.closed = true;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consume the sink into the outgoing response. A sink that was never
    /// closed is a handler defect and becomes a bare 500.
    pub fn into_response(self) -> Response {
        if !self.closed {
            tracing::error!("response sink was never closed, emitting 500");
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header(header::CONTENT_LENGTH, "0")
                .body(Body::empty())
                .expect("static 500 response");
        }

        let mut response = Response::builder().status(self.status);
        if let Some(headers) = response.headers_mut() {
            *headers = self.headers;
        }
        response
            .body(Body::from(self.body))
            .expect("buffered response")
    }
}

impl Default for ResponseSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_rejected_after_close() {
        let mut sink = ResponseSink::new();
        sink.set_status(StatusCode::OK).unwrap();
        sink.write(b"hello").unwrap();
        sink.close().unwrap();

        assert_eq!(sink.write(b"more"), Err(SinkError::AlreadyClosed));
        assert_eq!(
            sink.set_header("X-Late", "1"),
            Err(SinkError::AlreadyClosed)
        );
        assert_eq!(
            sink.set_status(StatusCode::NOT_FOUND),
            Err(SinkError::AlreadyClosed)
        );
    }

    #[test]
    fn second_close_is_a_defect() {
        let mut sink = ResponseSink::new();
        sink.close().unwrap();
        assert_eq!(sink.close(), Err(SinkError::AlreadyClosed));
    }

    #[test]
    fn content_length_is_derived_from_body() {
        let mut sink = ResponseSink::new();
        sink.write(b"<html><body>Closing...</body></html>").unwrap();
        sink.close().unwrap();

        assert_eq!(
            sink.headers().get(header::CONTENT_LENGTH).unwrap(),
            "36"
        );
    }

    #[test]
    fn derived_length_tracks_multiple_writes() {
        let mut sink = ResponseSink::new();
        sink.write(b"abc").unwrap();
        sink.write(b"defg").unwrap();
        sink.close().unwrap();

        assert_eq!(sink.headers().get(header::CONTENT_LENGTH).unwrap(), "7");
        assert_eq!(sink.body(), b"abcdefg");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let mut sink = ResponseSink::new();
        assert!(matches!(
            sink.set_header("bad header\n", "x"),
            Err(SinkError::InvalidHeader(_))
        ));
    }

    #[test]
    fn unclosed_sink_becomes_bare_500() {
        let sink = ResponseSink::new();
        let response = sink.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn closed_sink_converts_with_status_headers_and_body() {
        let mut sink = ResponseSink::new();
        sink.set_status(StatusCode::OK).unwrap();
        sink.set_header("Content-Type", "text/html;charset=UTF-8")
            .unwrap();
        sink.write(b"ok").unwrap();
        sink.close().unwrap();

        let response = sink.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html;charset=UTF-8"
        );
        assert_eq!(response.headers().get(header::CONTENT_LENGTH).unwrap(), "2");
    }
}
