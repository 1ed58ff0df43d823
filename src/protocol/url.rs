//! Request path decomposition.
//!
//! # Responsibilities
//! - Strip the query string
//! - Split the path into segments
//! - Extract a leading `/session/{id}` prefix
//! - Expose the terminal segment as the leaf-routing "file" token
//!
//! # Design Decisions
//! - Parsing is total: every path yields a `ParsedUrl`, never an error.
//!   Unknown shapes simply populate fewer optional fields; deciding that no
//!   route matches is the dispatcher's job, not the parser's.
//! - Pure function, no allocation beyond the owned segments; safe to call
//!   concurrently.

/// A request path decomposed for route matching.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedUrl {
    /// Session id from a leading `/session/{id}` prefix, if present.
    pub session_id: Option<String>,

    /// Path segments after the session prefix (or all segments when there is
    /// no session prefix).
    pub resource: Vec<String>,

    /// Terminal segment of the whole path, used for leaf-route matching
    /// (e.g. `shutdown`). `None` for the root path.
    pub file: Option<String>,
}

impl ParsedUrl {
    /// Decompose a raw request path.
    pub fn parse(path: &str) -> Self {
        let path = path.split('?').next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let file = segments.last().map(|s| s.to_string());

        let (session_id, rest) = match segments.as_slice() {
            ["session", id, rest @ ..] => (Some(id.to_string()), rest),
            _ => (None, segments.as_slice()),
        };

        Self {
            session_id,
            resource: rest.iter().map(|s| s.to_string()).collect(),
            file,
        }
    }

    /// Resource segments as borrowed strings, for exact-shape comparison.
    pub fn resource_slice(&self) -> Vec<&str> {
        self.resource.iter().map(String::as_str).collect()
    }
}
