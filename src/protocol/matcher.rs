//! Route matching logic.
//!
//! # Responsibilities
//! - Match a parsed URL against a registration's path shape
//! - Leave HTTP-method validation to the handler itself
//!
//! # Design Decisions
//! - Matching is structural only: a matcher accepts a `ParsedUrl` shape
//!   independent of method, so handlers can answer a precise "method not
//!   allowed" instead of a generic "not found"
//! - Exact segment comparison, no prefix or regex matching
//! - Matchers are immutable and evaluated read-only per request

use std::fmt;

use crate::protocol::url::ParsedUrl;

/// Trait for matching parsed request paths against route shapes.
pub trait RouteMatcher: Send + Sync + fmt::Debug {
    /// Returns true if the parsed URL has this route's shape.
    fn matches(&self, url: &ParsedUrl) -> bool;
}

/// Matches on the terminal "file" token, with or without a session prefix.
///
/// `/shutdown` and `/session/abc/shutdown` both match `FileMatcher::new("shutdown")`.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    file: &'static str,
}

impl FileMatcher {
    pub fn new(file: &'static str) -> Self {
        Self { file }
    }
}

impl RouteMatcher for FileMatcher {
    fn matches(&self, url: &ParsedUrl) -> bool {
        url.file.as_deref() == Some(self.file)
    }
}

/// Matches a single-segment command at the server root (no session prefix),
/// e.g. `/status`, `/session`, `/sessions`.
#[derive(Debug, Clone)]
pub struct RootCommandMatcher {
    commands: &'static [&'static str],
}

impl RootCommandMatcher {
    pub fn new(commands: &'static [&'static str]) -> Self {
        Self { commands }
    }
}

impl RouteMatcher for RootCommandMatcher {
    fn matches(&self, url: &ParsedUrl) -> bool {
        url.session_id.is_none()
            && url.resource.len() == 1
            && self.commands.contains(&url.resource[0].as_str())
    }
}

/// Matches `/session/{id}` paths whose resource segments equal one of a fixed
/// set of shapes (e.g. `[]`, `["url"]`, `["title"]`).
///
/// Session paths with an unknown resource shape deliberately match nothing,
/// so they fall through to the dispatcher's 404.
#[derive(Debug, Clone)]
pub struct SessionCommandMatcher {
    resources: &'static [&'static [&'static str]],
}

impl SessionCommandMatcher {
    pub fn new(resources: &'static [&'static [&'static str]]) -> Self {
        Self { resources }
    }
}

impl RouteMatcher for SessionCommandMatcher {
    fn matches(&self, url: &ParsedUrl) -> bool {
        if url.session_id.is_none() {
            return false;
        }
        let actual = url.resource_slice();
        self.resources.iter().any(|shape| actual == *shape)
    }
}
