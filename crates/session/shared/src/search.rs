//! Session search queries and discovered results.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// Default cap on the number of results a single search keeps.
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 100;

/// Occupied/total player slots as advertised by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCapacity {
    pub current: u16,
    pub max: u16,
}

impl PlayerCapacity {
    pub const fn new(current: u16, max: u16) -> Self {
        Self { current, max }
    }
}

/// Parameters of a session search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub max_results: usize,
    /// Scope discovery to presence-enabled sessions.
    pub presence_only: bool,
}

impl SearchQuery {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            presence_only: true,
        }
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SEARCH_RESULTS)
    }
}

/// One discovered session, in backend-reported order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub session_id: SessionId,
    pub server_name: String,
    /// Resolvable endpoint of the host, when the backend knows one.
    pub endpoint: Option<SocketAddr>,
    pub ping_ms: Option<u32>,
    pub capacity: Option<PlayerCapacity>,
}

impl SearchResult {
    /// A result is usable for joining when it points at something the
    /// backend can resolve an address for.
    pub fn is_valid(&self) -> bool {
        self.endpoint.is_some() && !self.server_name.is_empty()
    }
}

/// The current search: its query plus the (replaceable) result sequence.
///
/// A new search replaces the previous sequence wholesale; results are never
/// merged across searches.
#[derive(Debug, Clone)]
pub struct SessionSearch {
    pub query: SearchQuery,
    pub results: Vec<SearchResult>,
}

impl SessionSearch {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            results: Vec::new(),
        }
    }

    /// Stores freshly reported results, preserving backend order and
    /// truncating at the query's cap.
    pub fn populate(&mut self, mut results: Vec<SearchResult>) {
        results.truncate(self.query.max_results);
        self.results = results;
    }

    pub fn get(&self, index: usize) -> Option<&SearchResult> {
        self.results.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
