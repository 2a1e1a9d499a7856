//! Search parameters and configuration
//!
//! Limits that bound one search: depth, wall-clock time and node count.

use super::search::MAX_PLY;

/// Deepest iteration the driver will start
pub const MAX_SEARCH_DEPTH: u32 = 64;

/// Search parameters for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Maximum search depth in plies
    pub max_depth: u32,

    /// Time limit in milliseconds (0 = unlimited)
    pub time_limit_ms: u64,

    /// Node limit (0 = unlimited)
    pub node_limit: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_depth: MAX_SEARCH_DEPTH,
            time_limit_ms: 0,
            node_limit: 0,
        }
    }
}

impl SearchParams {
    /// Create new search params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum depth in plies, clamped to 1..=64
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth.clamp(1, MAX_SEARCH_DEPTH.min(MAX_PLY as u32));
        self
    }

    /// Set time limit in milliseconds
    pub fn time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Set node limit
    pub fn node_limit(mut self, limit: u64) -> Self {
        self.node_limit = limit;
        self
    }

    pub fn has_deadline(&self) -> bool {
        self.time_limit_ms > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_limits() {
        let p = SearchParams::new().max_depth(6).time_limit(1500).node_limit(10_000);
        assert_eq!(p.max_depth, 6);
        assert_eq!(p.time_limit_ms, 1500);
        assert_eq!(p.node_limit, 10_000);
        assert!(p.has_deadline());
    }

    #[test]
    fn depth_is_clamped() {
        assert_eq!(SearchParams::new().max_depth(0).max_depth, 1);
        assert_eq!(SearchParams::new().max_depth(500).max_depth, MAX_SEARCH_DEPTH);
        assert!(!SearchParams::default().has_deadline());
    }
}
