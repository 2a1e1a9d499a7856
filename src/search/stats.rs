//! Search statistics and performance metrics
//!
//! Tracks nodes searched, cutoffs and timing for progress reports.

use std::time::{Duration, Instant};

/// Search statistics
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Total nodes searched (main search and quiescence)
    pub nodes: u64,

    /// Quiescence nodes searched
    pub qsearch_nodes: u64,

    /// Beta cutoffs
    pub cutoffs: u64,

    /// Deepest ply reached from the root
    pub seldepth: usize,

    /// Search start time
    pub start_time: Option<Instant>,

    /// Time spent searching
    pub search_time: Duration,

    /// Nodes per second rate
    pub nps: u64,
}

impl SearchStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing
    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Update elapsed time and NPS
    pub fn update_timing(&mut self) {
        if let Some(start) = self.start_time {
            self.search_time = start.elapsed();
            let elapsed_ms = self.search_time.as_millis() as u64;
            if elapsed_ms > 0 {
                self.nps = (self.nodes * 1000) / elapsed_ms;
            }
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start_time
            .map_or(0, |start| start.elapsed().as_millis() as u64)
    }

    #[inline]
    pub fn inc_node(&mut self, ply: usize) {
        self.nodes += 1;
        if ply > self.seldepth {
            self.seldepth = ply;
        }
    }

    #[inline]
    pub fn inc_qsearch_node(&mut self) {
        self.qsearch_nodes += 1;
    }

    #[inline]
    pub fn inc_cutoff(&mut self) {
        self.cutoffs += 1;
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
