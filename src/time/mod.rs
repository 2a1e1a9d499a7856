//! Time management helper for Alfiere

use crate::board::Color;

/// Moves assumed left in the game when the GUI does not say
pub const DEFAULT_MOVES_TO_GO: u64 = 30;

/// Default safety margin subtracted from every allocation
pub const DEFAULT_MOVE_OVERHEAD: u64 = 50;

/// Shortest budget ever handed to the search
pub const MIN_THINK_MS: u64 = 10;

/// Clock fields of a `go` command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeControl {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u64>,
    pub movetime: Option<u64>,
}

impl TimeControl {
    /// True when any field bounds the search by time
    pub fn is_timed(&self) -> bool {
        self.movetime.is_some() || self.wtime.is_some() || self.btime.is_some()
    }
}

pub struct TimeManager {
    pub move_overhead: u64,
}

impl Default for TimeManager {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_OVERHEAD)
    }
}

impl TimeManager {
    pub fn new(move_overhead: u64) -> Self {
        Self { move_overhead }
    }

    /// Milliseconds to think for `side`, or `None` when the search is not time bounded
    pub fn allocate_time(&self, tc: &TimeControl, side: Color) -> Option<u64> {
        if let Some(mt) = tc.movetime {
            return Some(mt.saturating_sub(self.move_overhead).max(MIN_THINK_MS));
        }

        let (time, inc) = match side {
            Color::White => (tc.wtime?, tc.winc.unwrap_or(0)),
            Color::Black => (tc.btime?, tc.binc.unwrap_or(0)),
        };
        let moves_to_go = tc.movestogo.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);

        let budget = (time / moves_to_go + inc).saturating_sub(self.move_overhead);
        // never plan to spend more than what is actually left on the clock
        let ceiling = time.saturating_sub(self.move_overhead);
        Some(budget.min(ceiling).max(MIN_THINK_MS))
    }
}
