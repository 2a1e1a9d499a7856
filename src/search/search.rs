//! Main search engine implementation for Alfiere
//!
//! Iterative deepening over a fail-hard negamax alpha-beta with quiescence,
//! check extension and a principal variation collected per node. The search
//! owns the board for its whole lifetime and rolls every move back with
//! `undo_move`, so the position is unchanged when it returns.

use super::params::SearchParams;
use super::stats::SearchStats;
use crate::board::{move_to_uci, Board, Move, MAX_GAME_PLY};
use crate::eval::{Evaluator, PsqtEvaluator};
use crate::movegen::{history_index, HistoryTable, HISTORY_MAX};
use log::debug;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const INFINITE: i32 = 30000;
pub const MATE: i32 = 29000;

/// Ceiling on plies from the root
pub const MAX_PLY: usize = 128;

/// Stop flag, deadline and node limit are polled once per this many nodes
const CHECK_INTERVAL: u64 = 2048;

#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() > MATE - MAX_PLY as i32
}

/// Protocol rendering of a score: `cp X`, or `mate N` in full moves (negative when mated)
pub fn format_score(score: i32) -> String {
    if is_mate_score(score) {
        let plies = MATE - score.abs();
        if score > 0 {
            format!("mate {}", (plies + 1) / 2)
        } else {
            format!("mate -{}", plies / 2)
        }
    } else {
        format!("cp {}", score)
    }
}

/// Outcome of a search: the last fully completed iteration
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    /// Depth of the iteration that produced this result (0 if none completed)
    pub depth: u32,
    pub pv: Vec<Move>,
    pub nodes: u64,
}

impl SearchResult {
    fn empty(best_move: Move, score: i32) -> Self {
        Self {
            best_move,
            score,
            depth: 0,
            pv: Vec::new(),
            nodes: 0,
        }
    }
}

/// Progress line emitted after each completed iteration
#[derive(Debug, Clone)]
pub struct SearchReport<'a> {
    pub depth: u32,
    pub seldepth: usize,
    pub score: i32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub pv: &'a [Move],
}

impl fmt::Display for SearchReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "info depth {} seldepth {} score {} nodes {} nps {} time {} pv",
            self.depth,
            self.seldepth,
            format_score(self.score),
            self.nodes,
            self.nps,
            self.time_ms
        )?;
        for mv in self.pv {
            write!(f, " {}", move_to_uci(*mv))?;
        }
        Ok(())
    }
}

/// Main search engine
pub struct Search<E: Evaluator = PsqtEvaluator> {
    /// The position being searched (mutated and restored during search)
    board: Board,

    /// Leaf scoring
    evaluator: E,

    /// Search limits
    params: SearchParams,

    /// Search statistics
    stats: SearchStats,

    /// Quiet-move ordering table, kept across searches of one game
    history: Box<HistoryTable>,

    /// External cancellation request
    stop_flag: Arc<AtomicBool>,

    deadline: Option<Instant>,

    /// Set once any limit fires; the running iteration is then discarded
    stopped: bool,
}

impl Search<PsqtEvaluator> {
    /// Create new search engine with the default evaluator
    pub fn new(board: Board, params: SearchParams) -> Self {
        Self::with_evaluator(board, params, PsqtEvaluator)
    }
}

impl<E: Evaluator> Search<E> {
    pub fn with_evaluator(board: Board, params: SearchParams, evaluator: E) -> Self {
        Self {
            board,
            evaluator,
            params,
            stats: SearchStats::new(),
            history: Box::new([[0; 64]; 64]),
            stop_flag: Arc::new(AtomicBool::new(false)),
            deadline: None,
            stopped: false,
        }
    }

    /// Share a stop flag with the caller
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = flag;
        self
    }

    /// Continue with an existing history table
    pub fn with_history(mut self, history: Box<HistoryTable>) -> Self {
        self.history = history;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn history(&self) -> &HistoryTable {
        &self.history
    }

    /// Hand the board and history table back to the owner
    pub fn into_parts(self) -> (Board, Box<HistoryTable>) {
        (self.board, self.history)
    }

    /// Run iterative deepening without progress output
    pub fn search(&mut self) -> SearchResult {
        self.run(|_| {})
    }

    /// Run iterative deepening, calling `on_iteration` after each completed depth
    pub fn run<F>(&mut self, mut on_iteration: F) -> SearchResult
    where
        F: FnMut(&SearchReport<'_>),
    {
        self.stats.reset();
        self.stats.start_timing();
        self.stopped = false;
        self.deadline = self
            .params
            .has_deadline()
            .then(|| Instant::now() + Duration::from_millis(self.params.time_limit_ms));

        let root_moves = self.board.generate_moves_with_history(&self.history);
        let Some(first) = root_moves.first() else {
            let score = if self.board.side_in_check() { -MATE } else { 0 };
            return SearchResult::empty(Move::NULL, score);
        };

        // Until depth 1 completes the first ordered move stands in
        let mut result = SearchResult::empty(first, 0);
        debug!(
            "search start: {} root moves, {:?}",
            root_moves.len(),
            self.params
        );

        let mut pv = Vec::with_capacity(MAX_PLY);
        for depth in 1..=self.params.max_depth {
            self.check_up();
            if self.stopped {
                break;
            }
            let score = self.alpha_beta(depth as i32, 0, -INFINITE, INFINITE, &mut pv);
            if self.stopped {
                debug!("iteration {} abandoned after {} nodes", depth, self.stats.nodes);
                break;
            }
            let Some(&best) = pv.first() else {
                break;
            };

            self.stats.update_timing();
            result = SearchResult {
                best_move: best,
                score,
                depth,
                pv: pv.clone(),
                nodes: self.stats.nodes,
            };
            let report = SearchReport {
                depth,
                seldepth: self.stats.seldepth,
                score,
                nodes: self.stats.nodes,
                nps: self.stats.nps,
                time_ms: self.stats.search_time.as_millis() as u64,
                pv: &result.pv,
            };
            debug!("{}", report);
            on_iteration(&report);

            // A mate inside the searched horizon cannot improve with depth
            if is_mate_score(score) && ((MATE - score.abs()) as u32) <= depth {
                break;
            }
        }

        result.nodes = self.stats.nodes;
        result
    }

    fn check_up(&mut self) {
        if self.stop_flag.load(Ordering::Relaxed) {
            self.stopped = true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.stopped = true;
            }
        }
        if self.params.node_limit > 0 && self.stats.nodes >= self.params.node_limit {
            self.stopped = true;
        }
    }

    #[inline]
    fn count_node(&mut self, ply: usize) {
        self.stats.inc_node(ply);
        if self.stats.nodes % CHECK_INTERVAL == 0 {
            self.check_up();
        }
    }

    #[inline]
    fn at_ceiling(&self, ply: usize) -> bool {
        ply >= MAX_PLY - 1 || self.board.ply() >= MAX_GAME_PLY - 1
    }

    fn alpha_beta(
        &mut self,
        depth: i32,
        ply: usize,
        mut alpha: i32,
        beta: i32,
        pv: &mut Vec<Move>,
    ) -> i32 {
        pv.clear();
        let in_check = self.board.side_in_check();
        let depth = if in_check { depth + 1 } else { depth };
        if depth <= 0 {
            return self.quiescence(ply, alpha, beta, pv);
        }

        self.count_node(ply);
        if self.stopped {
            return 0;
        }
        // The root always has to produce a move, so draws are only scored below it
        if ply > 0 && self.board.is_draw() {
            return 0;
        }
        if self.at_ceiling(ply) {
            return self.evaluator.evaluate(&self.board);
        }

        let moves = self.board.generate_moves_with_history(&self.history);
        if moves.is_empty() {
            return if in_check { -MATE + ply as i32 } else { 0 };
        }

        let mut child_pv = Vec::new();
        for &mv in &moves {
            self.board.make_move(mv);
            let score = -self.alpha_beta(depth - 1, ply + 1, -beta, -alpha, &mut child_pv);
            self.board.undo_move();

            if self.stopped {
                return 0;
            }
            if score >= beta {
                self.stats.inc_cutoff();
                return beta;
            }
            if score > alpha {
                alpha = score;
                if mv.is_quiet() {
                    let (from, to) = history_index(&mv);
                    let entry = &mut self.history[from][to];
                    *entry = (*entry + depth).min(HISTORY_MAX);
                }
                pv.clear();
                pv.push(mv);
                pv.extend_from_slice(&child_pv);
            }
        }
        alpha
    }

    fn quiescence(&mut self, ply: usize, mut alpha: i32, beta: i32, pv: &mut Vec<Move>) -> i32 {
        pv.clear();
        self.count_node(ply);
        self.stats.inc_qsearch_node();
        if self.stopped {
            return 0;
        }
        if ply > 0 && self.board.is_draw() {
            return 0;
        }

        let stand_pat = self.evaluator.evaluate(&self.board);
        if self.at_ceiling(ply) {
            return stand_pat;
        }
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let captures = self.board.generate_captures();
        let mut child_pv = Vec::new();
        for &mv in &captures {
            self.board.make_move(mv);
            let score = -self.quiescence(ply + 1, -beta, -alpha, &mut child_pv);
            self.board.undo_move();

            if self.stopped {
                return 0;
            }
            if score >= beta {
                self.stats.inc_cutoff();
                return beta;
            }
            if score > alpha {
                alpha = score;
                pv.clear();
                pv.push(mv);
                pv.extend_from_slice(&child_pv);
            }
        }
        alpha
    }
}
