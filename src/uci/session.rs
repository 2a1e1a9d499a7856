//! UCI session state and event loop for Alfiere
//!
//! The session owns the position and the move-ordering history between
//! searches. `go` moves both into a background [`SearchThread`]; any later
//! command that reads or changes them first stops and joins that thread,
//! which hands them back.

use super::options::{UciOptions, ALL_OPTIONS};
use super::parser::{parse_uci_command, GoParams, UciCommand};
use crate::board::{move_to_uci, Board};
use crate::eval::evaluate;
use crate::movegen::HistoryTable;
use crate::perft::divide;
use crate::search::params::MAX_SEARCH_DEPTH;
use crate::search::{Search, SearchParams, SearchResult, SearchThread};
use crate::time::TimeManager;
use log::{debug, info, warn};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

/// Destination for protocol output lines
pub type OutputSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Sink writing each line to stdout and flushing immediately
pub fn stdout_sink() -> OutputSink {
    Arc::new(|line: &str| {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    })
}

fn empty_history() -> Box<HistoryTable> {
    Box::new([[0; 64]; 64])
}

pub struct UciEngine {
    board: Board,
    history: Box<HistoryTable>,
    options: UciOptions,
    /// Outstanding search; while set, `board` and `history` belong to it
    search: Option<SearchThread>,
    sink: OutputSink,
    running: bool,
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UciEngine {
    pub fn new() -> Self {
        Self::with_sink(stdout_sink())
    }

    /// Engine whose asynchronous output (search info, bestmove) goes to `sink`
    pub fn with_sink(sink: OutputSink) -> Self {
        Self {
            board: Board::startpos(),
            history: empty_history(),
            options: UciOptions::default(),
            search: None,
            sink,
            running: true,
        }
    }

    pub fn with_options(mut self, options: UciOptions) -> Self {
        self.options = options;
        self
    }

    /// Current position; only meaningful while no search is running
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn options(&self) -> &UciOptions {
        &self.options
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True while a search thread is still working
    pub fn is_searching(&self) -> bool {
        self.search.as_ref().is_some_and(|s| !s.is_finished())
    }

    /// Cancel any outstanding search and take the position back
    pub fn stop_search(&mut self) {
        if let Some(thread) = self.search.take() {
            debug!("stopping search");
            let parts = thread.stop();
            self.reclaim(parts);
        }
    }

    /// Wait for the outstanding search to finish on its own limits
    pub fn wait_for_search(&mut self) {
        if let Some(thread) = self.search.take() {
            let parts = thread.join();
            self.reclaim(parts);
        }
    }

    fn reclaim(&mut self, parts: Option<(Search, SearchResult)>) {
        match parts {
            Some((search, _)) => {
                let (board, history) = search.into_parts();
                self.board = board;
                self.history = history;
            }
            None => {
                warn!("search thread lost the position, resetting to the start position");
                self.board = Board::startpos();
                self.history = empty_history();
            }
        }
    }

    pub fn handle_command(&mut self, cmd: UciCommand) -> Vec<String> {
        let mut res = Vec::new();
        match cmd {
            UciCommand::Uci => {
                res.push(format!("id name Alfiere {}", env!("CARGO_PKG_VERSION")));
                res.push("id author the Alfiere developers".to_string());
                for opt in ALL_OPTIONS.iter() {
                    res.push(opt.declaration());
                }
                res.push("uciok".to_string());
            }
            UciCommand::IsReady => {
                res.push("readyok".to_string());
            }
            UciCommand::SetOption { name, value } => {
                self.stop_search();
                match self.options.set_option(&name, value.as_deref()) {
                    Ok(()) => info!("option {} set to {:?}", name, value),
                    Err(e) => {
                        warn!("setoption failed: {}", e);
                        res.push(format!("info string {}", e));
                    }
                }
            }
            UciCommand::UciNewGame => {
                self.stop_search();
                self.board = Board::startpos();
                self.history = empty_history();
            }
            UciCommand::Position { fen, moves } => {
                self.stop_search();
                self.set_position(fen.as_deref(), &moves, &mut res);
            }
            UciCommand::Go(go) => {
                self.stop_search();
                self.start_search(&go);
            }
            UciCommand::Stop => {
                self.stop_search();
            }
            UciCommand::Quit => {
                self.stop_search();
                self.running = false;
            }
            UciCommand::Display => {
                self.stop_search();
                res.extend(self.board.to_string().lines().map(str::to_string));
                res.push(format!("Fen: {}", self.board.to_fen()));
                res.push(format!("Key: {:016x}", self.board.position_hash()));
                res.push(format!("Eval: {}", evaluate(&self.board)));
                let legal: Vec<String> = self
                    .board
                    .generate_moves()
                    .iter()
                    .map(|m| move_to_uci(*m))
                    .collect();
                res.push(format!("Legal moves: {}", legal.join(" ")));
            }
            UciCommand::Perft(depth) => {
                self.stop_search();
                let start = Instant::now();
                let parts = divide(&mut self.board, depth);
                let total: u64 = parts.iter().map(|(_, n)| n).sum();
                for (mv, nodes) in parts {
                    res.push(format!("{}: {}", mv, nodes));
                }
                res.push(format!(
                    "Nodes searched: {} ({} ms)",
                    total,
                    start.elapsed().as_millis()
                ));
            }
            UciCommand::MakeMove(mv) => {
                self.stop_search();
                if let Err(e) = self.board.apply_uci_move(&mv) {
                    res.push(format!("info string {}", e));
                }
            }
            UciCommand::Undo => {
                self.stop_search();
                if self.board.ply() > 0 {
                    self.board.undo_move();
                } else {
                    res.push("info string no move to undo".to_string());
                }
            }
            UciCommand::Unknown(s) => {
                if !s.is_empty() {
                    debug!("unknown command: {}", s);
                    res.push(format!("info string unknown command: {}", s));
                }
            }
        }
        res
    }

    // A bad FEN keeps the previous position; a bad move is skipped
    fn set_position(&mut self, fen: Option<&str>, moves: &[String], res: &mut Vec<String>) {
        let mut board = match fen {
            None => Board::startpos(),
            Some(f) => match Board::from_fen(f) {
                Ok(b) => b,
                Err(e) => {
                    warn!("rejected FEN '{}': {}", f, e);
                    res.push(format!("info string invalid FEN: {}", e));
                    return;
                }
            },
        };
        for mv in moves {
            if let Err(e) = board.apply_uci_move(mv) {
                warn!("skipping move {}: {}", mv, e);
                res.push(format!("info string skipped move {}: {}", mv, e));
            }
        }
        self.board = board;
    }

    fn start_search(&mut self, go: &GoParams) {
        let budget = if go.infinite {
            None
        } else {
            TimeManager::new(self.options.move_overhead).allocate_time(&go.time, self.board.side)
        };
        // A bare `go` is bounded by the configured depth
        let bounded_elsewhere = go.infinite || budget.is_some() || go.nodes.is_some();
        let depth = go.depth.unwrap_or(if bounded_elsewhere {
            MAX_SEARCH_DEPTH
        } else {
            self.options.default_depth
        });

        let params = SearchParams::new()
            .max_depth(depth)
            .time_limit(budget.unwrap_or(0))
            .node_limit(go.nodes.unwrap_or(0));
        info!("go: {:?} (budget {:?} ms)", params, budget);

        let board = std::mem::take(&mut self.board);
        let history = std::mem::replace(&mut self.history, empty_history());
        let search = Search::new(board, params).with_history(history);

        let report_sink = Arc::clone(&self.sink);
        let result_sink = Arc::clone(&self.sink);
        self.search = Some(SearchThread::spawn(
            search,
            go.infinite,
            move |report| report_sink(&report.to_string()),
            move |result| result_sink(&format!("bestmove {}", move_to_uci(result.best_move))),
        ));
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        self.stop_search();
    }
}

/// Read commands from stdin until `quit` or end of input
pub fn run_uci_loop(engine: &mut UciEngine) -> io::Result<()> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let sink = Arc::clone(&engine.sink);
    let mut buf = String::new();

    info!("uci loop started");
    while engine.is_running() {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            debug!("end of input");
            break;
        }
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }
        for r in process_uci_line(line, engine) {
            sink(&r);
        }
    }
    engine.stop_search();
    Ok(())
}

pub fn process_uci_line(line: &str, engine: &mut UciEngine) -> Vec<String> {
    let cmd = parse_uci_command(line);
    engine.handle_command(cmd)
}
