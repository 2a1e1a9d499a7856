//! UCI command parser for Alfiere
//!
//! Covers the protocol commands a GUI sends plus a few console helpers
//! (`d`, `perft`, `m`, `u`). Anything else becomes `Unknown`.

use crate::time::TimeControl;

/// Search limits carried by `go`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub time: TimeControl,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub infinite: bool,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    SetOption {
        name: String,
        value: Option<String>,
    },
    UciNewGame,
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go(GoParams),
    Stop,
    Quit,
    /// Print the board
    Display,
    Perft(u32),
    /// Apply one move to the current position
    MakeMove(String),
    /// Take back the last move
    Undo,
    Unknown(String),
}

// Value following a keyword, ignored when missing or unparseable
fn value_after<T: std::str::FromStr>(parts: &[&str], i: usize) -> Option<T> {
    parts.get(i + 1).and_then(|v| v.parse().ok())
}

/// Parse a UCI command from a string (simple tokenizer)
pub fn parse_uci_command(line: &str) -> UciCommand {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = parts.first() else {
        return UciCommand::Unknown(String::new());
    };

    match head {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        "d" => UciCommand::Display,
        "u" => UciCommand::Undo,
        "m" => match parts.get(1) {
            Some(mv) => UciCommand::MakeMove(mv.to_string()),
            None => UciCommand::Unknown(line.trim().to_string()),
        },
        "perft" => match value_after::<u32>(&parts, 0) {
            Some(depth) => UciCommand::Perft(depth),
            None => UciCommand::Unknown(line.trim().to_string()),
        },
        "setoption" => parse_setoption(&parts),
        "position" => parse_position(&parts),
        "go" => UciCommand::Go(parse_go(&parts)),
        _ => UciCommand::Unknown(line.trim().to_string()),
    }
}

// setoption name <name> [value <val>]
fn parse_setoption(parts: &[&str]) -> UciCommand {
    let mut name = String::new();
    let mut value: Option<String> = None;
    let mut i = 1usize;
    while i < parts.len() {
        match parts[i] {
            "name" => {
                i += 1;
                let mut words = Vec::new();
                while i < parts.len() && parts[i] != "value" {
                    words.push(parts[i]);
                    i += 1;
                }
                name = words.join(" ");
            }
            "value" => {
                value = Some(parts[i + 1..].join(" "));
                break;
            }
            _ => i += 1,
        }
    }
    UciCommand::SetOption { name, value }
}

// position [fen <fenstring> | startpos] [moves <move1> ...]
fn parse_position(parts: &[&str]) -> UciCommand {
    let moves_at = parts.iter().position(|&s| s == "moves");
    let moves = moves_at
        .map(|at| parts[at + 1..].iter().map(|m| m.to_string()).collect())
        .unwrap_or_default();

    let fen = match parts.get(1) {
        Some(&"fen") => {
            let end = moves_at.unwrap_or(parts.len());
            Some(parts[2.min(end)..end].join(" "))
        }
        _ => None,
    };
    UciCommand::Position { fen, moves }
}

fn parse_go(parts: &[&str]) -> GoParams {
    let mut go = GoParams::default();
    let mut i = 1usize;
    while i < parts.len() {
        match parts[i] {
            "wtime" => go.time.wtime = value_after(parts, i),
            "btime" => go.time.btime = value_after(parts, i),
            "winc" => go.time.winc = value_after(parts, i),
            "binc" => go.time.binc = value_after(parts, i),
            "movestogo" => go.time.movestogo = value_after(parts, i),
            "movetime" => go.time.movetime = value_after(parts, i),
            "depth" => go.depth = value_after(parts, i),
            "nodes" => go.nodes = value_after(parts, i),
            "infinite" => {
                go.infinite = true;
                i += 1;
                continue;
            }
            _ => {
                i += 1;
                continue;
            }
        }
        i += 2;
    }
    go
}
