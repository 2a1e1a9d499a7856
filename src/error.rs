//! Error types for external input
//!
//! Everything here describes malformed input coming from the protocol layer.
//! None of these are fatal: callers log them and keep their previous state.

use thiserror::Error;

/// Errors raised while reading a FEN board description
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),

    #[error("piece placement runs off the board")]
    PlacementOverflow,

    #[error("piece placement does not describe all 64 squares")]
    IncompletePlacement,

    #[error("invalid side to move '{0}'")]
    InvalidSide(String),

    #[error("invalid castling character '{0}'")]
    InvalidCastling(char),

    #[error("invalid en-passant square '{0}'")]
    InvalidEnPassant(String),

    #[error("invalid move counter '{0}'")]
    InvalidCounter(String),

    #[error("side {0} must have exactly one king")]
    MissingKing(&'static str),

    #[error("side {0} has more pieces than promotions allow")]
    TooManyPieces(&'static str),

    #[error("the side not to move is in check")]
    OpponentInCheck,
}

/// Errors raised while mapping coordinate notation to a legal move
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("move '{0}' is too short")]
    TooShort(String),

    #[error("invalid square in '{0}'")]
    InvalidSquare(String),

    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),

    #[error("move '{0}' is not legal in this position")]
    Illegal(String),

    #[error("game history is full ({0} plies)")]
    HistoryFull(usize),
}

/// Errors raised by `setoption`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("option {name} requires a value")]
    MissingValue { name: String },

    #[error("invalid value for option {name}: {value}")]
    InvalidValue { name: String, value: String },
}
