//! Errors used throughout the chess engine.
//!
//! `ChessError` is the single error type returned by the rules engine, the
//! notation/FEN utilities and engine configuration. An empty legal-move set
//! is *not* an error (checkmate and stalemate are reported through flags),
//! and a search that makes no decision returns `None` rather than failing.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// The move is not a member of the current legal-move set.
    #[error("invalid move {notation}: not in the current legal move set")]
    InvalidMove { notation: String },

    /// `undo_move` was called with no move applied.
    #[error("cannot undo: move history is empty")]
    EmptyHistory,

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0}")]
    InvalidNotation(String),

    #[error("invalid engine option {name}: {reason}")]
    InvalidOption { name: String, reason: String },
}

pub type ChessResult<T> = Result<T, ChessError>;
