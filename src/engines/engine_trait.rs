//! Move-choosing strategies behind one trait.
//!
//! The controller hands an `Engine` to a `SearchTask`; `GoParams` carries the
//! per-move overrides and the stop handle, `EngineOutput` the decision plus
//! any `info ...` diagnostics.

use std::sync::Arc;

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::game_state::GameState;
use crate::moves::chess_move::Move;
use crate::search::threading::SharedSearchState;

/// Per-request overrides on top of an engine's configured defaults.
#[derive(Debug, Clone, Default)]
pub struct GoParams {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
    pub nodes: Option<u64>,
    /// Stop handle shared with whoever may cancel the request.
    pub stop: Option<Arc<SharedSearchState>>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_option(&mut self, name: &str, _value: &str) -> ChessResult<()> {
        Err(ChessError::InvalidOption {
            name: name.to_owned(),
            reason: format!("not supported by {}", self.name()),
        })
    }

    /// Picks one of `legal_moves` for the side to move in `game_state`.
    ///
    /// `best_move` is `None` only when no decision could be made.
    fn choose_move(
        &mut self,
        game_state: &GameState,
        legal_moves: &[Move],
        params: &GoParams,
    ) -> EngineOutput;
}

/// Parses an option value, mapping failures to [`ChessError::InvalidOption`].
pub(crate) fn parse_option<T: std::str::FromStr>(name: &str, value: &str) -> ChessResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ChessError::InvalidOption {
            name: name.to_owned(),
            reason: format!("cannot parse '{value}'"),
        })
}
