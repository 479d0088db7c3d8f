//! Random-move engine.
//!
//! Selects uniformly from legal moves. Used for the computer side when no
//! search is wanted, and as the fallback when a search yields nothing.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_trait::{parse_option, Engine, EngineOutput, GoParams};
use crate::game_state::game_state::GameState;
use crate::moves::chess_move::Move;

/// Uniform choice from `legal_moves`; `None` only for an empty slice.
pub fn choose_random(legal_moves: &[Move]) -> Option<Move> {
    legal_moves.choose(&mut rand::rng()).copied()
}

#[derive(Debug, Default)]
pub struct RandomEngine {
    seeded: Option<StdRng>,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seeded: Some(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "ply_chess random"
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        match name.to_ascii_lowercase().as_str() {
            "seed" => {
                self.seeded = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(StdRng::seed_from_u64(parse_option(name, value)?))
                };
                Ok(())
            }
            _ => Err(ChessError::InvalidOption {
                name: name.to_owned(),
                reason: "unknown option".to_owned(),
            }),
        }
    }

    fn choose_move(
        &mut self,
        _game_state: &GameState,
        legal_moves: &[Move],
        params: &GoParams,
    ) -> EngineOutput {
        let mut out = EngineOutput::default();
        out.info_lines.push(format!(
            "info string random_engine legal_moves {}",
            legal_moves.len()
        ));

        if let Some(depth) = params.depth {
            out.info_lines.push(format!(
                "info string random_engine ignores requested_depth {}",
                depth
            ));
        }

        out.best_move = match self.seeded.as_mut() {
            Some(rng) => legal_moves.choose(rng).copied(),
            None => choose_random(legal_moves),
        };
        out
    }
}
