//! Minimax engine: iterative deepening negamax over a pluggable scorer.

use log::info;

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_trait::{parse_option, Engine, EngineOutput, GoParams};
use crate::game_state::game_state::GameState;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::{scorer_by_name, BoardScorer, PositionalScorer};
use crate::search::iterative_deepening::{search_best_move, SearchConfig};
use crate::search::threading::SharedSearchState;

/// One-shot search with the default scorer and a private stop handle.
///
/// Returns `None` for an empty legal set.
pub fn choose_by_search(
    game_state: &GameState,
    legal_moves: &[Move],
    config: &SearchConfig,
) -> Option<Move> {
    let shared = SharedSearchState::new_shared();
    search_best_move(game_state, legal_moves, &PositionalScorer, config, &shared).best_move
}

pub struct MinimaxEngine {
    config: SearchConfig,
    scorer: Box<dyn BoardScorer>,
    scorer_name: String,
}

impl MinimaxEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            scorer: Box::new(PositionalScorer),
            scorer_name: "positional".to_owned(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn scorer_name(&self) -> &str {
        &self.scorer_name
    }
}

impl Default for MinimaxEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Engine for MinimaxEngine {
    fn name(&self) -> &str {
        "ply_chess minimax"
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        let invalid = |reason: &str| ChessError::InvalidOption {
            name: name.to_owned(),
            reason: reason.to_owned(),
        };

        match name.to_ascii_lowercase().as_str() {
            "depth" => {
                let depth: u8 = parse_option(name, value)?;
                if depth == 0 {
                    return Err(invalid("depth must be at least 1"));
                }
                self.config.max_depth = depth;
            }
            "movetime" => {
                let ms: u64 = parse_option(name, value)?;
                self.config.movetime_ms = (ms > 0).then_some(ms);
            }
            "nodes" => {
                let nodes: u64 = parse_option(name, value)?;
                self.config.node_budget = (nodes > 0).then_some(nodes);
            }
            "scorer" => {
                self.scorer = scorer_by_name(value)
                    .ok_or_else(|| invalid("expected 'material' or 'positional'"))?;
                self.scorer_name = value.to_ascii_lowercase();
            }
            "seed" => {
                self.config.seed = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(parse_option(name, value)?)
                };
            }
            "shuffle" => {
                self.config.shuffle_root = parse_option(name, value)?;
            }
            _ => return Err(invalid("unknown option")),
        }

        info!("{} option {} = {}", self.name(), name, value);
        Ok(())
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        legal_moves: &[Move],
        params: &GoParams,
    ) -> EngineOutput {
        let mut config = self.config;
        if let Some(depth) = params.depth {
            config.max_depth = depth.max(1);
        }
        if params.movetime_ms.is_some() {
            config.movetime_ms = params.movetime_ms;
        }
        if params.nodes.is_some() {
            config.node_budget = params.nodes;
        }

        let shared = params.stop.clone().unwrap_or_else(SharedSearchState::new_shared);
        let result = search_best_move(
            game_state,
            legal_moves,
            self.scorer.as_ref(),
            &config,
            &shared,
        );

        let mut out = EngineOutput {
            best_move: result.best_move,
            info_lines: result.info_lines,
        };
        out.info_lines.push(format!(
            "info string minimax scorer {} reached_depth {} nodes {}",
            self.scorer_name, result.reached_depth, result.nodes
        ));
        out
    }
}
