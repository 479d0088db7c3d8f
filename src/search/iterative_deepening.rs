//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! The search runs on a private clone of the caller's state and walks the
//! tree with in-place make/unmake. Each completed iteration replaces the
//! result; an iteration interrupted by the stop flag or a budget is thrown
//! away.

use std::cmp::Reverse;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::{BoardScorer, MaterialScorer, MATE_SCORE};
use crate::search::threading::{SharedSearchState, BUDGET_CHECK_INTERVAL};

const INFINITY: i32 = MATE_SCORE + 1;
/// Scores at or beyond this magnitude are forced mates.
const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub movetime_ms: Option<u64>,
    pub node_budget: Option<u64>,
    /// Shuffle root moves before ordering so equal moves vary between games.
    pub shuffle_root: bool,
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            movetime_ms: None,
            node_budget: None,
            shuffle_root: true,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub info_lines: Vec<String>,
}

/// Searches `legal_moves` from `game_state` and returns the best completed
/// iteration.
///
/// Root moves are the members of `legal_moves` that are also legal in a
/// fresh generation, so the result is always one of the supplied moves.
pub fn search_best_move(
    game_state: &GameState,
    legal_moves: &[Move],
    scorer: &dyn BoardScorer,
    config: &SearchConfig,
    shared: &SharedSearchState,
) -> SearchResult {
    let mut result = SearchResult::default();
    if legal_moves.is_empty() {
        return result;
    }

    shared.begin_search(config.node_budget, config.movetime_ms);

    let mut snapshot = game_state.clone();
    let mut root_moves: Vec<Move> = generate_legal_moves(&mut snapshot)
        .into_iter()
        .filter(|mv| {
            legal_moves
                .iter()
                .any(|legal| legal == mv && legal.promotion() == mv.promotion())
        })
        .collect();

    if root_moves.is_empty() {
        debug!("none of the {} supplied moves is legal here", legal_moves.len());
        return result;
    }

    if config.shuffle_root {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        root_moves.shuffle(&mut rng);
    }
    order_moves(&mut root_moves);

    let mut searcher = Searcher::new(scorer, shared);

    for depth in 1..=config.max_depth.max(1) {
        let Some((best_move, best_score)) = searcher.search_root(&mut snapshot, &root_moves, depth)
        else {
            debug!("search stopped during depth {depth}");
            break;
        };

        result.best_move = Some(best_move);
        result.best_score = best_score;
        result.reached_depth = depth;

        let line = format!(
            "info depth {} score {} nodes {} pv {}",
            depth,
            format_score(best_score),
            searcher.nodes,
            best_move
        );
        debug!("{line}");
        result.info_lines.push(line);

        promote_to_front(&mut root_moves, &best_move);

        if best_score.abs() >= MATE_THRESHOLD {
            break;
        }
    }

    searcher.flush_nodes();
    result.nodes = searcher.nodes;
    result
}

struct Searcher<'a> {
    scorer: &'a dyn BoardScorer,
    shared: &'a SharedSearchState,
    nodes: u64,
    unreported: u64,
    aborted: bool,
}

impl<'a> Searcher<'a> {
    fn new(scorer: &'a dyn BoardScorer, shared: &'a SharedSearchState) -> Self {
        Self {
            scorer,
            shared,
            nodes: 0,
            unreported: 0,
            aborted: false,
        }
    }

    /// Counts a node; true once the search has to unwind.
    #[inline]
    fn tick(&mut self) -> bool {
        self.nodes += 1;
        self.unreported += 1;

        if self.aborted {
            return true;
        }
        if self.shared.should_stop() {
            self.aborted = true;
        } else if self.unreported >= BUDGET_CHECK_INTERVAL {
            let pending = std::mem::take(&mut self.unreported);
            self.aborted = self.shared.record_nodes(pending);
        }
        self.aborted
    }

    fn flush_nodes(&mut self) {
        let pending = std::mem::take(&mut self.unreported);
        self.shared.record_nodes(pending);
    }

    fn search_root(
        &mut self,
        state: &mut GameState,
        root_moves: &[Move],
        depth: u8,
    ) -> Option<(Move, i32)> {
        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best: Option<(Move, i32)> = None;

        for &mv in root_moves {
            make_move(state, mv);
            let child = self.negamax(state, depth - 1, -beta, -alpha, 1);
            unmake_move(state);
            let score = -child?;

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        best
    }

    fn negamax(
        &mut self,
        state: &mut GameState,
        depth: u8,
        mut alpha: i32,
        beta: i32,
        ply: i32,
    ) -> Option<i32> {
        if self.tick() {
            return None;
        }

        // Terminal positions are recognised even at the horizon so mates
        // always outrank material.
        let mut moves = generate_legal_moves(state);
        if moves.is_empty() {
            return Some(terminal_score(state, ply));
        }
        if depth == 0 {
            return Some(self.scorer.score(state));
        }

        order_moves(&mut moves);

        let mut best = -INFINITY;
        for mv in moves {
            make_move(state, mv);
            let child = self.negamax(state, depth - 1, -beta, -alpha, ply + 1);
            unmake_move(state);
            let score = -child?;

            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        Some(best)
    }
}

fn terminal_score(state: &GameState, ply: i32) -> i32 {
    if state.in_check() {
        -MATE_SCORE + ply
    } else {
        0
    }
}

/// Captures by most valuable victim then least valuable attacker, then
/// promotions, then everything else. Stable, so earlier order breaks ties.
fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|mv| Reverse(ordering_key(mv)));
}

fn ordering_key(mv: &Move) -> i32 {
    let mut key = 0;
    if let Some(victim) = mv.piece_captured() {
        key += 10_000 + 10 * MaterialScorer::piece_value(victim.kind)
            - MaterialScorer::piece_value(mv.piece_moved().kind);
    }
    if let Some(kind) = mv.promotion() {
        key += 5_000 + MaterialScorer::piece_value(kind);
    }
    key
}

fn promote_to_front(moves: &mut [Move], best: &Move) {
    if let Some(pos) = moves
        .iter()
        .position(|mv| mv == best && mv.promotion() == best.promotion())
    {
        moves[..=pos].rotate_right(1);
    }
}

fn format_score(score: i32) -> String {
    if score.abs() >= MATE_THRESHOLD {
        let plies = MATE_SCORE - score.abs();
        let moves = (plies + 1) / 2;
        if score > 0 {
            format!("mate {moves}")
        } else {
            format!("mate -{moves}")
        }
    } else {
        format!("cp {score}")
    }
}
