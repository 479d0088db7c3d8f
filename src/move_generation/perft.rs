//! Perft: exhaustive legal-move tree counting for generator validation.
//!
//! Walks a private clone of the position with in-place make/unmake, so the
//! caller's state is never touched.

use std::thread;

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::square_attacked;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::chess_move::Move;

/// Leaf statistics for a perft run. Everything except `nodes` classifies the
/// move that reached each leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft(game_state: &GameState, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut scratch = game_state.clone();
    let mut total = PerftCounts::default();
    perft_recurse(&mut scratch, depth, &mut total);
    total
}

/// Node count below each root move, in generation order.
pub fn perft_divide(game_state: &GameState, depth: u8) -> Vec<(Move, usize)> {
    if depth == 0 {
        return Vec::new();
    }

    let mut scratch = game_state.clone();
    let root_moves = generate_legal_moves(&mut scratch);
    let mut out = Vec::with_capacity(root_moves.len());

    for mv in root_moves {
        make_move(&mut scratch, mv);
        let nodes = perft(&scratch, depth - 1).nodes;
        unmake_move(&mut scratch);
        out.push((mv, nodes));
    }

    out
}

/// Same totals as [`perft`], with one scoped worker per root move.
pub fn perft_multi_threaded(game_state: &GameState, depth: u8) -> PerftCounts {
    if depth <= 1 {
        return perft(game_state, depth);
    }

    let mut scratch = game_state.clone();
    let root_moves = generate_legal_moves(&mut scratch);

    thread::scope(|scope| {
        let handles: Vec<_> = root_moves
            .iter()
            .map(|&mv| {
                let mut local_state = scratch.clone();
                scope.spawn(move || {
                    make_move(&mut local_state, mv);
                    let mut local = PerftCounts::default();
                    perft_recurse(&mut local_state, depth - 1, &mut local);
                    local
                })
            })
            .collect();

        let mut total = PerftCounts::default();
        for handle in handles {
            match handle.join() {
                Ok(local) => total.merge(local),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        total
    })
}

fn perft_recurse(game_state: &mut GameState, depth: u8, counts: &mut PerftCounts) {
    let moves = generate_legal_moves(game_state);
    for mv in moves {
        make_move(game_state, mv);
        if depth == 1 {
            tally_leaf(game_state, &mv, counts);
        } else {
            perft_recurse(game_state, depth - 1, counts);
        }
        unmake_move(game_state);
    }
}

fn tally_leaf(game_state: &mut GameState, mv: &Move, counts: &mut PerftCounts) {
    counts.nodes += 1;

    if mv.is_capture() {
        counts.captures += 1;
    }
    if mv.is_en_passant() {
        counts.en_passant += 1;
    }
    if mv.is_castle() {
        counts.castles += 1;
    }
    if mv.is_promotion() {
        counts.promotions += 1;
    }

    let side = game_state.side_to_move;
    let king = game_state.king_locations[side.index()];
    if square_attacked(&game_state.board, king, side.opposite()) {
        counts.checks += 1;
        if generate_legal_moves(game_state).is_empty() {
            counts.checkmates += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::game_state::GenerationOptions;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

    fn with_underpromotion(fen: &str) -> GameState {
        GameState::from_fen(fen)
            .expect("FEN should parse")
            .with_options(GenerationOptions {
                underpromotion: true,
            })
    }

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let game = GameState::new_game();
        assert_eq!(
            perft(&game, 0),
            PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            }
        );
    }

    #[test]
    fn start_position_node_counts() {
        let game = GameState::new_game();
        assert_eq!(perft(&game, 1).nodes, 20);
        assert_eq!(perft(&game, 2).nodes, 400);
        assert_eq!(
            perft(&game, 3),
            PerftCounts {
                nodes: 8902,
                captures: 34,
                en_passant: 0,
                castles: 0,
                promotions: 0,
                checks: 12,
                checkmates: 0,
            }
        );
    }

    #[test]
    fn kiwipete_exercises_castling_and_en_passant() {
        let game = GameState::from_fen(KIWIPETE).expect("FEN should parse");
        assert_eq!(perft(&game, 1).nodes, 48);
        assert_eq!(
            perft(&game, 2),
            PerftCounts {
                nodes: 2039,
                captures: 351,
                en_passant: 1,
                castles: 91,
                promotions: 0,
                checks: 3,
                checkmates: 0,
            }
        );
    }

    #[test]
    fn position_3_exercises_pins_and_en_passant_discovery() {
        let game = GameState::from_fen(POSITION_3).expect("FEN should parse");
        assert_eq!(perft(&game, 1).nodes, 14);
        assert_eq!(perft(&game, 2).nodes, 191);

        let counts = perft(&game, 3);
        assert_eq!(counts.nodes, 2812);
        assert_eq!(counts.captures, 209);
        assert_eq!(counts.en_passant, 2);
        assert_eq!(counts.checks, 267);
    }

    #[test]
    fn position_4_with_underpromotion() {
        let game = with_underpromotion(POSITION_4);
        assert_eq!(perft(&game, 1).nodes, 6);
        assert_eq!(
            perft(&game, 2),
            PerftCounts {
                nodes: 264,
                captures: 87,
                en_passant: 0,
                castles: 6,
                promotions: 48,
                checks: 10,
                checkmates: 0,
            }
        );
    }

    #[test]
    fn position_5_with_underpromotion() {
        let game = with_underpromotion(POSITION_5);
        assert_eq!(perft(&game, 1).nodes, 44);
        assert_eq!(perft(&game, 2).nodes, 1486);
    }

    #[test]
    fn divide_sums_to_perft_and_threads_agree() {
        let game = GameState::from_fen(KIWIPETE).expect("FEN should parse");
        let divided = perft_divide(&game, 2);
        assert_eq!(divided.len(), 48);
        assert_eq!(divided.iter().map(|(_, n)| n).sum::<usize>(), 2039);
        assert_eq!(perft_multi_threaded(&game, 2), perft(&game, 2));
    }

    #[test]
    fn perft_leaves_the_caller_state_untouched() {
        let game = GameState::from_fen(KIWIPETE).expect("FEN should parse");
        let before = game.to_fen();
        perft(&game, 2);
        assert_eq!(game.to_fen(), before);
        assert!(game.move_log().is_empty());
    }
}
