//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.

use crate::game_state::{chess_types::*, game_state::GameState};

pub const MATE_SCORE: i32 = 30000;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, game_state: &GameState) -> i32;
}

#[inline]
fn from_side_to_move(game_state: &GameState, light_minus_dark: i32) -> i32 {
    match game_state.side_to_move() {
        Color::Light => light_minus_dark,
        Color::Dark => -light_minus_dark,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    fn material_balance_light_minus_dark(board: &Board) -> i32 {
        board
            .pieces()
            .map(|(_, piece)| {
                let value = Self::piece_value(piece.kind);
                match piece.color {
                    Color::Light => value,
                    Color::Dark => -value,
                }
            })
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        from_side_to_move(
            game_state,
            Self::material_balance_light_minus_dark(game_state.board()),
        )
    }
}

// Piece-square bonuses from Light's side, row 0 = rank 8. Dark reads them
// mirrored vertically.
#[rustfmt::skip]
const PAWN_TABLE: [[i8; 8]; 8] = [
    [  0,  0,  0,  0,  0,  0,  0,  0],
    [ 50, 50, 50, 50, 50, 50, 50, 50],
    [ 10, 10, 20, 30, 30, 20, 10, 10],
    [  5,  5, 10, 25, 25, 10,  5,  5],
    [  0,  0,  0, 20, 20,  0,  0,  0],
    [  5, -5,-10,  0,  0,-10, -5,  5],
    [  5, 10, 10,-20,-20, 10, 10,  5],
    [  0,  0,  0,  0,  0,  0,  0,  0],
];

#[rustfmt::skip]
const KNIGHT_TABLE: [[i8; 8]; 8] = [
    [-50,-40,-30,-30,-30,-30,-40,-50],
    [-40,-20,  0,  0,  0,  0,-20,-40],
    [-30,  0, 10, 15, 15, 10,  0,-30],
    [-30,  5, 15, 20, 20, 15,  5,-30],
    [-30,  0, 15, 20, 20, 15,  0,-30],
    [-30,  5, 10, 15, 15, 10,  5,-30],
    [-40,-20,  0,  5,  5,  0,-20,-40],
    [-50,-40,-30,-30,-30,-30,-40,-50],
];

#[rustfmt::skip]
const BISHOP_TABLE: [[i8; 8]; 8] = [
    [-20,-10,-10,-10,-10,-10,-10,-20],
    [-10,  0,  0,  0,  0,  0,  0,-10],
    [-10,  0,  5, 10, 10,  5,  0,-10],
    [-10,  5,  5, 10, 10,  5,  5,-10],
    [-10,  0, 10, 10, 10, 10,  0,-10],
    [-10, 10, 10, 10, 10, 10, 10,-10],
    [-10,  5,  0,  0,  0,  0,  5,-10],
    [-20,-10,-10,-10,-10,-10,-10,-20],
];

#[rustfmt::skip]
const ROOK_TABLE: [[i8; 8]; 8] = [
    [  0,  0,  0,  0,  0,  0,  0,  0],
    [  5, 10, 10, 10, 10, 10, 10,  5],
    [ -5,  0,  0,  0,  0,  0,  0, -5],
    [ -5,  0,  0,  0,  0,  0,  0, -5],
    [ -5,  0,  0,  0,  0,  0,  0, -5],
    [ -5,  0,  0,  0,  0,  0,  0, -5],
    [ -5,  0,  0,  0,  0,  0,  0, -5],
    [  0,  0,  0,  5,  5,  0,  0,  0],
];

#[rustfmt::skip]
const QUEEN_TABLE: [[i8; 8]; 8] = [
    [-20,-10,-10, -5, -5,-10,-10,-20],
    [-10,  0,  0,  0,  0,  0,  0,-10],
    [-10,  0,  5,  5,  5,  5,  0,-10],
    [ -5,  0,  5,  5,  5,  5,  0, -5],
    [  0,  0,  5,  5,  5,  5,  0, -5],
    [-10,  5,  5,  5,  5,  5,  0,-10],
    [-10,  0,  5,  0,  0,  0,  0,-10],
    [-20,-10,-10, -5, -5,-10,-10,-20],
];

#[rustfmt::skip]
const KING_TABLE: [[i8; 8]; 8] = [
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-30,-40,-40,-50,-50,-40,-40,-30],
    [-20,-30,-30,-40,-40,-30,-30,-20],
    [-10,-20,-20,-20,-20,-20,-20,-10],
    [ 20, 20,  0,  0,  0,  0, 20, 20],
    [ 20, 30, 10,  0,  0, 10, 30, 20],
];

/// Material plus piece-square placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalScorer;

impl PositionalScorer {
    #[inline]
    pub fn square_bonus(piece: Piece, square: Square) -> i32 {
        let row = match piece.color {
            Color::Light => square.row,
            Color::Dark => 7 - square.row,
        } as usize;
        let col = square.col as usize;

        let table = match piece.kind {
            PieceKind::Pawn => &PAWN_TABLE,
            PieceKind::Knight => &KNIGHT_TABLE,
            PieceKind::Bishop => &BISHOP_TABLE,
            PieceKind::Rook => &ROOK_TABLE,
            PieceKind::Queen => &QUEEN_TABLE,
            PieceKind::King => &KING_TABLE,
        };
        i32::from(table[row][col])
    }
}

impl BoardScorer for PositionalScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        let light_minus_dark: i32 = game_state
            .board()
            .pieces()
            .map(|(square, piece)| {
                let value =
                    MaterialScorer::piece_value(piece.kind) + Self::square_bonus(piece, square);
                match piece.color {
                    Color::Light => value,
                    Color::Dark => -value,
                }
            })
            .sum();
        from_side_to_move(game_state, light_minus_dark)
    }
}

/// Scorer selected by name, as accepted by the engine `Scorer` option.
pub fn scorer_by_name(name: &str) -> Option<Box<dyn BoardScorer>> {
    match name.to_ascii_lowercase().as_str() {
        "material" => Some(Box::new(MaterialScorer)),
        "positional" => Some(Box::new(PositionalScorer)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{scorer_by_name, BoardScorer, MaterialScorer, PositionalScorer};
    use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
    use crate::game_state::game_state::GameState;

    #[test]
    fn start_position_is_balanced() {
        let game = GameState::new_game();
        assert_eq!(MaterialScorer.score(&game), 0);
        assert_eq!(PositionalScorer.score(&game), 0);
    }

    #[test]
    fn score_is_relative_to_side_to_move() {
        let light = GameState::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").expect("FEN should parse");
        let dark = GameState::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").expect("FEN should parse");

        assert_eq!(MaterialScorer.score(&light), 900);
        assert_eq!(MaterialScorer.score(&dark), -900);
        assert_eq!(PositionalScorer.score(&light), -PositionalScorer.score(&dark));
    }

    #[test]
    fn square_bonus_is_mirrored_for_dark() {
        let light_pawn = Piece::new(Color::Light, PieceKind::Pawn);
        let dark_pawn = Piece::new(Color::Dark, PieceKind::Pawn);
        let e4 = Square { row: 4, col: 4 };
        let e5 = Square { row: 3, col: 4 };

        assert_eq!(
            PositionalScorer::square_bonus(light_pawn, e4),
            PositionalScorer::square_bonus(dark_pawn, e5)
        );
        assert!(PositionalScorer::square_bonus(light_pawn, e4) > 0);
    }

    #[test]
    fn scorers_are_selectable_by_name() {
        assert!(scorer_by_name("Material").is_some());
        assert!(scorer_by_name("positional").is_some());
        assert!(scorer_by_name("neural").is_none());
    }
}
