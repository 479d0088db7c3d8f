//! Canonical chess-rule constants.
//!
//! Static rule literals: the standard starting position (as a FEN string and
//! as a ready-made board) and the home squares used by castling.

use crate::game_state::chess_types::{Board, Color, Piece, PieceKind, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Column the king starts on; castling is only generated from here.
pub const KING_HOME_COL: u8 = 4;
pub const KINGSIDE_ROOK_COL: u8 = 7;
pub const QUEENSIDE_ROOK_COL: u8 = 0;

pub fn starting_board() -> Board {
    let mut board = Board::empty();
    for color in [Color::Light, Color::Dark] {
        let back = color.back_row();
        let pawns = color.pawn_start_row();
        for col in 0..8u8 {
            board.set(
                Square { row: back, col },
                Some(Piece::new(color, BACK_RANK[col as usize])),
            );
            board.set(
                Square { row: pawns, col },
                Some(Piece::new(color, PieceKind::Pawn)),
            );
        }
    }
    board
}

#[inline]
pub fn king_home(color: Color) -> Square {
    Square {
        row: color.back_row(),
        col: KING_HOME_COL,
    }
}
