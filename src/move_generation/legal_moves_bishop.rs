//! Bishop move generation along the four diagonals.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{push_sliding_moves, MoveGenContext};
use crate::moves::chess_move::Move;

pub fn generate_bishop_moves(ctx: &MoveGenContext<'_>, from: Square, out: &mut Vec<Move>) {
    let piece = Piece::new(ctx.side, PieceKind::Bishop);
    push_sliding_moves(ctx, piece, from, &DIAGONAL_DIRECTIONS, out);
}
