//! Rook move generation along ranks and files.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{push_sliding_moves, MoveGenContext};
use crate::moves::chess_move::Move;

pub fn generate_rook_moves(ctx: &MoveGenContext<'_>, from: Square, out: &mut Vec<Move>) {
    let piece = Piece::new(ctx.side, PieceKind::Rook);
    push_sliding_moves(ctx, piece, from, &ORTHOGONAL_DIRECTIONS, out);
}
