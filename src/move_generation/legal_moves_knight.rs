use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{push_move, MoveGenContext};
use crate::moves::chess_move::Move;

pub fn generate_knight_moves(ctx: &MoveGenContext<'_>, from: Square, out: &mut Vec<Move>) {
    // A pinned knight can never stay on its pin line.
    if ctx.is_pinned(from) {
        return;
    }

    let piece = Piece::new(ctx.side, PieceKind::Knight);
    for (d_row, d_col) in KNIGHT_OFFSETS {
        let Some(to) = from.offset(d_row, d_col) else {
            continue;
        };
        if !ctx.is_ally(to) {
            push_move(ctx, piece, from, to, out);
        }
    }
}
