use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{push_move, MoveGenContext};
use crate::moves::chess_move::Move;

pub fn generate_pawn_moves(ctx: &MoveGenContext<'_>, from: Square, out: &mut Vec<Move>) {
    let side = ctx.side;
    let piece = Piece::new(side, PieceKind::Pawn);
    let forward = side.pawn_direction();

    if let Some(one_step) = from.offset(forward, 0) {
        if ctx.board.is_empty(one_step) && ctx.pin_allows(from, Direction::new(forward, 0)) {
            push_move(ctx, piece, from, one_step, out);

            if from.row == side.pawn_start_row() {
                if let Some(two_step) = from.offset(2 * forward, 0) {
                    if ctx.board.is_empty(two_step) {
                        push_move(ctx, piece, from, two_step, out);
                    }
                }
            }
        }
    }

    // captures and en-passant
    for d_col in [-1i8, 1i8] {
        let Some(to) = from.offset(forward, d_col) else {
            continue;
        };
        if !ctx.pin_allows(from, Direction::new(forward, d_col)) {
            continue;
        }

        if ctx.is_enemy(to) {
            push_move(ctx, piece, from, to, out);
        } else if ctx.board.is_empty(to)
            && ctx.en_passant_target == Some(to)
            && captures_enemy_pawn(ctx, Square { row: from.row, col: to.col })
        {
            push_move(ctx, piece, from, to, out);
        }
    }
}

fn captures_enemy_pawn(ctx: &MoveGenContext<'_>, square: Square) -> bool {
    ctx.board.get(square) == Some(Piece::new(ctx.side.opposite(), PieceKind::Pawn))
}
