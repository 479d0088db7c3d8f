use crate::game_state::chess_rules::{king_home, KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::square_attacked_ignoring;
use crate::move_generation::legal_move_shared::{push_move, MoveGenContext};
use crate::moves::chess_move::Move;

/// King steps to unattacked squares, followed by castling.
///
/// Safety is probed on the unchanged board with the king's origin treated as
/// empty, so sliders cannot hide behind the square the king is leaving.
pub fn generate_king_moves(ctx: &MoveGenContext<'_>, from: Square, out: &mut Vec<Move>) {
    let piece = Piece::new(ctx.side, PieceKind::King);
    let enemy = ctx.side.opposite();

    for (d_row, d_col) in KING_OFFSETS {
        let Some(to) = from.offset(d_row, d_col) else {
            continue;
        };
        if ctx.is_ally(to) {
            continue;
        }
        if !square_attacked_ignoring(ctx.board, to, enemy, Some(from)) {
            push_move(ctx, piece, from, to, out);
        }
    }

    generate_castling_moves(ctx, from, out);
}

fn generate_castling_moves(ctx: &MoveGenContext<'_>, from: Square, out: &mut Vec<Move>) {
    let side = ctx.side;

    // Cannot castle out of check.
    if ctx.analysis.in_check() || from != king_home(side) {
        return;
    }

    let piece = Piece::new(side, PieceKind::King);
    let row = from.row;

    if ctx.castle_rights.kingside(side)
        && has_own_rook(ctx, row, KINGSIDE_ROOK_COL)
        && path_is_clear(ctx, row, &[5, 6])
        && path_is_safe(ctx, from, row, &[5, 6])
    {
        push_move(ctx, piece, from, Square { row, col: 6 }, out);
    }

    if ctx.castle_rights.queenside(side)
        && has_own_rook(ctx, row, QUEENSIDE_ROOK_COL)
        && path_is_clear(ctx, row, &[1, 2, 3])
        && path_is_safe(ctx, from, row, &[3, 2])
    {
        push_move(ctx, piece, from, Square { row, col: 2 }, out);
    }
}

fn has_own_rook(ctx: &MoveGenContext<'_>, row: u8, col: u8) -> bool {
    ctx.board
        .get(Square { row, col })
        .is_some_and(|piece| piece.is(ctx.side, PieceKind::Rook))
}

fn path_is_clear(ctx: &MoveGenContext<'_>, row: u8, cols: &[u8]) -> bool {
    cols.iter().all(|&col| ctx.board.is_empty(Square { row, col }))
}

fn path_is_safe(ctx: &MoveGenContext<'_>, from: Square, row: u8, cols: &[u8]) -> bool {
    let enemy = ctx.side.opposite();
    cols.iter()
        .all(|&col| !square_attacked_ignoring(ctx.board, Square { row, col }, enemy, Some(from)))
}
