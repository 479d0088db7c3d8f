//! In-place make/unmake of moves on a `GameState`.
//!
//! Neither function validates legality; callers either go through
//! `GameState::apply_move` or iterate a freshly generated legal set.

use crate::game_state::chess_rules::{KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::chess_move::Move;

/// Rook origin and destination for a castling king move.
fn castle_rook_squares(mv: &Move) -> (Square, Square) {
    let row = mv.end().row;
    if mv.end().col > mv.start().col {
        (
            Square {
                row,
                col: KINGSIDE_ROOK_COL,
            },
            Square {
                row,
                col: mv.end().col - 1,
            },
        )
    } else {
        (
            Square {
                row,
                col: QUEENSIDE_ROOK_COL,
            },
            Square {
                row,
                col: mv.end().col + 1,
            },
        )
    }
}

fn updated_castle_rights(rights: CastleRights, mv: &Move) -> CastleRights {
    let mut next = rights;
    let mover = mv.piece_moved();

    match mover.kind {
        PieceKind::King => next.revoke_all(mover.color),
        PieceKind::Rook => next.revoke_rook_corner(mover.color, mv.start()),
        _ => {}
    }

    // Independent of the mover: a rook taken on its corner loses that side.
    if let Some(captured) = mv.piece_captured() {
        if captured.kind == PieceKind::Rook {
            next.revoke_rook_corner(captured.color, mv.end());
        }
    }

    next
}

pub(crate) fn make_move(game_state: &mut GameState, mv: Move) {
    let mover = mv.piece_moved();
    let side = mover.color;
    let board = &mut game_state.board;

    board.set(mv.start(), None);
    if mv.is_en_passant() {
        board.set(mv.en_passant_capture_square(), None);
    }
    let placed = match mv.promotion() {
        Some(kind) => Piece::new(side, kind),
        None => mover,
    };
    board.set(mv.end(), Some(placed));

    if mv.is_castle() {
        let (rook_from, rook_to) = castle_rook_squares(&mv);
        let rook = board.get(rook_from);
        board.set(rook_from, None);
        board.set(rook_to, rook);
    }

    if mover.kind == PieceKind::King {
        game_state.king_locations[side.index()] = mv.end();
    }

    game_state.en_passant_target = if mv.is_double_pawn_push() {
        Some(Square {
            row: (mv.start().row + mv.end().row) / 2,
            col: mv.start().col,
        })
    } else {
        None
    };
    game_state.castle_rights = updated_castle_rights(game_state.castle_rights, &mv);

    game_state.move_log.push(mv);
    game_state.castle_rights_log.push(game_state.castle_rights);
    game_state.en_passant_log.push(game_state.en_passant_target);

    game_state.side_to_move = side.opposite();
    game_state.checkmate = false;
    game_state.stalemate = false;
    game_state.legal_moves = None;
}

/// Reverts the last logged move. Returns `None` when the log is empty.
///
/// Board, side to move, king locations, castle rights and the en-passant
/// target are restored exactly. `in_check`, `pins` and `checks` are outputs
/// of legal-move generation and stay stale until the next generation; the
/// terminal flags and the cached legal set are cleared.
pub(crate) fn unmake_move(game_state: &mut GameState) -> Option<Move> {
    let mv = game_state.move_log.pop()?;
    game_state.castle_rights_log.pop();
    game_state.en_passant_log.pop();

    let mover = mv.piece_moved();
    let side = mover.color;
    let board = &mut game_state.board;

    board.set(mv.start(), Some(mover));
    if mv.is_en_passant() {
        board.set(mv.end(), None);
        board.set(mv.en_passant_capture_square(), mv.piece_captured());
    } else {
        board.set(mv.end(), mv.piece_captured());
    }

    if mv.is_castle() {
        let (rook_from, rook_to) = castle_rook_squares(&mv);
        let rook = board.get(rook_to);
        board.set(rook_to, None);
        board.set(rook_from, rook);
    }

    if mover.kind == PieceKind::King {
        game_state.king_locations[side.index()] = mv.start();
    }

    if let Some(&rights) = game_state.castle_rights_log.last() {
        game_state.castle_rights = rights;
    }
    if let Some(&target) = game_state.en_passant_log.last() {
        game_state.en_passant_target = target;
    }

    game_state.side_to_move = side;
    game_state.checkmate = false;
    game_state.stalemate = false;
    game_state.legal_moves = None;

    Some(mv)
}
