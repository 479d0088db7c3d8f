//! Full legal move generation pipeline.
//!
//! Runs the pin/check analysis from the king once, lets each piece generator
//! emit moves that already respect pins, then filters the remainder against
//! the current check. Nothing is applied to the board except for en-passant
//! candidates, which are verified on a scratch copy.

use log::trace;

use crate::game_state::castle_rights::CastleRights;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::{find_pins_and_checks, square_attacked, PinsAndChecks};
use crate::move_generation::legal_move_shared::MoveGenContext;
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::moves::chess_move::Move;

/// Generates every legal move for the side to move and refreshes the
/// check, pin and terminal flags on `game_state`.
pub fn generate_legal_moves(game_state: &mut GameState) -> Vec<Move> {
    let side = game_state.side_to_move;
    let king = game_state.king_locations[side.index()];
    let analysis = find_pins_and_checks(&game_state.board, king, side);

    let moves = collect_legal_moves(
        &game_state.board,
        side,
        king,
        &analysis,
        game_state.en_passant_target,
        game_state.castle_rights,
        game_state.options.underpromotion,
    );

    let in_check = analysis.in_check();
    game_state.in_check = in_check;
    game_state.checkmate = moves.is_empty() && in_check;
    game_state.stalemate = moves.is_empty() && !in_check;
    game_state.pins = analysis.pins;
    game_state.checks = analysis.checks;

    if moves.is_empty() {
        trace!(
            "{} has no legal moves (checkmate: {})",
            side.name(),
            game_state.checkmate
        );
    }

    moves
}

fn collect_legal_moves(
    board: &Board,
    side: Color,
    king: Square,
    analysis: &PinsAndChecks,
    en_passant_target: Option<Square>,
    castle_rights: CastleRights,
    underpromotion: bool,
) -> Vec<Move> {
    let ctx = MoveGenContext {
        board,
        side,
        king,
        analysis,
        en_passant_target,
        castle_rights,
        underpromotion,
    };

    let mut pseudo = Vec::<Move>::with_capacity(64);

    // Only the king can answer a double check.
    if analysis.checks.len() >= 2 {
        generate_king_moves(&ctx, king, &mut pseudo);
        return pseudo;
    }

    for (from, piece) in board.pieces() {
        if piece.color != side {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => generate_pawn_moves(&ctx, from, &mut pseudo),
            PieceKind::Knight => generate_knight_moves(&ctx, from, &mut pseudo),
            PieceKind::Bishop => generate_bishop_moves(&ctx, from, &mut pseudo),
            PieceKind::Rook => generate_rook_moves(&ctx, from, &mut pseudo),
            PieceKind::Queen => generate_queen_moves(&ctx, from, &mut pseudo),
            PieceKind::King => generate_king_moves(&ctx, from, &mut pseudo),
        }
    }

    let resolving = analysis
        .checks
        .first()
        .map(|check| check.resolving_squares(king));

    pseudo.retain(|mv| {
        if mv.is_en_passant() {
            return !en_passant_exposes_king(board, mv, king, side);
        }
        if mv.piece_moved().kind == PieceKind::King {
            return true;
        }
        match &resolving {
            Some(squares) => squares.contains(&mv.end()),
            None => true,
        }
    });

    pseudo
}

/// En passant clears two squares on the capturing rank at once, which the ray
/// analysis cannot see, so it is checked against the resulting board directly.
fn en_passant_exposes_king(board: &Board, mv: &Move, king: Square, side: Color) -> bool {
    let mut scratch = *board;
    scratch.set(mv.start(), None);
    scratch.set(mv.en_passant_capture_square(), None);
    scratch.set(mv.end(), Some(mv.piece_moved()));
    square_attacked(&scratch, king, side.opposite())
}
