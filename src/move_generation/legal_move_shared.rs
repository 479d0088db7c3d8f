//! Shared context and helpers for the per-piece generators.

use crate::game_state::castle_rights::CastleRights;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::PinsAndChecks;
use crate::moves::chess_move::Move;

/// Read-only view of everything a piece generator needs.
///
/// Built once per generation call from the game state and the fresh
/// pin/check analysis; generators never touch the state itself.
pub struct MoveGenContext<'a> {
    pub board: &'a Board,
    pub side: Color,
    pub king: Square,
    pub analysis: &'a PinsAndChecks,
    pub en_passant_target: Option<Square>,
    pub castle_rights: CastleRights,
    pub underpromotion: bool,
}

impl MoveGenContext<'_> {
    /// A piece on `from` may step along `direction` unless it is pinned to a
    /// different line.
    #[inline]
    pub fn pin_allows(&self, from: Square, direction: Direction) -> bool {
        match self.analysis.pin_direction(from) {
            None => true,
            Some(pin) => pin.is_collinear(direction),
        }
    }

    #[inline]
    pub fn is_pinned(&self, from: Square) -> bool {
        self.analysis.pin_direction(from).is_some()
    }

    #[inline]
    pub fn is_enemy(&self, square: Square) -> bool {
        self.board
            .get(square)
            .is_some_and(|piece| piece.color != self.side)
    }

    #[inline]
    pub fn is_ally(&self, square: Square) -> bool {
        self.board
            .get(square)
            .is_some_and(|piece| piece.color == self.side)
    }
}

/// Pushes `from -> to`, expanding promotions according to the context.
pub fn push_move(ctx: &MoveGenContext<'_>, piece: Piece, from: Square, to: Square, out: &mut Vec<Move>) {
    let promotes = piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_row();
    if promotes && ctx.underpromotion {
        for kind in PieceKind::PROMOTIONS {
            out.push(Move::build(piece, from, to, ctx.board, Some(kind)));
        }
    } else {
        out.push(Move::build(piece, from, to, ctx.board, None));
    }
}

/// Walks each ray until the edge, a friendly piece (excluded) or an enemy
/// piece (included).
pub fn push_sliding_moves(
    ctx: &MoveGenContext<'_>,
    piece: Piece,
    from: Square,
    directions: &[Direction],
    out: &mut Vec<Move>,
) {
    for &direction in directions {
        if !ctx.pin_allows(from, direction) {
            continue;
        }

        let mut cursor = from;
        while let Some(to) = cursor.step(direction) {
            if ctx.is_ally(to) {
                break;
            }
            push_move(ctx, piece, from, to, out);
            if ctx.is_enemy(to) {
                break;
            }
            cursor = to;
        }
    }
}
