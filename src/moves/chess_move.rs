//! Immutable move value.
//!
//! A `Move` is built from a start square, an end square and the board as it
//! stands before the move. Every classification flag is derived from those
//! three inputs, so the same coordinates on the same board always describe
//! the same transition.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{Board, Piece, PieceKind, Square};
use crate::utils::algebraic::square_to_algebraic;

#[derive(Debug, Clone, Copy)]
pub struct Move {
    start: Square,
    end: Square,
    piece_moved: Piece,
    piece_captured: Option<Piece>,
    promotion: Option<PieceKind>,
    is_en_passant: bool,
    is_castle: bool,
}

impl Move {
    /// Builds the move of whatever piece stands on `start`.
    ///
    /// A pawn reaching the far row promotes to a queen.
    pub fn new(start: Square, end: Square, board: &Board) -> ChessResult<Self> {
        let piece = board.get(start).ok_or_else(|| {
            ChessError::InvalidNotation(format!(
                "no piece on {}",
                square_to_algebraic(start)
            ))
        })?;
        Ok(Self::build(piece, start, end, board, None))
    }

    /// Like [`Move::new`] but promotes to `promotion` when the move promotes.
    pub fn with_promotion(
        start: Square,
        end: Square,
        board: &Board,
        promotion: PieceKind,
    ) -> ChessResult<Self> {
        let piece = board.get(start).ok_or_else(|| {
            ChessError::InvalidNotation(format!(
                "no piece on {}",
                square_to_algebraic(start)
            ))
        })?;
        Ok(Self::build(piece, start, end, board, Some(promotion)))
    }

    pub(crate) fn build(
        piece_moved: Piece,
        start: Square,
        end: Square,
        board: &Board,
        promotion: Option<PieceKind>,
    ) -> Self {
        let is_pawn = piece_moved.kind == PieceKind::Pawn;
        let is_en_passant = is_pawn && start.col != end.col && board.is_empty(end);
        let piece_captured = if is_en_passant {
            Some(Piece::new(piece_moved.color.opposite(), PieceKind::Pawn))
        } else {
            board.get(end)
        };
        let promotion = if is_pawn && end.row == piece_moved.color.promotion_row() {
            Some(promotion.unwrap_or(PieceKind::Queen))
        } else {
            None
        };
        let is_castle = piece_moved.kind == PieceKind::King
            && start.row == end.row
            && start.col.abs_diff(end.col) == 2;

        Self {
            start,
            end,
            piece_moved,
            piece_captured,
            promotion,
            is_en_passant,
            is_castle,
        }
    }

    #[inline]
    pub fn start(&self) -> Square {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Square {
        self.end
    }

    #[inline]
    pub fn piece_moved(&self) -> Piece {
        self.piece_moved
    }

    #[inline]
    pub fn piece_captured(&self) -> Option<Piece> {
        self.piece_captured
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline]
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.is_en_passant
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.is_castle
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.piece_captured.is_some()
    }

    #[inline]
    pub fn is_double_pawn_push(&self) -> bool {
        self.piece_moved.kind == PieceKind::Pawn && self.start.row.abs_diff(self.end.row) == 2
    }

    /// Square of the pawn removed by an en-passant capture.
    #[inline]
    pub fn en_passant_capture_square(&self) -> Square {
        Square {
            row: self.start.row,
            col: self.end.col,
        }
    }

    /// Origin followed by destination, e.g. `e2e4`.
    pub fn chess_notation(&self) -> String {
        format!(
            "{}{}",
            square_to_algebraic(self.start),
            square_to_algebraic(self.end)
        )
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chess_notation())
    }
}
