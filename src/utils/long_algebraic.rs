//! Coordinate move notation (`e2e4`, `e7e8n`) for the controller.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::chess_move::Move;
use crate::utils::algebraic::algebraic_to_square;

/// Coordinate notation with the promotion letter appended when the move
/// promotes to something other than a queen.
pub fn move_to_long_algebraic(mv: &Move) -> String {
    let mut out = mv.chess_notation();
    if let Some(kind) = mv.promotion().filter(|kind| *kind != PieceKind::Queen) {
        out.push(promotion_to_char(kind));
    }
    out
}

/// Resolves `text` against the legal moves of `game_state`.
///
/// A missing promotion letter selects the queen promotion.
pub fn long_algebraic_to_move(text: &str, game_state: &mut GameState) -> ChessResult<Move> {
    let trimmed = text.trim();
    if !trimmed.is_ascii() || (trimmed.len() != 4 && trimmed.len() != 5) {
        return Err(ChessError::InvalidNotation(trimmed.to_owned()));
    }

    let start = algebraic_to_square(&trimmed[0..2])?;
    let end = algebraic_to_square(&trimmed[2..4])?;
    let promotion = match trimmed[4..].chars().next() {
        Some(ch) => Some(promotion_from_char(ch).ok_or_else(|| {
            ChessError::InvalidNotation(format!("unknown promotion piece '{ch}' in {trimmed}"))
        })?),
        None => None,
    };

    game_state
        .find_legal_move(start, end, promotion)
        .ok_or_else(|| ChessError::InvalidMove {
            notation: trimmed.to_owned(),
        })
}

fn promotion_to_char(kind: PieceKind) -> char {
    match kind {
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        _ => 'q',
    }
}

fn promotion_from_char(ch: char) -> Option<PieceKind> {
    match ch.to_ascii_lowercase() {
        'q' => Some(PieceKind::Queen),
        'r' => Some(PieceKind::Rook),
        'b' => Some(PieceKind::Bishop),
        'n' => Some(PieceKind::Knight),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{long_algebraic_to_move, move_to_long_algebraic};
    use crate::chess_errors::ChessError;
    use crate::game_state::chess_types::PieceKind;
    use crate::game_state::game_state::{GameState, GenerationOptions};

    #[test]
    fn parses_quiet_moves_against_the_legal_set() {
        let mut game = GameState::new_game();
        let mv = long_algebraic_to_move("e2e4", &mut game).expect("e2e4 should resolve");
        assert_eq!(move_to_long_algebraic(&mv), "e2e4");
        assert!(mv.is_double_pawn_push());
    }

    #[test]
    fn rejects_malformed_and_illegal_text() {
        let mut game = GameState::new_game();
        assert!(matches!(
            long_algebraic_to_move("e2", &mut game),
            Err(ChessError::InvalidNotation(_))
        ));
        assert!(matches!(
            long_algebraic_to_move("z2e4", &mut game),
            Err(ChessError::InvalidSquare(_))
        ));
        assert!(matches!(
            long_algebraic_to_move("e2e5", &mut game),
            Err(ChessError::InvalidMove { .. })
        ));
    }

    #[test]
    fn promotion_letter_selects_the_piece() {
        let mut game = GameState::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1")
            .expect("FEN should parse")
            .with_options(GenerationOptions {
                underpromotion: true,
            });

        let knight = long_algebraic_to_move("e7e8n", &mut game).expect("e7e8n should resolve");
        assert_eq!(knight.promotion(), Some(PieceKind::Knight));
        assert_eq!(move_to_long_algebraic(&knight), "e7e8n");

        let queen = long_algebraic_to_move("e7e8", &mut game).expect("e7e8 should resolve");
        assert_eq!(queen.promotion(), Some(PieceKind::Queen));
        assert_eq!(move_to_long_algebraic(&queen), "e7e8");

        assert!(matches!(
            long_algebraic_to_move("e7e8k", &mut game),
            Err(ChessError::InvalidNotation(_))
        ));
    }
}
