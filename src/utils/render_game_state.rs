//! Terminal-oriented Unicode board renderer.
//!
//! Draws the mailbox from Light's side (rank 8 on top) for the controller,
//! tests and debugging.

use crate::game_state::{chess_types::*, game_state::GameState};

/// Render the board to a Unicode string for terminal output.
pub fn render_game_state(game_state: &GameState) -> String {
    render_highlighted(game_state, &[])
}

/// Like [`render_game_state`], marking `targets` with `•` when empty and
/// `×` when occupied.
pub fn render_highlighted(game_state: &GameState, targets: &[Square]) -> String {
    let board = game_state.board();
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for row in 0..8u8 {
        let rank = char::from(b'8' - row);
        out.push(rank);
        out.push(' ');

        for col in 0..8u8 {
            let square = Square { row, col };
            let highlighted = targets.contains(&square);
            let glyph = match (board.get(square), highlighted) {
                (Some(_), true) => '×',
                (Some(piece), false) => piece_to_unicode(piece),
                (None, true) => '•',
                (None, false) => '·',
            };
            out.push(glyph);

            if col < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(rank);
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

fn piece_to_unicode(piece: Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::Light, PieceKind::Pawn) => '♙',
        (Color::Light, PieceKind::Knight) => '♘',
        (Color::Light, PieceKind::Bishop) => '♗',
        (Color::Light, PieceKind::Rook) => '♖',
        (Color::Light, PieceKind::Queen) => '♕',
        (Color::Light, PieceKind::King) => '♔',
        (Color::Dark, PieceKind::Pawn) => '♟',
        (Color::Dark, PieceKind::Knight) => '♞',
        (Color::Dark, PieceKind::Bishop) => '♝',
        (Color::Dark, PieceKind::Rook) => '♜',
        (Color::Dark, PieceKind::Queen) => '♛',
        (Color::Dark, PieceKind::King) => '♚',
    }
}

#[cfg(test)]
mod tests {
    use super::{render_game_state, render_highlighted};
    use crate::game_state::chess_types::Square;
    use crate::game_state::game_state::GameState;

    #[test]
    fn start_position_renders_rank_eight_first() {
        let rendered = render_game_state(&GameState::new_game());
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 10);
        assert_eq!(lines[1], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ 8");
        assert_eq!(lines[4], "5 · · · · · · · · 5");
        assert_eq!(lines[8], "1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ 1");
    }

    #[test]
    fn highlights_mark_empty_and_occupied_targets() {
        let game = GameState::new_game();
        let e3 = Square { row: 5, col: 4 };
        let e7 = Square { row: 1, col: 4 };
        let rendered = render_highlighted(&game, &[e3, e7]);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[2], "7 ♟ ♟ ♟ ♟ × ♟ ♟ ♟ 7");
        assert_eq!(lines[6], "3 · · · · • · · · 3");
    }
}
