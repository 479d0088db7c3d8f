use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::square_to_algebraic;

/// Six-field FEN for the current position.
pub fn generate_fen(game_state: &GameState) -> String {
    let placement = (0..8u8)
        .map(|row| rank_field(game_state.board(), row))
        .collect::<Vec<_>>()
        .join("/");
    let side = if game_state.side_to_move() == Color::Light {
        'w'
    } else {
        'b'
    };
    let en_passant = game_state
        .en_passant_target()
        .map_or_else(|| "-".to_owned(), square_to_algebraic);

    format!(
        "{placement} {side} {} {en_passant} {} {}",
        castling_field(game_state.castle_rights()),
        game_state.halfmove_clock(),
        game_state.fullmove_number()
    )
}

/// One rank, runs of empty squares collapsed into a digit.
fn rank_field(board: &Board, row: u8) -> String {
    let mut field = String::with_capacity(8);
    let mut gap = 0u32;

    for col in 0..8u8 {
        match board.get(Square { row, col }) {
            None => gap += 1,
            Some(piece) => {
                if let Some(digit) = char::from_digit(gap, 10).filter(|_| gap > 0) {
                    field.push(digit);
                }
                gap = 0;
                field.push(fen_letter(piece));
            }
        }
    }
    if let Some(digit) = char::from_digit(gap, 10).filter(|_| gap > 0) {
        field.push(digit);
    }

    field
}

fn fen_letter(piece: Piece) -> char {
    let letter = match piece.kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    if piece.color == Color::Light {
        letter.to_ascii_uppercase()
    } else {
        letter
    }
}

fn castling_field(rights: CastleRights) -> String {
    let field: String = [
        (rights.light_kingside, 'K'),
        (rights.light_queenside, 'Q'),
        (rights.dark_kingside, 'k'),
        (rights.dark_queenside, 'q'),
    ]
    .into_iter()
    .filter_map(|(held, letter)| held.then_some(letter))
    .collect();

    if field.is_empty() {
        "-".to_owned()
    } else {
        field
    }
}
