//! FEN-to-GameState parser.
//!
//! Accepts the full six-field form as well as the four-field form without
//! clocks (EPD style), in which case the clocks default to `0 1`.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

fn fen_error(message: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(message.into())
}

pub fn parse_fen(fen: &str) -> ChessResult<GameState> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() != 4 && parts.len() != 6 {
        return Err(fen_error(format!(
            "expected 4 or 6 fields, found {}",
            parts.len()
        )));
    }

    let board = parse_board(parts[0])?;
    let side_to_move = parse_side_to_move(parts[1])?;
    let castle_rights = parse_castle_rights(parts[2])?;
    let en_passant_target = parse_en_passant_square(parts[3], side_to_move, &board)?;

    let (halfmove_clock, fullmove_number) = if parts.len() == 6 {
        let halfmove = parts[4]
            .parse::<u16>()
            .map_err(|_| fen_error(format!("invalid halfmove clock: {}", parts[4])))?;
        let fullmove = parts[5]
            .parse::<u16>()
            .map_err(|_| fen_error(format!("invalid fullmove number: {}", parts[5])))?;
        (halfmove, fullmove)
    } else {
        (0, 1)
    };

    GameState::from_setup(
        board,
        side_to_move,
        castle_rights,
        en_passant_target,
        halfmove_clock,
        fullmove_number,
    )
}

fn parse_board(board_part: &str) -> ChessResult<Board> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(fen_error("board layout must contain 8 ranks"));
    }

    let mut board = Board::empty();

    // The first FEN rank is rank 8, which is row 0.
    for (row, rank_str) in ranks.iter().enumerate() {
        let mut col = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(fen_error(format!("invalid empty-square count '{ch}'")));
                }
                col += empty_count as usize;
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| fen_error(format!("invalid piece character '{ch}'")))?;

            if col >= 8 {
                return Err(fen_error(format!("rank {} has too many files", 8 - row)));
            }

            board.set(
                Square {
                    row: row as u8,
                    col: col as u8,
                },
                Some(piece),
            );
            col += 1;
        }

        if col != 8 {
            return Err(fen_error(format!("rank {} does not sum to 8 files", 8 - row)));
        }
    }

    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(fen_error(format!("invalid side-to-move field: {side_part}"))),
    }
}

fn parse_castle_rights(castling_part: &str) -> ChessResult<CastleRights> {
    let mut rights = CastleRights::none();
    if castling_part == "-" {
        return Ok(rights);
    }

    for ch in castling_part.chars() {
        match ch {
            'K' => rights.light_kingside = true,
            'Q' => rights.light_queenside = true,
            'k' => rights.dark_kingside = true,
            'q' => rights.dark_queenside = true,
            _ => return Err(fen_error(format!("invalid castling character: {ch}"))),
        }
    }

    Ok(rights)
}

/// The target must sit behind a pawn the opponent has just double-pushed:
/// on rank 6 with Light to move (rank 3 with Dark), empty, with the enemy
/// pawn one row further on and its origin square vacated.
fn parse_en_passant_square(
    en_passant_part: &str,
    side_to_move: Color,
    board: &Board,
) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .map_err(|_| fen_error(format!("invalid en-passant square: {en_passant_part}")))?;
    let pusher = side_to_move.opposite();
    let expected_row = (pusher.pawn_start_row() as i8 + pusher.pawn_direction()) as u8;
    if square.row != expected_row {
        return Err(fen_error(format!(
            "en-passant square {en_passant_part} does not fit {} to move",
            side_to_move.name()
        )));
    }

    let pushed = square.offset(pusher.pawn_direction(), 0);
    let origin = square.offset(-pusher.pawn_direction(), 0);
    let consistent = board.is_empty(square)
        && origin.is_some_and(|sq| board.is_empty(sq))
        && pushed.and_then(|sq| board.get(sq)) == Some(Piece::new(pusher, PieceKind::Pawn));
    if !consistent {
        return Err(fen_error(format!(
            "no double-pushed {} pawn behind en-passant square {en_passant_part}",
            pusher.name()
        )));
    }

    Ok(Some(square))
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some(Piece::new(color, kind))
}
