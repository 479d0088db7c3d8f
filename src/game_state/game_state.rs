//! Core mutable game state.
//!
//! `GameState` owns the board, the side to move, king locations, castling
//! rights, the en-passant target and the reversible move log. Legal-move
//! generation refreshes the check/pin analysis and the terminal flags as a
//! side effect; apply/undo mutate the state in place.

use log::debug;

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::castle_rights::CastleRights;
use crate::game_state::chess_rules::{king_home, starting_board};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::{Check, Pin};
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::chess_move::Move;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Switches that change which moves the generator emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Emit rook, bishop and knight promotions next to the queen promotion.
    pub underpromotion: bool,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) king_locations: [Square; 2],
    pub(crate) castle_rights: CastleRights,
    pub(crate) en_passant_target: Option<Square>,

    // Outputs of legal-move generation; undo does not restore them.
    pub(crate) in_check: bool,
    pub(crate) pins: Vec<Pin>,
    pub(crate) checks: Vec<Check>,
    pub(crate) checkmate: bool,
    pub(crate) stalemate: bool,
    pub(crate) legal_moves: Option<Vec<Move>>,

    // History stacks; both logs hold one entry more than `move_log`.
    pub(crate) move_log: Vec<Move>,
    pub(crate) castle_rights_log: Vec<CastleRights>,
    pub(crate) en_passant_log: Vec<Option<Square>>,

    pub options: GenerationOptions,
    pub(crate) initial_halfmove_clock: u16,
    pub(crate) initial_fullmove_number: u16,
}

impl GameState {
    /// Standard starting position, Light to move, all castling rights.
    pub fn new_game() -> Self {
        let board = starting_board();
        Self {
            board,
            side_to_move: Color::Light,
            king_locations: [
                king_home(Color::Light),
                king_home(Color::Dark),
            ],
            castle_rights: CastleRights::all(),
            en_passant_target: None,
            in_check: false,
            pins: Vec::new(),
            checks: Vec::new(),
            checkmate: false,
            stalemate: false,
            legal_moves: None,
            move_log: Vec::new(),
            castle_rights_log: vec![CastleRights::all()],
            en_passant_log: vec![None],
            options: GenerationOptions::default(),
            initial_halfmove_clock: 0,
            initial_fullmove_number: 1,
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    /// Builds a state from an arbitrary setup. Each side needs exactly one king.
    pub(crate) fn from_setup(
        board: Board,
        side_to_move: Color,
        castle_rights: CastleRights,
        en_passant_target: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> ChessResult<Self> {
        let mut king_locations = [Square { row: 0, col: 0 }; 2];
        for color in [Color::Light, Color::Dark] {
            let kings: Vec<Square> = board
                .pieces()
                .filter(|(_, piece)| piece.is(color, PieceKind::King))
                .map(|(sq, _)| sq)
                .collect();
            if kings.len() != 1 {
                return Err(ChessError::InvalidFen(format!(
                    "{} must have exactly one king, found {}",
                    color.name(),
                    kings.len()
                )));
            }
            king_locations[color.index()] = kings[0];
        }

        Ok(Self {
            board,
            side_to_move,
            king_locations,
            castle_rights,
            en_passant_target,
            in_check: false,
            pins: Vec::new(),
            checks: Vec::new(),
            checkmate: false,
            stalemate: false,
            legal_moves: None,
            move_log: Vec::new(),
            castle_rights_log: vec![castle_rights],
            en_passant_log: vec![en_passant_target],
            options: GenerationOptions::default(),
            initial_halfmove_clock: halfmove_clock,
            initial_fullmove_number: fullmove_number.max(1),
        })
    }

    /// Discards the current game and starts over from the standard position.
    pub fn reset(&mut self) {
        let options = self.options;
        *self = Self::new_game();
        self.options = options;
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self.legal_moves = None;
        self
    }

    /// Legal moves for the side to move, in generation order.
    ///
    /// Also refreshes the in-check, pin, check, checkmate and stalemate state.
    pub fn get_legal_moves(&mut self) -> Vec<Move> {
        let moves = generate_legal_moves(self);
        self.legal_moves = Some(moves.clone());
        moves
    }

    /// Legal moves starting on `square`, for highlighting.
    pub fn legal_moves_from(&mut self, square: Square) -> Vec<Move> {
        let cached = match &self.legal_moves {
            Some(moves) => moves.clone(),
            None => self.get_legal_moves(),
        };
        cached.into_iter().filter(|mv| mv.start() == square).collect()
    }

    /// Looks up the legal move matching the coordinates and promotion piece.
    ///
    /// `promotion == None` selects the default (queen) promotion.
    pub fn find_legal_move(
        &mut self,
        start: Square,
        end: Square,
        promotion: Option<PieceKind>,
    ) -> Option<Move> {
        if self.legal_moves.is_none() {
            self.get_legal_moves();
        }
        let wanted = promotion.unwrap_or(PieceKind::Queen);
        self.legal_moves.as_deref().and_then(|moves| {
            moves
                .iter()
                .find(|mv| {
                    mv.start() == start
                        && mv.end() == end
                        && mv.promotion().map_or(true, |kind| kind == wanted)
                })
                .copied()
        })
    }

    /// Applies a member of the current legal-move set.
    pub fn apply_move(&mut self, mv: &Move) -> ChessResult<()> {
        if self.legal_moves.is_none() {
            self.get_legal_moves();
        }

        let chosen = self.legal_moves.as_deref().and_then(|moves| {
            moves
                .iter()
                .find(|legal| *legal == mv && legal.promotion() == mv.promotion())
                .copied()
        });

        let Some(chosen) = chosen else {
            return Err(ChessError::InvalidMove {
                notation: mv.chess_notation(),
            });
        };

        debug!("apply {} for {}", chosen, self.side_to_move.name());
        make_move(self, chosen);
        Ok(())
    }

    /// Reverts the most recent move and returns it.
    pub fn undo_move(&mut self) -> ChessResult<Move> {
        let mv = unmake_move(self).ok_or(ChessError::EmptyHistory)?;
        debug!("undo {}", mv);
        Ok(mv)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.get(square)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn king_location(&self, color: Color) -> Square {
        self.king_locations[color.index()]
    }

    #[inline]
    pub fn castle_rights(&self) -> CastleRights {
        self.castle_rights
    }

    #[inline]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// In-check flag as of the last legal-move generation.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    #[inline]
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    #[inline]
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    #[inline]
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    #[inline]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    #[inline]
    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    #[inline]
    pub fn castle_rights_log(&self) -> &[CastleRights] {
        &self.castle_rights_log
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.checkmate {
            Some(GameOutcome::Checkmate {
                winner: self.side_to_move.opposite(),
            })
        } else if self.stalemate {
            Some(GameOutcome::Stalemate)
        } else {
            None
        }
    }

    /// Half-move clock derived from the log (plies since the last pawn move or capture).
    pub fn halfmove_clock(&self) -> u16 {
        let mut quiet = 0u16;
        for mv in self.move_log.iter().rev() {
            if mv.piece_moved().kind == PieceKind::Pawn || mv.is_capture() {
                return quiet;
            }
            quiet = quiet.saturating_add(1);
        }
        self.initial_halfmove_clock.saturating_add(quiet)
    }

    pub fn fullmove_number(&self) -> u16 {
        let setup_side = if self.move_log.len() % 2 == 0 {
            self.side_to_move
        } else {
            self.side_to_move.opposite()
        };
        let plies = self.move_log.len() + usize::from(setup_side == Color::Dark);
        self.initial_fullmove_number
            .saturating_add((plies / 2) as u16)
    }

    #[inline]
    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}

#[cfg(test)]
mod tests {
    use super::{GameOutcome, GameState};
    use crate::chess_errors::ChessError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, PieceKind, Square};
    use crate::moves::chess_move::Move;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    fn play(game: &mut GameState, from: &str, to: &str) {
        game.get_legal_moves();
        let mv = game
            .find_legal_move(sq(from), sq(to), None)
            .unwrap_or_else(|| panic!("{from}{to} should be legal"));
        game.apply_move(&mv).expect("legal move should apply");
    }

    #[test]
    fn new_game_matches_starting_fen() {
        let game = GameState::new_game();
        assert_eq!(game.to_fen(), STARTING_POSITION_FEN);
        assert_eq!(game.king_location(Color::Light), sq("e1"));
        assert_eq!(game.king_location(Color::Dark), sq("e8"));
        assert_eq!(game.castle_rights_log().len(), 1);
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let mut game = GameState::new_game();
        assert_eq!(game.get_legal_moves().len(), 20);
        assert!(!game.in_check());
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn apply_rejects_moves_outside_the_legal_set() {
        let mut game = GameState::new_game();
        game.get_legal_moves();
        let illegal = Move::new(sq("e2"), sq("e5"), game.board()).expect("move should build");
        assert!(matches!(
            game.apply_move(&illegal),
            Err(ChessError::InvalidMove { .. })
        ));
        assert!(game.move_log().is_empty());
    }

    #[test]
    fn undo_on_empty_history_fails() {
        let mut game = GameState::new_game();
        assert_eq!(game.undo_move(), Err(ChessError::EmptyHistory));
    }

    #[test]
    fn logs_grow_in_lockstep_with_moves() {
        let mut game = GameState::new_game();
        play(&mut game, "e2", "e4");
        play(&mut game, "e7", "e5");
        assert_eq!(game.move_log().len(), 2);
        assert_eq!(game.castle_rights_log().len(), 3);

        game.undo_move().expect("undo should succeed");
        assert_eq!(game.move_log().len(), 1);
        assert_eq!(game.castle_rights_log().len(), 2);
        assert_eq!(game.en_passant_target(), Some(sq("e3")));
    }

    #[test]
    fn en_passant_is_only_available_on_the_next_ply() {
        let mut game = GameState::new_game();
        play(&mut game, "e2", "e4");
        play(&mut game, "a7", "a6");
        play(&mut game, "e4", "e5");
        play(&mut game, "d7", "d5");

        assert_eq!(game.en_passant_target(), Some(sq("d6")));
        let capture = game
            .find_legal_move(sq("e5"), sq("d6"), None)
            .expect("e5d6 should be legal right after d7d5");
        assert!(capture.is_en_passant());
        assert_eq!(
            capture.piece_captured().map(|piece| (piece.color, piece.kind)),
            Some((Color::Dark, PieceKind::Pawn))
        );

        play(&mut game, "a2", "a3");
        assert_eq!(game.en_passant_target(), None);
        play(&mut game, "a6", "a5");
        assert_eq!(game.en_passant_target(), None);

        let moves = game.get_legal_moves();
        assert!(!moves
            .iter()
            .any(|mv| mv.start() == sq("e5") && mv.end() == sq("d6")));
        assert!(!moves.iter().any(Move::is_en_passant));
    }

    #[test]
    fn regeneration_after_undo_restores_the_check_analysis() {
        let mut game =
            GameState::from_fen("4k3/8/8/8/8/8/4r3/R3K3 w - - 0 1").expect("FEN should parse");
        game.get_legal_moves();
        let before = (game.in_check(), game.pins().to_vec(), game.checks().to_vec());
        assert!(before.0);

        play(&mut game, "e1", "d1");
        game.get_legal_moves();
        game.undo_move().expect("undo should succeed");
        game.get_legal_moves();

        assert_eq!(
            (game.in_check(), game.pins().to_vec(), game.checks().to_vec()),
            before
        );
    }

    #[test]
    fn fools_mate_reports_checkmate_for_dark() {
        let mut game = GameState::new_game();
        play(&mut game, "f2", "f3");
        play(&mut game, "e7", "e5");
        play(&mut game, "g2", "g4");
        play(&mut game, "d8", "h4");

        assert!(game.get_legal_moves().is_empty());
        assert!(game.in_check());
        assert!(game.is_checkmate());
        assert!(!game.is_stalemate());
        assert_eq!(
            game.outcome(),
            Some(GameOutcome::Checkmate {
                winner: Color::Dark
            })
        );
    }

    #[test]
    fn undo_after_mate_clears_terminal_flags_on_regeneration() {
        let mut game = GameState::new_game();
        play(&mut game, "f2", "f3");
        play(&mut game, "e7", "e5");
        play(&mut game, "g2", "g4");
        play(&mut game, "d8", "h4");
        game.get_legal_moves();
        assert!(game.is_checkmate());

        game.undo_move().expect("undo should succeed");
        assert!(!game.get_legal_moves().is_empty());
        assert!(!game.is_checkmate());
    }

    #[test]
    fn reset_restores_start_and_keeps_options() {
        let mut game = GameState::new_game();
        game.options.underpromotion = true;
        play(&mut game, "d2", "d4");
        game.reset();

        assert!(game.move_log().is_empty());
        assert_eq!(game.to_fen(), STARTING_POSITION_FEN);
        assert!(game.options.underpromotion);
    }

    #[test]
    fn find_legal_move_selects_requested_promotion() {
        let mut game = GameState::from_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1")
            .expect("FEN should parse");
        game.options.underpromotion = true;
        game.get_legal_moves();

        let knight = game
            .find_legal_move(sq("e7"), sq("e8"), Some(PieceKind::Knight))
            .expect("knight promotion should be legal");
        assert_eq!(knight.promotion(), Some(PieceKind::Knight));

        let default = game
            .find_legal_move(sq("e7"), sq("e8"), None)
            .expect("queen promotion should be legal");
        assert_eq!(default.promotion(), Some(PieceKind::Queen));
    }

    #[test]
    fn clocks_follow_the_move_log() {
        let mut game = GameState::new_game();
        play(&mut game, "g1", "f3");
        play(&mut game, "g8", "f6");
        assert_eq!(game.halfmove_clock(), 2);
        assert_eq!(game.fullmove_number(), 2);
        play(&mut game, "e2", "e4");
        assert_eq!(game.halfmove_clock(), 0);
        assert_eq!(game.fullmove_number(), 2);
    }
}
