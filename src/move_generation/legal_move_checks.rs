//! Check, pin and attack detection by ray-casting from a target square.
//!
//! Everything here is a pure function of a board: nothing is cached and no
//! state is mutated, so callers can probe hypothetical king squares freely.

use crate::game_state::chess_types::*;

/// An allied piece that may only move along `direction` (or its opposite).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub square: Square,
    /// Direction from the king towards the pinned piece.
    pub direction: Direction,
}

/// An enemy piece currently attacking the king.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
    pub square: Square,
    pub piece: PieceKind,
    /// Ray from the king towards the checker; `None` for knight checks.
    pub direction: Option<Direction>,
}

impl Check {
    /// Squares a non-king move may land on to resolve this check: the
    /// checker's own square plus, for sliding checks, every square between.
    pub fn resolving_squares(&self, king: Square) -> Vec<Square> {
        let Some(direction) = self.direction else {
            return vec![self.square];
        };

        let mut squares = Vec::with_capacity(7);
        let mut cursor = king;
        while let Some(next) = cursor.step(direction) {
            squares.push(next);
            if next == self.square {
                break;
            }
            cursor = next;
        }
        squares
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinsAndChecks {
    pub pins: Vec<Pin>,
    pub checks: Vec<Check>,
}

impl PinsAndChecks {
    #[inline]
    pub fn in_check(&self) -> bool {
        !self.checks.is_empty()
    }

    pub fn pin_direction(&self, square: Square) -> Option<Direction> {
        self.pins
            .iter()
            .find(|pin| pin.square == square)
            .map(|pin| pin.direction)
    }
}

/// True if an `attacker` piece of `kind`, found `distance` squares from the
/// target along `direction`, attacks the target.
#[inline]
fn attacks_along_ray(kind: PieceKind, attacker: Color, direction: Direction, distance: u8) -> bool {
    match kind {
        PieceKind::Rook => direction.is_orthogonal(),
        PieceKind::Bishop => !direction.is_orthogonal(),
        PieceKind::Queen => true,
        PieceKind::King => distance == 1,
        // A pawn attacks diagonally forward, so it sits one row "behind" the target
        // from its own point of view.
        PieceKind::Pawn => {
            distance == 1
                && !direction.is_orthogonal()
                && direction.d_row == -attacker.pawn_direction()
        }
        PieceKind::Knight => false,
    }
}

/// Scans outward from `color`'s king for pins on allied pieces and checks
/// from enemy pieces.
pub fn find_pins_and_checks(board: &Board, king: Square, color: Color) -> PinsAndChecks {
    let enemy = color.opposite();
    let mut result = PinsAndChecks::default();

    for direction in ALL_DIRECTIONS {
        let mut possible_pin: Option<Square> = None;
        let mut cursor = king;
        let mut distance = 0u8;

        while let Some(next) = cursor.step(direction) {
            cursor = next;
            distance += 1;

            let Some(piece) = board.get(next) else {
                continue;
            };

            if piece.color == color {
                if possible_pin.is_some() {
                    break;
                }
                possible_pin = Some(next);
                continue;
            }

            if attacks_along_ray(piece.kind, enemy, direction, distance) {
                match possible_pin {
                    None => result.checks.push(Check {
                        square: next,
                        piece: piece.kind,
                        direction: Some(direction),
                    }),
                    Some(pinned) => result.pins.push(Pin {
                        square: pinned,
                        direction,
                    }),
                }
            }
            break;
        }
    }

    for (d_row, d_col) in KNIGHT_OFFSETS {
        let Some(target) = king.offset(d_row, d_col) else {
            continue;
        };
        if board
            .get(target)
            .is_some_and(|piece| piece.is(enemy, PieceKind::Knight))
        {
            result.checks.push(Check {
                square: target,
                piece: PieceKind::Knight,
                direction: None,
            });
        }
    }

    result
}

/// True if any `attacker` piece attacks `square`.
#[inline]
pub fn square_attacked(board: &Board, square: Square, attacker: Color) -> bool {
    square_attacked_ignoring(board, square, attacker, None)
}

/// Like [`square_attacked`], treating `ignore` as empty.
///
/// Passing the king's origin lets callers test a king destination without
/// the king shadowing rays that run through its current square.
pub fn square_attacked_ignoring(
    board: &Board,
    square: Square,
    attacker: Color,
    ignore: Option<Square>,
) -> bool {
    for direction in ALL_DIRECTIONS {
        let mut cursor = square;
        let mut distance = 0u8;

        while let Some(next) = cursor.step(direction) {
            cursor = next;
            distance += 1;

            if Some(next) == ignore {
                continue;
            }
            let Some(piece) = board.get(next) else {
                continue;
            };

            if piece.color == attacker && attacks_along_ray(piece.kind, attacker, direction, distance)
            {
                return true;
            }
            break;
        }
    }

    KNIGHT_OFFSETS.iter().any(|&(d_row, d_col)| {
        square
            .offset(d_row, d_col)
            .filter(|target| Some(*target) != ignore)
            .and_then(|target| board.get(target))
            .is_some_and(|piece| piece.is(attacker, PieceKind::Knight))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    #[test]
    fn bishop_pins_knight_to_king() {
        let game = parse_fen("4k3/8/8/b7/8/2N5/8/4K3 w - - 0 1").expect("FEN should parse");
        let analysis = find_pins_and_checks(game.board(), sq("e1"), Color::Light);

        assert!(!analysis.in_check());
        assert_eq!(analysis.pins.len(), 1);
        assert_eq!(analysis.pins[0].square, sq("c3"));
        assert_eq!(analysis.pin_direction(sq("c3")), Some(Direction::new(-1, -1)));
    }

    #[test]
    fn two_allied_pieces_on_a_ray_are_not_pinned() {
        let game = parse_fen("4k3/8/8/b7/8/2N5/3B4/4K3 w - - 0 1").expect("FEN should parse");
        let analysis = find_pins_and_checks(game.board(), sq("e1"), Color::Light);
        assert!(analysis.pins.is_empty());
    }

    #[test]
    fn detects_double_check_from_rook_and_knight() {
        let game = parse_fen("4r2k/8/8/8/8/3n4/8/4K3 w - - 0 1").expect("FEN should parse");
        let analysis = find_pins_and_checks(game.board(), sq("e1"), Color::Light);

        assert_eq!(analysis.checks.len(), 2);
        assert!(analysis
            .checks
            .iter()
            .any(|check| check.piece == PieceKind::Knight && check.direction.is_none()));
    }

    #[test]
    fn pawn_checks_only_in_its_capture_direction() {
        // Dark pawn on d2 attacks e1; a Dark pawn on d1's row behind the king does not.
        let checked = parse_fen("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1").expect("FEN should parse");
        let analysis = find_pins_and_checks(checked.board(), sq("e1"), Color::Light);
        assert_eq!(analysis.checks.len(), 1);
        assert_eq!(analysis.checks[0].piece, PieceKind::Pawn);

        let safe = parse_fen("4k3/8/8/8/8/4K3/3p4/8 w - - 0 1").expect("FEN should parse");
        let analysis = find_pins_and_checks(safe.board(), sq("e3"), Color::Light);
        assert!(!analysis.in_check());
    }

    #[test]
    fn resolving_squares_run_from_king_to_checker() {
        let game = parse_fen("4r2k/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let analysis = find_pins_and_checks(game.board(), sq("e1"), Color::Light);
        let squares = analysis.checks[0].resolving_squares(sq("e1"));

        assert_eq!(squares.first(), Some(&sq("e2")));
        assert_eq!(squares.last(), Some(&sq("e8")));
        assert_eq!(squares.len(), 7);
    }

    #[test]
    fn ignoring_the_king_exposes_xray_attacks() {
        let game = parse_fen("4k3/8/8/8/r3K3/8/8/8 w - - 0 1").expect("FEN should parse");
        let board = game.board();

        // With the king on e4, f4 is shadowed by the king itself.
        assert!(!square_attacked(board, sq("f4"), Color::Dark));
        assert!(square_attacked_ignoring(board, sq("f4"), Color::Dark, Some(sq("e4"))));
    }

    #[test]
    fn knight_and_king_attacks_are_detected() {
        let game = parse_fen("4k3/8/8/8/8/5n2/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(square_attacked(game.board(), sq("e1"), Color::Dark));
        assert!(square_attacked(game.board(), sq("d7"), Color::Dark));
        assert!(!square_attacked(game.board(), sq("a1"), Color::Dark));
    }
}
