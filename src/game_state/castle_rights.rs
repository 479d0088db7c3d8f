use crate::game_state::chess_types::{Color, Square};

/// Snapshot of the four castling permissions.
///
/// Each flag only ever goes from `true` to `false` while moves are applied;
/// undoing a move restores the previous snapshot from the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastleRights {
    pub light_kingside: bool,
    pub light_queenside: bool,
    pub dark_kingside: bool,
    pub dark_queenside: bool,
}

impl Default for CastleRights {
    fn default() -> Self {
        Self::all()
    }
}

impl CastleRights {
    pub const fn all() -> Self {
        Self {
            light_kingside: true,
            light_queenside: true,
            dark_kingside: true,
            dark_queenside: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            light_kingside: false,
            light_queenside: false,
            dark_kingside: false,
            dark_queenside: false,
        }
    }

    #[inline]
    pub fn kingside(self, color: Color) -> bool {
        match color {
            Color::Light => self.light_kingside,
            Color::Dark => self.dark_kingside,
        }
    }

    #[inline]
    pub fn queenside(self, color: Color) -> bool {
        match color {
            Color::Light => self.light_queenside,
            Color::Dark => self.dark_queenside,
        }
    }

    pub fn revoke_all(&mut self, color: Color) {
        match color {
            Color::Light => {
                self.light_kingside = false;
                self.light_queenside = false;
            }
            Color::Dark => {
                self.dark_kingside = false;
                self.dark_queenside = false;
            }
        }
    }

    /// Drops the right tied to `color`'s rook corner at `square`, if any.
    pub fn revoke_rook_corner(&mut self, color: Color, square: Square) {
        if square.row != color.back_row() {
            return;
        }
        match (color, square.col) {
            (Color::Light, 0) => self.light_queenside = false,
            (Color::Light, 7) => self.light_kingside = false,
            (Color::Dark, 0) => self.dark_queenside = false,
            (Color::Dark, 7) => self.dark_kingside = false,
            _ => {}
        }
    }

    pub fn any(self) -> bool {
        self.light_kingside || self.light_queenside || self.dark_kingside || self.dark_queenside
    }
}
