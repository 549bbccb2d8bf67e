use crate::chess::{Color, File, Piece, Rank, Role, Square, Wing};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The castling rights of one side.
///
/// Each flag gates castling while it holds; rights are only ever revoked.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Rights {
    /// The royal unit has not moved.
    #[serde(rename = "k")]
    royal: bool,
    /// The rook on the `a` file has not moved.
    #[serde(rename = "l")]
    long: bool,
    /// The rook on the `h` file has not moved.
    #[serde(rename = "r")]
    short: bool,
}

impl Default for Rights {
    fn default() -> Self {
        Rights {
            royal: true,
            long: true,
            short: true,
        }
    }
}

/// The castling rights in a chess [`Position`][`crate::chess::Position`].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Castles {
    white: Rights,
    black: Rights,
}

impl Castles {
    /// No castling rights.
    pub fn none() -> Self {
        let mut castles = Castles::default();
        for side in Color::iter() {
            castles.forfeit(side);
        }

        castles
    }

    fn rights(&self, side: Color) -> &Rights {
        match side {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn rights_mut(&mut self, side: Color) -> &mut Rights {
        match side {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// Whether the given side may still castle towards a [`Wing`].
    #[inline(always)]
    pub fn has(&self, side: Color, wing: Wing) -> bool {
        let rights = self.rights(side);
        rights.royal
            && match wing {
                Wing::Short => rights.short,
                Wing::Long => rights.long,
            }
    }

    /// Whether the given side may still castle kingside.
    #[inline(always)]
    pub fn has_short(&self, side: Color) -> bool {
        self.has(side, Wing::Short)
    }

    /// Whether the given side may still castle queenside.
    #[inline(always)]
    pub fn has_long(&self, side: Color) -> bool {
        self.has(side, Wing::Long)
    }

    /// Revokes all rights of a side.
    pub fn forfeit(&mut self, side: Color) {
        self.rights_mut(side).royal = false;
    }

    /// Revokes the right to castle towards a [`Wing`].
    pub fn revoke(&mut self, side: Color, wing: Wing) {
        let rights = self.rights_mut(side);
        match wing {
            Wing::Short => rights.short = false,
            Wing::Long => rights.long = false,
        }
    }

    /// Updates the rights after a [`Piece`] leaves a [`Square`].
    ///
    /// Moving the king forfeits both wings, moving a rook off its corner revokes that wing.
    pub fn vacate(&mut self, p: Piece, whence: Square) {
        let side = p.color();

        match p.role() {
            Role::King => self.forfeit(side),
            Role::Rook if whence == Square::new(File::A, Rank::home(side)) => {
                self.revoke(side, Wing::Long)
            }
            Role::Rook if whence == Square::new(File::H, Rank::home(side)) => {
                self.revoke(side, Wing::Short)
            }
            _ => {}
        }
    }
}

/// Prints the rights FEN style, white uppercase, `-` if none.
impl fmt::Display for Castles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut any = false;

        for side in Color::iter() {
            for (wing, letter) in [(Wing::Short, 'K'), (Wing::Long, 'Q')] {
                if self.has(side, wing) {
                    any = true;
                    match side {
                        Color::White => write!(f, "{letter}")?,
                        Color::Black => write!(f, "{}", letter.to_ascii_lowercase())?,
                    }
                }
            }
        }

        if !any {
            f.write_str("-")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[test]
    fn all_rights_are_granted_at_start() {
        let castles = Castles::default();
        for side in Color::iter() {
            assert!(castles.has_short(side));
            assert!(castles.has_long(side));
        }
    }

    #[proptest]
    fn none_grants_no_rights(c: Color, w: Wing) {
        assert!(!Castles::none().has(c, w));
    }

    #[proptest]
    fn forfeiting_revokes_both_wings(mut cr: Castles, c: Color) {
        cr.forfeit(c);
        assert!(!cr.has_short(c));
        assert!(!cr.has_long(c));
    }

    #[proptest]
    fn revoking_one_wing_preserves_the_other(mut cr: Castles, c: Color, w: Wing) {
        let short = cr.has_short(c);
        let long = cr.has_long(c);
        cr.revoke(c, w);

        match w {
            Wing::Short => assert_eq!((cr.has_short(c), cr.has_long(c)), (false, long)),
            Wing::Long => assert_eq!((cr.has_short(c), cr.has_long(c)), (short, false)),
        }
    }

    #[proptest]
    fn rights_are_never_regained(mut cr: Castles, p: Piece, sq: Square, c: Color, w: Wing) {
        let before = cr.has(c, w);
        cr.vacate(p, sq);
        assert!(before || !cr.has(c, w));
    }

    #[proptest]
    fn moving_the_king_forfeits_castling(mut cr: Castles, c: Color, sq: Square) {
        cr.vacate(Piece::new(Role::King, c), sq);
        assert!(!cr.has_short(c) && !cr.has_long(c));
    }

    #[proptest]
    fn moving_a_rook_off_its_corner_revokes_its_wing(c: Color) {
        let mut cr = Castles::default();
        cr.vacate(Piece::new(Role::Rook, c), Square::new(File::H, Rank::home(c)));
        assert!(!cr.has_short(c));
        assert!(cr.has_long(c));
        assert!(cr.has_short(!c));
    }

    #[test]
    fn castles_are_printed_fen_style() {
        let mut cr = Castles::default();
        assert_eq!(cr.to_string(), "KQkq");
        cr.revoke(Color::White, Wing::Long);
        cr.forfeit(Color::Black);
        assert_eq!(cr.to_string(), "K");
        assert_eq!(Castles::none().to_string(), "-");
    }
}
