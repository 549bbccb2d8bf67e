use crate::chess::{Color, ParseRoleError, Role};
use derive_more::{Constructor, Display};
use std::fmt::{self, Formatter, Write};
use std::str::FromStr;

/// A chess [piece][`Role`] of a certain [`Color`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Constructor)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Piece {
    role: Role,
    color: Color,
}

impl Piece {
    /// This piece's [`Role`].
    #[inline(always)]
    pub fn role(&self) -> Role {
        self.role
    }

    /// This piece's [`Color`].
    #[inline(always)]
    pub fn color(&self) -> Color {
        self.color
    }

    /// The same role under the opposite [`Color`].
    #[inline(always)]
    pub fn flip(&self) -> Self {
        Piece::new(self.role, !self.color)
    }
}

/// Prints the piece letter, lowercase for white and uppercase for black.
impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.color {
            Color::White => f.write_char(self.role.letter()),
            Color::Black => f.write_char(self.role.letter().to_ascii_uppercase()),
        }
    }
}

impl FromStr for Piece {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = s.to_ascii_lowercase().parse()?;

        if s.chars().all(|c| c.is_ascii_lowercase()) {
            Ok(Piece::new(role, Color::White))
        } else if s.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(Piece::new(role, Color::Black))
        } else {
            Err(ParseRoleError)
        }
    }
}
