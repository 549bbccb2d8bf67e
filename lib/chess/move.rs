use crate::chess::{ParseSquareError, Piece, Square};
use derive_more::{Debug, Deref, Display, Error, From};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The side of the board a castling move heads to.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Wing {
    /// Castling towards the `h` file.
    #[display("O-O")]
    Short,
    /// Castling towards the `a` file.
    #[display("O-O-O")]
    Long,
}

/// What a move does besides relocating a piece.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum MoveKind {
    /// Relocates a piece to an empty square.
    Quiet,
    /// Removes the enemy [`Piece`] on the destination.
    Capture(Piece),
    /// Fuses a knight with a knight of the same color into a legion.
    MergeLegion,
    /// Fuses a rook with a bishop of the same color into an archon.
    FuseArchon,
    /// Offers an enemy knight a union instead of capturing it outright.
    ProposeChimera(Piece),
    /// Relocates the king together with one of its rooks.
    Castle(Wing),
}

/// A chess move in [pure coordinate notation].
///
/// [pure coordinate notation]: https://www.chessprogramming.org/Algebraic_Chess_Notation#Pure_coordinate_notation
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[cfg_attr(test, filter(#self.0 != #self.1))]
#[debug("Move({self})")]
#[display("{_0}{_1}")]
pub struct Move(pub Square, pub Square);

impl Move {
    /// The source [`Square`].
    #[inline(always)]
    pub fn whence(&self) -> Square {
        self.0
    }

    /// The destination [`Square`].
    #[inline(always)]
    pub fn whither(&self) -> Square {
        self.1
    }
}

/// The reason why parsing [`Move`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseMoveError {
    #[display("failed to parse move, expected two squares such as `e2e4`")]
    InvalidSyntax,
    #[display("failed to parse move")]
    InvalidSquare(ParseSquareError),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.char_indices().nth(2).map(|(i, _)| i);
        let Some(i) = i.filter(|_| s.chars().count() == 4) else {
            return Err(ParseMoveError::InvalidSyntax);
        };

        Ok(Move(s[..i].parse()?, s[i..].parse()?))
    }
}

/// A [`Move`] annotated with what it does.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Deref)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[debug("MoveContext({_0}, {_1:?})")]
#[display("{_0}")]
pub struct MoveContext(#[deref] pub Move, pub MoveKind);

impl MoveContext {
    /// What this move does.
    #[inline(always)]
    pub fn kind(&self) -> MoveKind {
        self.1
    }

    /// The enemy [`Piece`] removed or courted by this move, if any.
    pub fn capture(&self) -> Option<Piece> {
        match self.kind() {
            MoveKind::Capture(p) | MoveKind::ProposeChimera(p) => Some(p),
            _ => None,
        }
    }

    /// Whether this move targets an enemy piece.
    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        self.capture().is_some()
    }

    /// Whether this move raises a diplomatic proposal.
    #[inline(always)]
    pub fn is_proposal(&self) -> bool {
        matches!(self.kind(), MoveKind::ProposeChimera(_))
    }

    /// Whether this move fuses two friendly pieces.
    #[inline(always)]
    pub fn is_fusion(&self) -> bool {
        matches!(self.kind(), MoveKind::MergeLegion | MoveKind::FuseArchon)
    }

    /// Whether this is a castling move.
    #[inline(always)]
    pub fn is_castling(&self) -> bool {
        matches!(self.kind(), MoveKind::Castle(_))
    }
}
