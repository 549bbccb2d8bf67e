use crate::chess::{File, ParseFileError, ParseRankError, Rank};
use derive_more::{Display, Error, From};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// A square on the chess board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Square(#[cfg_attr(test, strategy(0u8..64))] u8);

impl Square {
    /// Constructs [`Square`] from a pair of [`File`] and [`Rank`].
    #[inline(always)]
    pub fn new(f: File, r: Rank) -> Self {
        Square(f.get() as u8 | (r.get() as u8) << 3)
    }

    /// This square's [`File`].
    #[inline(always)]
    pub fn file(&self) -> File {
        File::ALL[(self.0 & 0b111) as usize]
    }

    /// This square's [`Rank`].
    #[inline(always)]
    pub fn rank(&self) -> Rank {
        Rank::ALL[(self.0 >> 3) as usize]
    }

    /// A unique index in the range `0..64`, `a1` is `0` and `h8` is `63`.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// The square displaced by a number of files and ranks, if still on the board.
    #[inline(always)]
    pub fn offset(&self, files: i8, ranks: i8) -> Option<Self> {
        let f = File::new(self.file().get() + files)?;
        let r = Rank::new(self.rank().get() + ranks)?;
        Some(Square::new(f, r))
    }

    /// Whether this is one of the light squares.
    ///
    /// The corner `a1` is dark, `h1` is light.
    #[inline(always)]
    pub fn is_light(&self) -> bool {
        (self.file().get() + self.rank().get()) % 2 == 1
    }

    /// An iterator over all squares from `a1` to `h8`, rank by rank.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Square> + ExactSizeIterator {
        (0..64).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.file(), f)?;
        fmt::Display::fmt(&self.rank(), f)?;
        Ok(())
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseSquareError {
    #[display("failed to parse square")]
    InvalidFile(ParseFileError),
    #[display("failed to parse square")]
    InvalidRank(ParseRankError),
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.char_indices().nth(1).map_or_else(|| s.len(), |(i, _)| i);
        Ok(Square::new(s[..i].parse()?, s[i..].parse()?))
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}
