use crate::chess::{Color, File, MoveContext, MoveKind, Piece, Rank, Role, Square, Wing};
use derive_more::{Debug, Display, Error};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Write};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// The chess board.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[debug("Board({self})")]
pub struct Board([Option<Piece>; 64]);

impl Default for Board {
    fn default() -> Self {
        let mut board = Board::empty();

        for side in Color::iter() {
            board.deploy(side);
        }

        board
    }
}

impl Board {
    /// The officers in the order they are deployed on the home rank, from `a` to `h`.
    pub const ARMY: [Role; 8] = [
        Role::Rook,
        Role::Knight,
        Role::Bishop,
        Role::Queen,
        Role::King,
        Role::Bishop,
        Role::Knight,
        Role::Rook,
    ];

    /// A board without any pieces.
    #[inline(always)]
    pub fn empty() -> Self {
        Board([None; 64])
    }

    /// Deploys a fresh army of a [`Color`] on its home and pawn ranks.
    pub fn deploy(&mut self, side: Color) {
        for (f, role) in File::iter().zip(Self::ARMY) {
            self[Square::new(f, Rank::home(side))] = Some(Piece::new(role, side));
            self[Square::new(f, Rank::pawns(side))] = Some(Piece::new(Role::Pawn, side));
        }
    }

    /// An iterator over all pieces on the board.
    pub fn iter(&self) -> impl Iterator<Item = (Piece, Square)> + '_ {
        Square::iter().filter_map(|sq| Some((self[sq]?, sq)))
    }

    /// [`Square`]s occupied by pieces of a [`Color`].
    pub fn by_color(&self, c: Color) -> impl Iterator<Item = Square> + '_ {
        self.iter()
            .filter(move |(p, _)| p.color() == c)
            .map(|(_, sq)| sq)
    }

    /// [`Square`]s occupied by a [`Piece`].
    pub fn by_piece(&self, p: Piece) -> impl Iterator<Item = Square> + '_ {
        self.iter().filter(move |(q, _)| *q == p).map(|(_, sq)| sq)
    }

    /// The [`Color`] of the piece on the given [`Square`], if any.
    #[inline(always)]
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        self[sq].map(|p| p.color())
    }

    /// The [`Role`] of the piece on the given [`Square`], if any.
    #[inline(always)]
    pub fn role_on(&self, sq: Square) -> Option<Role> {
        self[sq].map(|p| p.role())
    }

    /// Moves whatever is on `whence` to `whither`, replacing any occupant.
    #[inline(always)]
    pub fn relocate(&mut self, whence: Square, whither: Square) {
        self[whither] = self[whence].take();
    }

    /// Transforms the board as prescribed by a move.
    ///
    /// Proposals are carried out as captures, which is how they resolve when declined.
    /// Returns whether a pawn was promoted.
    pub fn perform(&mut self, m: MoveContext) -> bool {
        let Some(piece) = self[m.whence()] else {
            return false;
        };

        match m.kind() {
            MoveKind::MergeLegion => {
                self[m.whence()] = None;
                self[m.whither()] = Some(Piece::new(Role::Legion, piece.color()));
                false
            }

            MoveKind::FuseArchon => {
                let archon = Role::archon(m.whence().is_light());
                self[m.whence()] = None;
                self[m.whither()] = Some(Piece::new(archon, piece.color()));
                false
            }

            MoveKind::Castle(wing) => {
                let home = m.whence().rank();
                let (corner, landing) = match wing {
                    Wing::Short => (File::H, File::F),
                    Wing::Long => (File::A, File::D),
                };

                self.relocate(m.whence(), m.whither());
                self.relocate(Square::new(corner, home), Square::new(landing, home));
                false
            }

            MoveKind::Quiet | MoveKind::Capture(_) | MoveKind::ProposeChimera(_) => {
                self.relocate(m.whence(), m.whither());

                let last = [Rank::First, Rank::Eighth].contains(&m.whither().rank());
                if piece.role() == Role::Pawn && last {
                    self[m.whither()] = Some(Piece::new(Role::Queen, piece.color()));
                    true
                } else {
                    false
                }
            }
        }
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    #[inline(always)]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.0[sq.index()]
    }
}

impl IndexMut<Square> for Board {
    #[inline(always)]
    fn index_mut(&mut self, sq: Square) -> &mut Self::Output {
        &mut self.0[sq.index()]
    }
}

/// Prints the piece placement from the eighth rank down, FEN style.
impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in Rank::iter().rev().enumerate() {
            if i > 0 {
                f.write_char('/')?;
            }

            let mut skip = 0;
            for sq in File::iter().map(|f| Square::new(f, r)) {
                match self[sq] {
                    None => skip += 1,
                    Some(p) => {
                        if skip > 0 {
                            write!(f, "{}", skip)?;
                            skip = 0;
                        }

                        write!(f, "{}", p)?;
                    }
                }
            }

            if skip > 0 {
                write!(f, "{}", skip)?;
            }
        }

        Ok(())
    }
}

/// The reason why parsing the piece placement failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseBoardError {
    #[display("expected 8 ranks separated by `/`")]
    InvalidRankCount,
    #[display("rank {_0} does not describe exactly 8 squares")]
    InvalidRankLength(#[error(not(source))] Rank),
    #[display("unexpected character `{_0}` in the piece placement")]
    InvalidCharacter(#[error(not(source))] char),
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<_> = s.split('/').collect();
        if segments.len() != 8 {
            return Err(ParseBoardError::InvalidRankCount);
        }

        let mut board = Board::empty();
        for (r, segment) in Rank::iter().rev().zip(segments) {
            let mut file = 0;
            for c in segment.chars() {
                let mut buffer = [0; 4];

                if let Some(skip) = c.to_digit(10).filter(|&d| d > 0) {
                    file += skip as i8;
                } else if let Ok(p) = Piece::from_str(c.encode_utf8(&mut buffer)) {
                    let f = File::new(file).ok_or(ParseBoardError::InvalidRankLength(r))?;
                    board[Square::new(f, r)] = Some(p);
                    file += 1;
                } else {
                    return Err(ParseBoardError::InvalidCharacter(c));
                }

                if file > 8 {
                    return Err(ParseBoardError::InvalidRankLength(r));
                }
            }

            if file != 8 {
                return Err(ParseBoardError::InvalidRankLength(r));
            }
        }

        Ok(board)
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}
