use crate::chess::{Board, Color, Piece, Role, Square};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Tracks how long each chimera has served its current owner.
///
/// Keys always refer to squares holding a chimera.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Loyalty(BTreeMap<Square, u8>);

impl Loyalty {
    /// The number of completed turns after which a chimera changes sides.
    pub const FLIP: u8 = 2;

    /// The counter of the chimera on a [`Square`], if tracked.
    #[inline(always)]
    pub fn get(&self, sq: Square) -> Option<u8> {
        self.0.get(&sq).copied()
    }

    /// An iterator over the tracked squares and their counters.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Square, u8)> + '_ {
        self.0.iter().map(|(&sq, &n)| (sq, n))
    }

    /// The number of tracked chimeras.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no chimera is being tracked.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Starts tracking a freshly created chimera.
    pub fn enlist(&mut self, sq: Square) {
        self.0.insert(sq, 0);
    }

    /// Stops tracking whatever stood on a [`Square`].
    pub fn discharge(&mut self, sq: Square) {
        self.0.remove(&sq);
    }

    /// Follows a piece from `whence` to `whither`.
    ///
    /// Any entry at the destination is dropped, since its occupant was replaced.
    pub fn relocate(&mut self, whence: Square, whither: Square) {
        self.0.remove(&whither);
        if let Some(n) = self.0.remove(&whence) {
            self.0.insert(whither, n);
        }
    }

    /// Drops entries for squares that no longer hold a chimera.
    pub fn prune(&mut self, board: &Board) {
        self.0.retain(|&sq, _| board.role_on(sq) == Some(Role::Chimera));
    }

    /// Counts one completed turn for every chimera of `side`.
    ///
    /// Chimeras that reach [`Self::FLIP`] change color in place and start over.
    /// Returns the squares of the chimeras that defected.
    pub fn tick(&mut self, board: &mut Board, side: Color) -> Vec<Square> {
        let chimera = Piece::new(Role::Chimera, side);
        let serving: Vec<_> = board.by_piece(chimera).collect();
        let mut flipped = Vec::new();

        for sq in serving {
            let n = self.0.entry(sq).or_default();
            *n += 1;

            if *n >= Self::FLIP {
                *n = 0;
                board[sq] = Some(chimera.flip());
                debug!(square = %sq, from = %side, "chimera changed sides");
                flipped.push(sq);
            }
        }

        flipped
    }
}

impl FromIterator<(Square, u8)> for Loyalty {
    fn from_iter<I: IntoIterator<Item = (Square, u8)>>(iter: I) -> Self {
        Loyalty(iter.into_iter().collect())
    }
}
