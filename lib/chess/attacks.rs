use crate::chess::{Board, Color, Piece, Rank, Role, Square};

/// Rook-like directions as `(files, ranks)` offsets.
pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Bishop-like directions as `(files, ranks)` offsets.
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// The short jumps of a knight.
pub const KNIGHT: [(i8, i8); 8] = [
    (1, 2),
    (-1, 2),
    (1, -2),
    (-1, -2),
    (2, 1),
    (-2, 1),
    (2, -1),
    (-2, -1),
];

/// The long jumps of a legion.
pub const LONG_KNIGHT: [(i8, i8); 8] = [
    (1, 4),
    (-1, 4),
    (1, -4),
    (-1, -4),
    (4, 1),
    (-4, 1),
    (4, -1),
    (-4, -1),
];

/// The one step moves of a king in every direction.
pub const KING: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Whether an archon standing on a [`Square`] may slide diagonally.
#[inline(always)]
pub fn archon_sees_diagonals(role: Role, sq: Square) -> bool {
    match role {
        Role::LightArchon => sq.is_light(),
        Role::DarkArchon => !sq.is_light(),
        _ => false,
    }
}

impl Board {
    /// An iterator over the squares along a ray, up to and including the first occupied one.
    pub fn ray(&self, whence: Square, (df, dr): (i8, i8)) -> impl Iterator<Item = Square> + '_ {
        let mut next = whence.offset(df, dr);
        let mut blocked = false;

        std::iter::from_fn(move || {
            if blocked {
                return None;
            }

            let sq = next?;
            blocked = self[sq].is_some();
            next = sq.offset(df, dr);
            Some(sq)
        })
    }

    /// The first piece met along a ray, if any.
    fn first_along(&self, whence: Square, dir: (i8, i8)) -> Option<(Piece, Square)> {
        let sq = self.ray(whence, dir).last()?;
        Some((self[sq]?, sq))
    }

    /// Whether any piece of color `by` threatens the given [`Square`].
    ///
    /// Threats are raw attack patterns, regardless of whether the attacker is pinned.
    pub fn is_threatened(&self, sq: Square, by: Color) -> bool {
        let enemy = |sq: Option<Square>, roles: &[Role]| {
            sq.and_then(|s| self[s])
                .is_some_and(|p| p.color() == by && roles.contains(&p.role()))
        };

        let pawns = [-1, 1].map(|df| sq.offset(df, -Rank::forward(by)));
        if pawns.into_iter().any(|s| enemy(s, &[Role::Pawn])) {
            return true;
        }

        if KNIGHT
            .into_iter()
            .any(|(df, dr)| enemy(sq.offset(df, dr), &[Role::Knight, Role::Chimera]))
        {
            return true;
        }

        if LONG_KNIGHT
            .into_iter()
            .any(|(df, dr)| enemy(sq.offset(df, dr), &[Role::Legion, Role::Chimera]))
        {
            return true;
        }

        if KING
            .into_iter()
            .any(|(df, dr)| enemy(sq.offset(df, dr), &[Role::King]))
        {
            return true;
        }

        let sliders = [
            Role::Rook,
            Role::Queen,
            Role::HeavyQueen,
            Role::LightArchon,
            Role::DarkArchon,
        ];

        for dir in ORTHOGONAL {
            if let Some((p, _)) = self.first_along(sq, dir) {
                if p.color() == by && sliders.contains(&p.role()) {
                    return true;
                }
            }
        }

        for dir in DIAGONAL {
            if let Some((p, at)) = self.first_along(sq, dir) {
                if p.color() == by {
                    match p.role() {
                        Role::Bishop | Role::Queen | Role::HeavyQueen => return true,
                        r if archon_sees_diagonals(r, at) => return true,
                        _ => {}
                    }
                }
            }
        }

        false
    }

    /// The square holding the royal unit of a side, if it is still on the board.
    pub fn royal_square(&self, side: Color, royal: Role) -> Option<Square> {
        self.by_piece(Piece::new(royal, side)).next()
    }

    /// Whether the royal unit of a side is in check.
    ///
    /// A side whose royal unit is missing is considered in check.
    pub fn is_check(&self, side: Color, royal: Role) -> bool {
        match self.royal_square(side, royal) {
            None => true,
            Some(sq) => self.is_threatened(sq, !side),
        }
    }
}
