use derive_more::{Display, Error};
use std::fmt::{self, Formatter, Write};
use std::str::FromStr;

/// The type of a chess [`Piece`][`crate::chess::Piece`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(u8)]
pub enum Role {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    /// Two fused knights, leaps along the long knight pattern only.
    Legion,
    /// A knight and an enemy knight in union, leaps like both a knight and a legion.
    Chimera,
    /// The king's replacement after resurrection.
    HeavyQueen,
    /// A rook fused with a bishop, bound to the light squares.
    LightArchon,
    /// A rook fused with a bishop, bound to the dark squares.
    DarkArchon,
}

impl Role {
    /// All roles.
    pub const ALL: [Role; 11] = [
        Role::Pawn,
        Role::Knight,
        Role::Bishop,
        Role::Rook,
        Role::Queen,
        Role::King,
        Role::Legion,
        Role::Chimera,
        Role::HeavyQueen,
        Role::LightArchon,
        Role::DarkArchon,
    ];

    /// An iterator over all roles.
    #[inline(always)]
    pub fn iter() -> impl DoubleEndedIterator<Item = Role> + ExactSizeIterator {
        Self::ALL.into_iter()
    }

    /// The material value of this role, as counted by the morale system.
    ///
    /// Royal units and chimeras carry no material value.
    pub fn value(&self) -> u32 {
        match self {
            Role::Pawn => 1,
            Role::Knight | Role::Bishop => 3,
            Role::Rook => 5,
            Role::Legion => 6,
            Role::LightArchon | Role::DarkArchon => 8,
            Role::Queen => 10,
            Role::King | Role::Chimera | Role::HeavyQueen => 0,
        }
    }

    /// Whether this role can be a color's mate target.
    ///
    /// Royal units are never captured.
    #[inline(always)]
    pub fn is_royal(&self) -> bool {
        matches!(self, Role::King | Role::HeavyQueen)
    }

    /// Whether this role is one of the archons.
    #[inline(always)]
    pub fn is_archon(&self) -> bool {
        matches!(self, Role::LightArchon | Role::DarkArchon)
    }

    /// The lowercase letter that encodes this role.
    pub fn letter(&self) -> char {
        match self {
            Role::Pawn => 'p',
            Role::Knight => 'n',
            Role::Bishop => 'b',
            Role::Rook => 'r',
            Role::Queen => 'q',
            Role::King => 'k',
            Role::Legion => 'h',
            Role::Chimera => 'x',
            Role::HeavyQueen => 'z',
            Role::LightArchon => 'a',
            Role::DarkArchon => 'c',
        }
    }

    /// The archon bound to the shade of a square.
    #[inline(always)]
    pub fn archon(light: bool) -> Self {
        if light {
            Role::LightArchon
        } else {
            Role::DarkArchon
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char(self.letter())
    }
}

/// The reason why parsing [`Role`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("failed to parse role, expected one of `pnbrqkhxzac`")]
pub struct ParseRoleError;

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p" => Ok(Role::Pawn),
            "n" => Ok(Role::Knight),
            "b" => Ok(Role::Bishop),
            "r" => Ok(Role::Rook),
            "q" => Ok(Role::Queen),
            "k" => Ok(Role::King),
            "h" => Ok(Role::Legion),
            "x" => Ok(Role::Chimera),
            "z" => Ok(Role::HeavyQueen),
            "a" => Ok(Role::LightArchon),
            "c" => Ok(Role::DarkArchon),
            _ => Err(ParseRoleError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;
    use test_strategy::proptest;

    #[test]
    fn role_guarantees_zero_value_optimization() {
        assert_eq!(size_of::<Option<Role>>(), size_of::<Role>());
    }

    #[test]
    fn starting_material_is_forty() {
        use Role::*;
        let army = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let material: u32 = army.iter().map(Role::value).sum::<u32>() + 8 * Pawn.value();
        assert_eq!(material, 40);
    }

    #[proptest]
    fn parsing_printed_role_is_an_identity(r: Role) {
        assert_eq!(r.to_string().parse(), Ok(r));
    }

    #[proptest]
    fn only_kings_and_heavy_queens_are_royal(r: Role) {
        assert_eq!(r.is_royal(), r == Role::King || r == Role::HeavyQueen);
    }

    #[proptest]
    fn archons_are_bound_to_a_shade(light: bool) {
        assert!(Role::archon(light).is_archon());
        assert_ne!(Role::archon(light), Role::archon(!light));
    }

    #[proptest]
    fn parsing_role_fails_if_not_one_of_lowercase_pnbrqkhxzac(
        #[filter(!"pnbrqkhxzac".contains(#c))] c: char,
    ) {
        assert_eq!(c.to_string().parse::<Role>(), Err(ParseRoleError));
    }

    #[proptest]
    fn parsing_role_fails_if_length_not_one(#[filter(#s.chars().count() != 1)] s: String) {
        assert_eq!(s.parse::<Role>(), Err(ParseRoleError));
    }
}
