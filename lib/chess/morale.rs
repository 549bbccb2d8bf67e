use crate::chess::{attacks::KING, Board, Color, File, Piece, Position, Rank, Role, Square};
use derive_more::{Display, Error, From};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, info};

/// Configuration for pawn defections.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename = "morale", default)]
pub struct MoraleConfig {
    /// Pawns may defect while their side's morale is at most this.
    pub threshold: f64,

    /// Below this morale pawns defect with [`Self::critical_chance`] instead.
    pub critical: f64,

    /// The range the defection probability is drawn from.
    pub chance: (f64, f64),

    /// The range the defection probability is drawn from once morale is critical.
    pub critical_chance: (f64, f64),
}

impl Default for MoraleConfig {
    fn default() -> Self {
        Self {
            threshold: 3.,
            critical: 1.,
            chance: (0.05, 0.15),
            critical_chance: (0.20, 0.30),
        }
    }
}

impl fmt::Display for MoraleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ron::ser::to_string(self).map_err(|_| fmt::Error)?)
    }
}

/// The reason why parsing [`MoraleConfig`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
#[display("failed to parse morale configuration")]
pub struct ParseMoraleConfigError(ron::de::SpannedError);

impl FromStr for MoraleConfig {
    type Err = ParseMoraleConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}

impl Board {
    /// The material each side starts the game with.
    pub const MATERIAL: u32 = 40;

    /// The total value of the pieces of a side.
    pub fn material(&self, side: Color) -> u32 {
        self.iter()
            .filter(|(p, _)| p.color() == side)
            .map(|(p, _)| p.role().value())
            .sum()
    }

    /// A side's morale, derived from the material it lost.
    ///
    /// Starts at `10` and drops by one for every `3` points of material lost, down to `0`.
    pub fn morale(&self, side: Color) -> f64 {
        let lost = Self::MATERIAL as f64 - self.material(side) as f64;
        (10. - lost / 3.).max(0.)
    }

    /// Whether any piece adjacent to a [`Square`] belongs to the opponent of `side`.
    fn faces_enemy(&self, sq: Square, side: Color) -> bool {
        KING.into_iter()
            .filter_map(|(df, dr)| sq.offset(df, dr))
            .any(|s| self.color_on(s) == Some(!side))
    }

    /// Gives demoralized pawns in contact with the enemy a chance to change sides.
    ///
    /// The board is scanned from the eighth rank down, files `a` to `h`, and defections take
    /// effect immediately. Morale is assessed once, before the scan.
    ///
    /// Returns the squares of the pawns that defected.
    pub fn rally<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &MoraleConfig) -> Vec<Square> {
        let morales = Color::ALL.map(|c| self.morale(c));
        let mut defected = Vec::new();

        let squares = Rank::iter()
            .rev()
            .flat_map(|r| File::iter().map(move |f| Square::new(f, r)));

        for sq in squares {
            let Some(pawn) = self[sq].filter(|p| p.role() == Role::Pawn) else {
                continue;
            };

            let side = pawn.color();
            let morale = morales[side.index()];
            if morale > config.threshold || !self.faces_enemy(sq, side) {
                continue;
            }

            let (lo, hi) = if morale <= config.critical {
                config.critical_chance
            } else {
                config.chance
            };

            let chance = lo + rng.gen::<f64>() * (hi - lo);
            if rng.gen::<f64>() < chance {
                self[sq] = Some(Piece::new(Role::Pawn, !side));
                debug!(square = %sq, from = %side, morale, "pawn defected");
                defected.push(sq);
            }
        }

        defected
    }
}

impl Position {
    /// Runs the periodic morale check on the board, see [`Board::rally`].
    pub fn rally<R: Rng + ?Sized>(&mut self, rng: &mut R, config: &MoraleConfig) -> Vec<Square> {
        let defected = self.board.rally(rng, config);

        if !defected.is_empty() {
            info!(pawns = defected.len(), "morale broke");
        }

        defected
    }
}
