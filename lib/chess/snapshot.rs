use crate::chess::{Board, Castles, Color, Loyalty, Mode, Position, Proposal};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Everything needed to carry on a game from its current [`Position`].
///
/// Snapshots are trusted, restoring one performs no validation.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename = "snapshot")]
pub struct Snapshot {
    /// The piece placement.
    pub board: Board,
    /// The side to move.
    pub turn: Color,
    /// The castling rights.
    pub castles: Castles,
    /// The loyalty counters of the chimeras.
    #[serde(default)]
    pub loyalty: Loyalty,
    /// Whether any side has resurrected.
    #[serde(default)]
    pub mode: Mode,
    /// Whether white and black have used their resurrection.
    #[serde(default)]
    pub revived: [bool; 2],
    /// The number of completed turns.
    #[serde(default)]
    pub moves: u32,
    /// The number of turns until the next morale check.
    #[serde(default = "countdown")]
    pub countdown: u8,
    /// The proposal awaiting an answer.
    #[serde(default)]
    pub proposal: Option<Proposal>,
}

fn countdown() -> u8 {
    Position::MORALE_PERIOD
}

impl From<&Position> for Snapshot {
    fn from(pos: &Position) -> Self {
        Snapshot {
            board: pos.board,
            turn: pos.turn,
            castles: pos.castles,
            loyalty: pos.loyalty.clone(),
            mode: pos.mode,
            revived: pos.revived,
            moves: pos.move_count,
            countdown: pos.countdown,
            proposal: pos.proposal,
        }
    }
}

impl From<Snapshot> for Position {
    fn from(s: Snapshot) -> Self {
        Position {
            board: s.board,
            turn: s.turn,
            castles: s.castles,
            loyalty: s.loyalty,
            mode: s.mode,
            revived: s.revived,
            move_count: s.moves,
            countdown: s.countdown,
            proposal: s.proposal,
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ron::ser::to_string(self).map_err(|_| fmt::Error)?)
    }
}

/// The reason why parsing [`Snapshot`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
#[display("failed to parse snapshot")]
pub struct ParseSnapshotError(ron::de::SpannedError);

impl FromStr for Snapshot {
    type Err = ParseSnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}
