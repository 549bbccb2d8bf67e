use anyhow::Error as Anyhow;
use clap::Parser;
use lib::chess::{MoveKind, Position, Snapshot, Square};
use tracing::{info, instrument};

/// Lists the legal moves in a position.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Moves {
    /// The position, defaults to the start of a new game.
    #[clap(short, long)]
    snapshot: Option<Snapshot>,

    /// Only list the moves of the piece on this square.
    square: Option<Square>,
}

impl Moves {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let pos = self.snapshot.map_or_else(Position::default, Position::from);
        info!(position = %pos);

        let moves: Vec<_> = match self.square {
            Some(sq) => pos.moves(sq).into_iter().collect(),
            None => pos.legal_moves().collect(),
        };

        for m in moves {
            let note = match m.kind() {
                MoveKind::Quiet => String::new(),
                MoveKind::Capture(p) => format!(" captures {p}"),
                MoveKind::MergeLegion => " merges into a legion".into(),
                MoveKind::FuseArchon => " fuses into an archon".into(),
                MoveKind::ProposeChimera(p) => format!(" proposes to {p}"),
                MoveKind::Castle(w) => format!(" {w}"),
            };

            println!("{m}{note}");
        }

        if let Some(o) = pos.outcome() {
            println!("{o}");
        }

        Ok(())
    }
}
