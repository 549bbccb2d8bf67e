use crate::player::{Action, Player};
use derive_more::{Display, Error};
use lib::chess::{Advance, Color, Outcome};
use lib::game::{Game, GameError};
use tracing::{field::display, info, instrument, warn, Span};

/// The reason why the [`Session`] was interrupted.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("the {_variant} player encountered an error")]
pub enum SessionInterrupted<W, B> {
    #[display("white")]
    White(W),

    #[display("black")]
    Black(B),
}

/// Two players taking part in a [`Game`].
#[derive(Debug)]
pub struct Session<W, B> {
    game: Game,
    white: W,
    black: B,
    limit: Option<u32>,
}

impl<W: Player, B: Player> Session<W, B> {
    /// A session that lasts until the game is over or a player quits.
    pub fn new(game: Game, white: W, black: B) -> Self {
        Session {
            game,
            white,
            black,
            limit: None,
        }
    }

    /// Stops the session once this many turns have been completed.
    pub fn limit(self, turns: u32) -> Self {
        Session {
            limit: Some(turns),
            ..self
        }
    }

    /// The game being played.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Which side is expected to act next.
    ///
    /// Proposals are answered by the courted side, everything else by the side to move.
    fn actor(&self) -> Color {
        let pos = self.game.position();
        match pos.proposal() {
            Some(p) => !p.proposer,
            None => pos.turn(),
        }
    }

    /// Runs the session until it ends, returning the outcome of the game if it has one.
    #[instrument(level = "debug", skip(self), err, fields(outcome))]
    pub fn run(&mut self) -> Result<Option<Outcome>, SessionInterrupted<W::Error, B::Error>> {
        use SessionInterrupted::*;

        loop {
            let pos = self.game.position();

            if let Some(o) = self.game.outcome() {
                if !pos.can_resurrect() {
                    Span::current().record("outcome", display(o));
                    break Ok(Some(o));
                }
            }

            if self.limit.is_some_and(|n| pos.move_count() >= n) {
                break Ok(self.game.outcome());
            }

            let action = match self.actor() {
                Color::White => self.white.act(&self.game).map_err(White)?,
                Color::Black => self.black.act(&self.game).map_err(Black)?,
            };

            if action == Action::Quit {
                info!(side = %self.actor(), "player quit");
                break Ok(self.game.outcome());
            }

            if let Err(e) = self.perform(action) {
                warn!("{}", e);
            }
        }
    }

    fn perform(&mut self, action: Action) -> Result<(), GameError> {
        match action {
            Action::Select(sq) => {
                self.game.select(sq);
            }

            Action::Play(m) => match self.game.play(m)? {
                Advance::Proposed(p) => info!(proposal = %p, "union proposed"),
                Advance::Completed(t) => info!(played = %t.played, defected = t.defected.len()),
            },

            Action::Accept => {
                let t = self.game.accept()?;
                info!(played = %t.played, "proposal accepted");
            }

            Action::Decline => {
                let t = self.game.decline()?;
                info!(played = %t.played, "proposal declined");
            }

            Action::Resurrect => self.game.resurrect()?,
            Action::Quit => {}
        }

        Ok(())
    }
}
