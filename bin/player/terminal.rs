use super::{Action, Player};
use crate::io::Io;
use lib::game::Game;
use std::io::{self, Read, Write};
use tracing::instrument;

/// A human player behind a terminal.
#[derive(Debug)]
pub struct Terminal<W: Write, R: Read> {
    io: Io<W, R>,
}

impl<W: Write, R: Read> Terminal<W, R> {
    pub fn new(io: Io<W, R>) -> Self {
        Terminal { io }
    }

    /// Shows the board and returns the question for the player.
    fn show(&mut self, game: &Game) -> io::Result<String> {
        let pos = game.position();
        self.io.send(pos)?;

        if let Some(sq) = game.selected() {
            let hints: Vec<_> = game.hints().iter().map(|m| m.to_string()).collect();
            self.io.send(format_args!("{sq}: {}", hints.join(" ")))?;
        }

        Ok(match (pos.proposal(), game.outcome()) {
            (Some(p), _) => format!("{} proposes {p}, accept or decline?", p.proposer),
            (None, Some(o)) if pos.can_resurrect() => format!("{o}, resurrect or quit?"),
            (None, Some(o)) => o.to_string(),
            (None, None) => format!("{} to move", pos.turn()),
        })
    }
}

impl<W: Write, R: Read> Player for Terminal<W, R> {
    type Error = io::Error;

    #[instrument(level = "debug", skip(self, game), ret, err)]
    fn act(&mut self, game: &Game) -> Result<Action, Self::Error> {
        let question = self.show(game)?;

        loop {
            match self.io.ask(&question)?.parse() {
                Ok(action) => break Ok(action),
                Err(e) => self.io.send(e)?,
            }
        }
    }
}
