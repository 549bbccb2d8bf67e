use super::{Action, Player};
use lib::game::Game;
use rand::{seq::IteratorRandom, Rng};
use rand_pcg::Pcg64;
use std::convert::Infallible;

/// A player that acts at random.
///
/// It only ever plays legal moves, answers proposals with a coin toss,
/// and always takes the chance to resurrect.
#[derive(Debug, Clone)]
pub struct Random<R = Pcg64> {
    rng: R,
}

impl<R: Rng> Random<R> {
    pub fn new(rng: R) -> Self {
        Random { rng }
    }
}

impl<R: Rng> Player for Random<R> {
    type Error = Infallible;

    fn act(&mut self, game: &Game) -> Result<Action, Self::Error> {
        let pos = game.position();

        if pos.proposal().is_some() {
            return Ok(match self.rng.gen() {
                true => Action::Accept,
                false => Action::Decline,
            });
        }

        if game.outcome().is_some() {
            return Ok(match pos.can_resurrect() {
                true => Action::Resurrect,
                false => Action::Quit,
            });
        }

        Ok(match pos.legal_moves().choose(&mut self.rng) {
            Some(m) => Action::Play(*m),
            None => Action::Quit,
        })
    }
}
