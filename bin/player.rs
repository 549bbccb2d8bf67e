use derive_more::{Display, Error, From};
use lib::chess::{Move, ParseMoveError, Square};
use lib::game::Game;
use std::str::FromStr;

mod random;
mod terminal;

pub use random::*;
pub use terminal::*;

/// What a player wants to do next.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    /// Inspect the legal moves of the piece on a square.
    #[display("{_0}")]
    Select(Square),
    #[display("{_0}")]
    Play(Move),
    #[display("accept")]
    Accept,
    #[display("decline")]
    Decline,
    #[display("resurrect")]
    Resurrect,
    #[display("quit")]
    Quit,
}

/// The reason why parsing [`Action`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
#[display("expected a move, a square, `accept`, `decline`, `resurrect` or `quit`")]
pub struct ParseActionError(ParseMoveError);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "accept" => Ok(Action::Accept),
            "decline" => Ok(Action::Decline),
            "resurrect" => Ok(Action::Resurrect),
            "quit" => Ok(Action::Quit),
            s => match s.parse() {
                Ok(sq) => Ok(Action::Select(sq)),
                Err(_) => Ok(Action::Play(s.parse()?)),
            },
        }
    }
}

/// Trait for types that know how to take part in a [`Game`].
#[cfg_attr(test, mockall::automock(type Error = String;))]
pub trait Player {
    /// The reason why the player was unable to continue.
    type Error;

    /// Decides what to do next.
    ///
    /// Players are asked to act when it's their turn, when a proposal is addressed to them,
    /// and when they may resurrect after being checkmated.
    fn act(&mut self, game: &Game) -> Result<Action, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[test]
    fn parsing_printed_action_is_an_identity() {
        let keywords = [Action::Accept, Action::Decline, Action::Resurrect, Action::Quit];
        let squares = Square::iter().map(Action::Select);
        let moves = Square::iter().zip(Square::iter().rev()).map(|(a, b)| Action::Play(Move(a, b)));

        for a in keywords.into_iter().chain(squares).chain(moves) {
            assert_eq!(a.to_string().parse(), Ok(a));
        }
    }

    #[test]
    fn keywords_may_be_padded() {
        assert_eq!(" accept\n".parse(), Ok(Action::Accept));
        assert_eq!("quit ".parse(), Ok(Action::Quit));
    }

    #[test]
    fn squares_select_and_moves_play() {
        assert_eq!("e2".parse(), Ok(Action::Select("e2".parse().unwrap())));
        assert_eq!("e2e4".parse(), Ok(Action::Play("e2e4".parse().unwrap())));
    }

    #[proptest]
    fn parsing_action_fails_for_gibberish(
        #[strategy("[^a-h]*")]
        #[filter(#s.trim() != "quit")]
        s: String,
    ) {
        assert!(s.parse::<Action>().is_err());
    }
}
