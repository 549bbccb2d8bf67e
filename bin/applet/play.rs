use crate::io::Io;
use crate::player::{Action, Player, Random, Terminal};
use crate::session::Session;
use anyhow::Error as Anyhow;
use clap::{Parser, ValueEnum};
use derive_more::From;
use lib::chess::Snapshot;
use lib::game::{Game, GameConfig};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::io::{self, stdin, stdout, Stdin, Stdout};
use tracing::{info, instrument};

/// Who takes a seat at the board.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Seat {
    /// A human at the terminal.
    #[default]
    Human,
    /// A player that picks legal moves at random.
    Random,
}

/// A [`Player`] in one of the available seats.
#[derive(Debug, From)]
enum Contender {
    Human(Terminal<Stdout, Stdin>),
    Random(Random),
}

impl Player for Contender {
    type Error = io::Error;

    fn act(&mut self, game: &Game) -> Result<Action, Self::Error> {
        match self {
            Contender::Human(p) => p.act(game),
            Contender::Random(p) => match p.act(game) {
                Ok(action) => Ok(action),
                Err(e) => match e {},
            },
        }
    }
}

impl Seat {
    fn take(self, seed: Option<u64>) -> Contender {
        match self {
            Seat::Human => Terminal::new(Io::new(stdout(), stdin())).into(),
            Seat::Random => {
                let rng = match seed {
                    Some(seed) => Pcg64::seed_from_u64(seed),
                    None => Pcg64::from_entropy(),
                };

                Random::new(rng).into()
            }
        }
    }
}

/// Plays a game.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Play {
    /// The game configuration.
    #[clap(short, long, default_value_t)]
    config: GameConfig,

    /// Who plays the white pieces.
    #[clap(short, long, value_enum, default_value_t = Seat::Human)]
    white: Seat,

    /// Who plays the black pieces.
    #[clap(short, long, value_enum, default_value_t = Seat::Random)]
    black: Seat,

    /// Stop after this many turns.
    #[clap(short = 'n', long)]
    turns: Option<u32>,

    /// Carry on from a snapshot instead of starting a new game.
    snapshot: Option<Snapshot>,
}

impl Default for Play {
    fn default() -> Self {
        Play {
            config: GameConfig::default(),
            white: Seat::Human,
            black: Seat::Random,
            turns: None,
            snapshot: None,
        }
    }
}

impl Play {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let mut game = Game::new(self.config);
        if let Some(snapshot) = self.snapshot {
            game.restore(snapshot);
        }

        let seeds = match self.config.seed {
            Some(seed) => [Some(seed.wrapping_add(1)), Some(seed.wrapping_add(2))],
            None => [None, None],
        };

        let white = self.white.take(seeds[0]);
        let black = self.black.take(seeds[1]);

        let mut session = Session::new(game, white, black);
        if let Some(n) = self.turns {
            session = session.limit(n);
        }

        match session.run()? {
            Some(o) => info!(outcome = %o, "game over"),
            None => info!("game abandoned"),
        }

        println!("{}", session.game().snapshot());

        Ok(())
    }
}
