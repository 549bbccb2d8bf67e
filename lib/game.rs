use crate::chess::{Advance, Move, MoveContext, Moves, Outcome, PlayError, Position};
use crate::chess::{ProposalError, ResurrectionUnavailable, Snapshot, Square, Transition};
use derive_more::{Display, Error, From};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use tracing::{info, instrument};

mod config;

pub use config::*;

/// Represents an attempt to move after the game has ended.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("the game is over, {_0}")]
pub struct GameOver(#[error(not(source))] pub Outcome);

/// The reason why an action was rejected.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum GameError {
    #[display("{_0}")]
    GameOver(GameOver),
    #[display("{_0}")]
    Play(PlayError),
    #[display("{_0}")]
    Proposal(ProposalError),
    #[display("{_0}")]
    Resurrection(ResurrectionUnavailable),
}

/// A game session.
///
/// Besides the [`Position`] itself, it keeps track of what the players are looking at:
/// the selected square and its legal moves, the last move, and the outcome.
#[derive(Debug, Clone)]
pub struct Game<R = Pcg64> {
    position: Position,
    config: GameConfig,
    rng: R,
    selected: Option<Square>,
    hints: Moves,
    last: Option<Move>,
    outcome: Option<Outcome>,
}

impl Game {
    /// Starts a new game, seeding the random source as configured.
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };

        Game::with_rng(config, rng)
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new(GameConfig::default())
    }
}

impl<R: Rng> Game<R> {
    /// Starts a new game with the given random source.
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Game {
            position: Position::default(),
            config,
            rng,
            selected: None,
            hints: Moves::new(),
            last: None,
            outcome: None,
        }
    }

    /// The current position.
    #[inline(always)]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The configuration of this game.
    #[inline(always)]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The selected square, if any.
    #[inline(always)]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// The legal moves of the selected piece.
    #[inline(always)]
    pub fn hints(&self) -> &[MoveContext] {
        &self.hints
    }

    /// The last move that completed a turn.
    #[inline(always)]
    pub fn last_move(&self) -> Option<Move> {
        self.last
    }

    /// The outcome of the game, if it has ended.
    #[inline(always)]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Selects the piece on a [`Square`] if it belongs to the side to move.
    ///
    /// Anything else clears the selection. Returns the legal moves of the selected piece.
    pub fn select(&mut self, sq: Square) -> &[MoveContext] {
        let turn = self.position.turn();
        if self.outcome.is_none() && self.position.board().color_on(sq) == Some(turn) {
            self.selected = Some(sq);
            self.hints = self.position.moves(sq);
        } else {
            self.deselect();
        }

        &self.hints
    }

    fn deselect(&mut self) {
        self.selected = None;
        self.hints.clear();
    }

    /// Plays a [`Move`], see [`Position::play`].
    #[instrument(level = "debug", skip(self), err)]
    pub fn play(&mut self, m: Move) -> Result<Advance, GameError> {
        if let Some(o) = self.outcome {
            return Err(GameOver(o).into());
        }

        let advance = match self.position.play(m)? {
            Advance::Completed(t) => Advance::Completed(self.conclude(t)),
            proposed => proposed,
        };

        self.deselect();
        Ok(advance)
    }

    /// Accepts the pending proposal.
    #[instrument(level = "debug", skip(self), err)]
    pub fn accept(&mut self) -> Result<Transition, GameError> {
        let t = self.position.resolve(true)?;
        Ok(self.conclude(t))
    }

    /// Declines the pending proposal.
    #[instrument(level = "debug", skip(self), err)]
    pub fn decline(&mut self) -> Result<Transition, GameError> {
        let t = self.position.resolve(false)?;
        Ok(self.conclude(t))
    }

    /// Resurrects the checkmated side, see [`Position::resurrect`].
    #[instrument(level = "debug", skip(self), err)]
    pub fn resurrect(&mut self) -> Result<(), GameError> {
        self.position.resurrect()?;
        self.deselect();
        self.outcome = self.position.outcome();
        Ok(())
    }

    /// Starts over from the initial position.
    pub fn restart(&mut self) {
        self.load(Position::default());
        info!("new game");
    }

    /// Captures the state needed to carry on this game elsewhere.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.position)
    }

    /// Carries on a game from a [`Snapshot`].
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.load(snapshot.into());
    }

    fn load(&mut self, position: Position) {
        self.position = position;
        self.deselect();
        self.last = None;
        self.outcome = self.position.outcome();
    }

    /// Runs what follows a completed turn.
    fn conclude(&mut self, mut t: Transition) -> Transition {
        self.last = Some(*t.played);

        if t.morale_due {
            t.defected = self.position.rally(&mut self.rng, &self.config.morale);
        }

        self.outcome = self.position.outcome();
        if let Some(o) = self.outcome {
            info!(outcome = %o, "game over");
        }

        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{Castles, Color, Loyalty, Mode, MoveKind, Piece, Role};
    use rand::rngs::mock::StepRng;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    fn game() -> Game<StepRng> {
        Game::with_rng(GameConfig::default(), StepRng::new(0, 0))
    }

    fn snapshot(board: &str, turn: Color, countdown: u8) -> Snapshot {
        Snapshot {
            board: board.parse().unwrap(),
            turn,
            castles: Castles::none(),
            loyalty: Loyalty::default(),
            mode: Mode::Classic,
            revived: [false; 2],
            moves: 0,
            countdown,
            proposal: None,
        }
    }

    #[test]
    fn selecting_own_piece_shows_its_moves() {
        let mut g = game();
        assert_eq!(g.select(sq("g1")).len(), 2);
        assert_eq!(g.selected(), Some(sq("g1")));
        assert_eq!(g.hints().len(), 2);
    }

    #[test]
    fn selecting_anything_else_clears_the_selection() {
        let mut g = game();
        g.select(sq("g1"));
        assert!(g.select(sq("g8")).is_empty());
        assert_eq!(g.selected(), None);

        g.select(sq("g1"));
        assert!(g.select(sq("e4")).is_empty());
        assert_eq!(g.selected(), None);
    }

    #[test]
    fn playing_records_the_last_move_and_clears_the_selection() {
        let mut g = game();
        g.select(sq("e2"));
        assert!(matches!(g.play(mv("e2e4")), Ok(Advance::Completed(_))));
        assert_eq!(g.last_move(), Some(mv("e2e4")));
        assert_eq!(g.selected(), None);
        assert!(g.hints().is_empty());
    }

    #[test]
    fn rejected_moves_change_nothing() {
        let mut g = game();
        assert!(matches!(g.play(mv("e2e5")), Err(GameError::Play(_))));
        assert_eq!(g.position(), &Position::default());
        assert_eq!(g.last_move(), None);
    }

    #[test]
    fn accepting_a_proposal_creates_a_loyal_chimera() {
        let mut g = game();
        g.restore(snapshot("4K3/8/8/3N4/8/4n3/8/4k3", Color::White, 3));

        assert!(matches!(g.play(mv("e3d5")), Ok(Advance::Proposed(_))));
        assert_eq!(g.last_move(), None);

        let t = g.accept().unwrap();
        let courted = Piece::new(Role::Knight, Color::Black);
        assert_eq!(t.played.kind(), MoveKind::ProposeChimera(courted));
        assert_eq!(g.position().board()[sq("d5")], Some(Piece::new(Role::Chimera, Color::White)));
        assert_eq!(g.position().board()[sq("e3")], None);
        assert_eq!(g.position().loyalty().get(sq("d5")), Some(0));
        assert_eq!(g.last_move(), Some(mv("e3d5")));
        assert_eq!(g.position().turn(), Color::Black);
    }

    #[test]
    fn declining_a_proposal_carries_out_the_capture() {
        let mut g = game();
        g.restore(snapshot("4K3/8/8/3N4/8/4n3/8/4k3", Color::White, 3));
        g.play(mv("e3d5")).unwrap();

        let t = g.decline().unwrap();
        let courted = Piece::new(Role::Knight, Color::Black);
        assert_eq!(t.played.kind(), MoveKind::Capture(courted));
        assert_eq!(g.position().board()[sq("d5")], Some(Piece::new(Role::Knight, Color::White)));
        assert!(g.position().loyalty().is_empty());
    }

    #[test]
    fn answering_without_a_proposal_fails() {
        let mut g = game();
        assert_eq!(
            g.accept(),
            Err(GameError::Proposal(ProposalError::NoPendingProposal))
        );

        assert_eq!(
            g.decline(),
            Err(GameError::Proposal(ProposalError::NoPendingProposal))
        );
    }

    #[test]
    fn morale_check_runs_when_due() {
        let mut g = game();
        g.restore(snapshot("4K3/8/8/8/3Pp3/8/8/4k3", Color::White, 1));

        let Ok(Advance::Completed(t)) = g.play(mv("e1d1")) else {
            panic!("expected e1d1 to complete the turn");
        };

        assert!(t.morale_due);
        assert_eq!(t.defected, vec![sq("d4")]);
        assert_eq!(g.position().board()[sq("d4")], Some(Piece::new(Role::Pawn, Color::White)));
    }

    #[test]
    fn morale_check_waits_for_its_turn() {
        let mut g = game();
        g.restore(snapshot("4K3/8/8/8/3Pp3/8/8/4k3", Color::White, 2));

        let Ok(Advance::Completed(t)) = g.play(mv("e1d1")) else {
            panic!("expected e1d1 to complete the turn");
        };

        assert!(!t.morale_due);
        assert!(t.defected.is_empty());
    }

    #[test]
    fn moves_are_rejected_once_the_game_is_over() {
        let mut g = game();
        for m in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            g.play(mv(m)).unwrap();
        }

        let mate = Outcome::Checkmate(Color::Black);
        assert_eq!(g.outcome(), Some(mate));
        assert_eq!(g.play(mv("e1f2")), Err(GameError::GameOver(GameOver(mate))));
        assert!(g.select(sq("e1")).is_empty());
    }

    #[test]
    fn resurrection_resumes_the_game() {
        let mut g = game();
        for m in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            g.play(mv(m)).unwrap();
        }

        assert_eq!(g.resurrect(), Ok(()));
        assert_eq!(g.outcome(), None);
        assert!(g.play(mv("e2e4")).is_ok());

        let mut g = game();
        assert_eq!(
            g.resurrect(),
            Err(GameError::Resurrection(ResurrectionUnavailable(Color::White)))
        );
    }

    #[test]
    fn restart_starts_over() {
        let mut g = game();
        g.play(mv("e2e4")).unwrap();
        g.restart();
        assert_eq!(g.position(), &Position::default());
        assert_eq!(g.last_move(), None);
        assert_eq!(g.outcome(), None);
    }

    #[test]
    fn restoring_a_snapshot_carries_on_the_game() {
        let mut g = game();
        g.play(mv("e2e4")).unwrap();

        let mut h = game();
        h.restore(g.snapshot());
        assert_eq!(h.position(), g.position());
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let config = GameConfig {
            seed: Some(42),
            ..GameConfig::default()
        };

        let mut a = Game::new(config);
        let mut b = Game::new(config);
        assert_eq!(a.rng.gen::<u64>(), b.rng.gen::<u64>());
    }
}
