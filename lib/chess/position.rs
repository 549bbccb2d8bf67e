use crate::chess::{Board, Castles, Color, File, Loyalty, Move, MoveContext, MoveKind};
use crate::chess::{Outcome, Piece, Rank, Role, Square, Wing};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument};

/// Whether any side has resurrected its army.
#[derive(Debug, Display, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    #[display("classic")]
    Classic,
    #[display("resurrected")]
    Resurrected,
}

/// A diplomatic union offered by one knight to an enemy knight.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display("{whence}{whither}")]
pub struct Proposal {
    /// Where the proposing knight stands.
    pub whence: Square,
    /// Where the courted knight stands.
    pub whither: Square,
    /// The side that raised the proposal.
    pub proposer: Color,
}

impl Proposal {
    /// The [`Move`] the proposing knight would make.
    #[inline(always)]
    pub fn as_move(&self) -> Move {
        Move(self.whence, self.whither)
    }
}

/// Represents an illegal [`Move`] in a given [`Position`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("move `{_0}` is illegal in this position")]
pub struct IllegalMove(#[error(not(source))] pub Move);

/// Represents an attempt to move while a [`Proposal`] awaits an answer.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("the proposal `{_0}` must be accepted or declined first")]
pub struct ProposalPending(#[error(not(source))] pub Proposal);

/// The reason why a [`Move`] could not be played.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum PlayError {
    #[display("{_0}")]
    IllegalMove(IllegalMove),
    #[display("{_0}")]
    ProposalPending(ProposalPending),
}

/// The reason why a [`Proposal`] could not be resolved.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ProposalError {
    #[display("there is no proposal to answer")]
    NoPendingProposal,
    #[display("the proposal `{_0}` no longer matches the board")]
    Inconsistent(#[error(not(source))] Proposal),
}

/// What happened when a turn was completed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transition {
    /// The move as it was carried out.
    ///
    /// An accepted union is reported as [`MoveKind::ProposeChimera`], a declined one as
    /// [`MoveKind::Capture`].
    pub played: MoveContext,
    /// Whether a pawn was promoted.
    pub promoted: bool,
    /// The chimeras that changed sides at the end of the turn.
    pub flipped: Vec<Square>,
    /// Whether the periodic morale check is due.
    pub morale_due: bool,
    /// The pawns that changed sides during the morale check, once it has run.
    pub defected: Vec<Square>,
}

/// The effect of playing a [`Move`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Advance {
    /// The move raised a [`Proposal`] that must be resolved before the turn ends.
    Proposed(Proposal),
    /// The turn was completed.
    Completed(Transition),
}

/// The current position on the chess board.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    pub(super) board: Board,
    pub(super) turn: Color,
    pub(super) castles: Castles,
    pub(super) loyalty: Loyalty,
    pub(super) mode: Mode,
    pub(super) revived: [bool; 2],
    pub(super) move_count: u32,
    pub(super) countdown: u8,
    pub(super) proposal: Option<Proposal>,
}

impl Default for Position {
    fn default() -> Self {
        Position {
            board: Board::default(),
            turn: Color::White,
            castles: Castles::default(),
            loyalty: Loyalty::default(),
            mode: Mode::Classic,
            revived: [false; 2],
            move_count: 0,
            countdown: Self::MORALE_PERIOD,
            proposal: None,
        }
    }
}

impl Position {
    /// The number of completed turns between morale checks.
    pub const MORALE_PERIOD: u8 = 3;

    /// A position with the given pieces and side to move, and otherwise as in a new game.
    ///
    /// Castling rights are granted only where king and rook still stand on their home squares.
    pub fn new(board: Board, turn: Color) -> Self {
        let mut castles = Castles::default();
        for side in Color::iter() {
            let home = Rank::home(side);
            let at = |f| board[Square::new(f, home)];

            if at(File::E) != Some(Piece::new(Role::King, side)) {
                castles.forfeit(side);
            }

            if at(File::A) != Some(Piece::new(Role::Rook, side)) {
                castles.revoke(side, Wing::Long);
            }

            if at(File::H) != Some(Piece::new(Role::Rook, side)) {
                castles.revoke(side, Wing::Short);
            }
        }

        let mut loyalty = Loyalty::default();
        for sq in Color::iter().flat_map(|c| board.by_piece(Piece::new(Role::Chimera, c))) {
            loyalty.enlist(sq);
        }

        Position {
            board,
            turn,
            castles,
            loyalty,
            ..Position::default()
        }
    }

    /// The arrangement of pieces on the board.
    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    #[inline(always)]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The castling rights.
    #[inline(always)]
    pub fn castles(&self) -> &Castles {
        &self.castles
    }

    /// The loyalty counters of the chimeras on the board.
    #[inline(always)]
    pub fn loyalty(&self) -> &Loyalty {
        &self.loyalty
    }

    /// Whether any side has resurrected.
    #[inline(always)]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether a side has used its resurrection.
    #[inline(always)]
    pub fn is_revived(&self, side: Color) -> bool {
        self.revived[side.index()]
    }

    /// The number of turns completed since the start of the game.
    #[inline(always)]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// The number of turns left until the next morale check.
    #[inline(always)]
    pub fn countdown(&self) -> u8 {
        self.countdown
    }

    /// The proposal awaiting an answer, if any.
    #[inline(always)]
    pub fn proposal(&self) -> Option<Proposal> {
        self.proposal
    }

    /// The role of a side's mate target.
    #[inline(always)]
    pub fn royal(&self, side: Color) -> Role {
        if self.is_revived(side) {
            Role::HeavyQueen
        } else {
            Role::King
        }
    }

    /// The square of a side's mate target, if it is on the board.
    pub fn royal_square(&self, side: Color) -> Option<Square> {
        self.board.royal_square(side, self.royal(side))
    }

    /// Whether a side is in check.
    pub fn is_check(&self, side: Color) -> bool {
        self.board.is_check(side, self.royal(side))
    }

    /// The total value of the pieces of a side.
    pub fn material(&self, side: Color) -> u32 {
        self.board.material(side)
    }

    /// A side's morale.
    pub fn morale(&self, side: Color) -> f64 {
        self.board.morale(side)
    }

    /// The [`Outcome`] of the game, if it has ended.
    ///
    /// The side to move has lost if it has no legal moves while in check, and the game is drawn
    /// if it has no legal moves otherwise.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.proposal.is_some() || self.legal_moves().next().is_some() {
            None
        } else if self.is_check(self.turn) {
            Some(Outcome::Checkmate(!self.turn))
        } else {
            Some(Outcome::Stalemate)
        }
    }

    /// Plays a [`Move`] if legal, otherwise returns the reason why not.
    ///
    /// A knight courting an enemy knight raises a [`Proposal`] instead of completing the turn.
    #[instrument(level = "debug", skip(self), err)]
    pub fn play(&mut self, m: Move) -> Result<Advance, PlayError> {
        if let Some(p) = self.proposal {
            return Err(ProposalPending(p).into());
        }

        if self.board.color_on(m.whence()) != Some(self.turn) {
            return Err(IllegalMove(m).into());
        }

        let Some(mc) = self
            .moves(m.whence())
            .into_iter()
            .find(|mc| mc.whither() == m.whither())
        else {
            return Err(IllegalMove(m).into());
        };

        if mc.is_proposal() {
            let proposal = Proposal {
                whence: m.whence(),
                whither: m.whither(),
                proposer: self.turn,
            };

            info!(%proposal, "union proposed");
            self.proposal = Some(proposal);
            return Ok(Advance::Proposed(proposal));
        }

        Ok(Advance::Completed(self.apply(mc)))
    }

    /// Settles the pending [`Proposal`] and completes the turn.
    ///
    /// Accepting replaces both knights by a chimera of the proposer on the courted square,
    /// declining carries out an ordinary capture.
    #[instrument(level = "debug", skip(self), err)]
    pub fn resolve(&mut self, accept: bool) -> Result<Transition, ProposalError> {
        let proposal = self.proposal.take().ok_or(ProposalError::NoPendingProposal)?;

        let suitor = Piece::new(Role::Knight, proposal.proposer);
        let courted = suitor.flip();

        if self.turn != proposal.proposer
            || self.board[proposal.whence] != Some(suitor)
            || self.board[proposal.whither] != Some(courted)
        {
            return Err(ProposalError::Inconsistent(proposal));
        }

        if !accept {
            info!(%proposal, "union declined");
            return Ok(self.apply(MoveContext(proposal.as_move(), MoveKind::Capture(courted))));
        }

        info!(%proposal, "union accepted");
        self.board[proposal.whence] = None;
        self.board[proposal.whither] = Some(Piece::new(Role::Chimera, proposal.proposer));
        self.loyalty.discharge(proposal.whither);

        let (flipped, morale_due) = self.end_turn();
        self.loyalty.enlist(proposal.whither);

        Ok(Transition {
            played: MoveContext(proposal.as_move(), MoveKind::ProposeChimera(courted)),
            promoted: false,
            flipped,
            morale_due,
            defected: Vec::new(),
        })
    }

    /// Carries out a move known to be legal and completes the turn.
    fn apply(&mut self, mc: MoveContext) -> Transition {
        if let Some(piece) = self.board[mc.whence()] {
            self.castles.vacate(piece, mc.whence());

            if piece.role() == Role::Chimera {
                self.loyalty.relocate(mc.whence(), mc.whither());
            } else {
                self.loyalty.discharge(mc.whither());
            }
        }

        if mc.is_castling() {
            self.castles.forfeit(self.turn);
        }

        let promoted = self.board.perform(mc);

        match mc.kind() {
            MoveKind::MergeLegion => info!(whither = %mc.whither(), "knights merged into a legion"),
            MoveKind::FuseArchon => info!(whither = %mc.whither(), "rook and bishop fused"),
            MoveKind::Castle(wing) => info!(%wing, "castled"),
            _ => debug!(%mc, "moved"),
        }

        if promoted {
            info!(whither = %mc.whither(), "pawn promoted");
        }

        let (flipped, morale_due) = self.end_turn();

        Transition {
            played: mc,
            promoted,
            flipped,
            morale_due,
            defected: Vec::new(),
        }
    }

    /// Counts the completed turn and passes the move to the opponent.
    fn end_turn(&mut self) -> (Vec<Square>, bool) {
        self.move_count += 1;

        let flipped = self.loyalty.tick(&mut self.board, self.turn);
        self.loyalty.prune(&self.board);

        self.countdown = self.countdown.saturating_sub(1);
        let morale_due = self.countdown == 0;
        if morale_due {
            self.countdown = Self::MORALE_PERIOD;
        }

        self.turn = !self.turn;
        (flipped, morale_due)
    }
}

/// Prints the piece placement, the side to move and the castling rights.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.board, self.turn, self.castles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn default_position_is_a_new_game() {
        let pos = Position::default();
        assert_eq!(pos.turn(), Color::White);
        assert_eq!(pos.mode(), Mode::Classic);
        assert_eq!(pos.move_count(), 0);
        assert_eq!(pos.countdown(), Position::MORALE_PERIOD);
        assert_eq!(pos.proposal(), None);
        assert_eq!(pos.outcome(), None);
        assert_eq!(
            pos.to_string(),
            "RNBQKBNR/PPPPPPPP/8/8/8/8/pppppppp/rnbqkbnr white KQkq"
        );
    }

    #[proptest]
    fn royal_is_king_until_revived(c: Color) {
        let mut pos = Position::default();
        assert_eq!(pos.royal(c), Role::King);
        pos.revived[c.index()] = true;
        assert_eq!(pos.royal(c), Role::HeavyQueen);
        assert_eq!(pos.royal(!c), Role::King);
    }

    #[test]
    fn new_grants_castling_only_where_pieces_stand_at_home() {
        let pos = Position::new("4K2R/8/8/8/8/8/8/r3k3".parse().unwrap(), Color::White);
        assert!(pos.castles().has_long(Color::White));
        assert!(!pos.castles().has_short(Color::White));
        assert!(pos.castles().has_short(Color::Black));
        assert!(!pos.castles().has_long(Color::Black));
    }

    #[test]
    fn playing_advances_the_turn() {
        let mut pos = Position::default();
        let Ok(Advance::Completed(t)) = pos.play(mv("e2e4")) else {
            panic!("expected e2e4 to complete the turn");
        };

        assert_eq!(t.played, MoveContext(mv("e2e4"), MoveKind::Quiet));
        assert!(!t.promoted && !t.morale_due && t.flipped.is_empty());
        assert_eq!(pos.turn(), Color::Black);
        assert_eq!(pos.move_count(), 1);
        assert_eq!(pos.countdown(), 2);
    }

    #[test]
    fn moving_the_opponents_pieces_is_illegal() {
        let mut pos = Position::default();
        assert_eq!(
            pos.play(mv("e7e5")),
            Err(PlayError::IllegalMove(IllegalMove(mv("e7e5"))))
        );

        assert_eq!(pos, Position::default());
    }

    #[test]
    fn illegal_moves_leave_the_position_unchanged() {
        let mut pos = Position::default();
        assert!(pos.play(mv("e2e5")).is_err());
        assert!(pos.play(mv("e4e5")).is_err());
        assert_eq!(pos, Position::default());
    }

    #[test]
    fn morale_check_is_due_every_three_turns() {
        let mut pos = Position::default();
        let due: Vec<_> = ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6"]
            .into_iter()
            .map(|m| match pos.play(mv(m)) {
                Ok(Advance::Completed(t)) => t.morale_due,
                r => panic!("unexpected {r:?}"),
            })
            .collect();

        assert_eq!(due, [false, false, true, false, false, true]);
    }

    #[test]
    fn moves_are_rejected_while_a_proposal_is_pending() {
        let board = "4K3/8/8/3N4/8/4n3/8/4k3".parse().unwrap();
        let mut pos = Position::new(board, Color::White);

        let proposal = Proposal {
            whence: sq("e3"),
            whither: sq("d5"),
            proposer: Color::White,
        };

        assert_eq!(pos.play(mv("e3d5")), Ok(Advance::Proposed(proposal)));
        assert_eq!(pos.outcome(), None);
        assert_eq!(
            pos.play(mv("e1d1")),
            Err(PlayError::ProposalPending(ProposalPending(proposal)))
        );
    }

    #[test]
    fn resolving_without_a_proposal_fails() {
        let mut pos = Position::default();
        assert_eq!(pos.resolve(true), Err(ProposalError::NoPendingProposal));
        assert_eq!(pos.resolve(false), Err(ProposalError::NoPendingProposal));
    }

    #[test]
    fn inconsistent_proposal_is_discarded_without_touching_the_board() {
        let board = "4K3/8/8/3N4/8/4n3/8/4k3".parse().unwrap();
        let mut pos = Position::new(board, Color::White);
        pos.play(mv("e3d5")).unwrap();
        pos.board[sq("d5")] = None;

        let before = pos.board;
        assert!(matches!(pos.resolve(true), Err(ProposalError::Inconsistent(_))));
        assert_eq!(pos.board, before);
        assert_eq!(pos.proposal(), None);
        assert_eq!(pos.turn(), Color::White);
    }

    #[test]
    fn moving_a_rook_off_its_corner_revokes_castling_on_its_wing() {
        let board = "R3K2R/8/8/8/8/8/8/r3k2r".parse().unwrap();
        let mut pos = Position::new(board, Color::White);
        pos.play(mv("h1h2")).unwrap();
        assert!(!pos.castles().has_short(Color::White));
        assert!(pos.castles().has_long(Color::White));
    }

    #[test]
    fn moving_the_king_revokes_castling() {
        let board = "R3K2R/8/8/8/8/8/8/r3k2r".parse().unwrap();
        let mut pos = Position::new(board, Color::White);
        pos.play(mv("e1e2")).unwrap();
        assert!(!pos.castles().has_short(Color::White));
        assert!(!pos.castles().has_long(Color::White));
    }
}
