use crate::chess::{Board, Color, File, Mode, Outcome, Piece, Position, Rank, Role, Square};
use derive_more::{Display, Error};
use tracing::{info, instrument};

/// Represents an attempt to resurrect that the rules don't allow.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("the {_0} player cannot resurrect now")]
pub struct ResurrectionUnavailable(#[error(not(source))] pub Color);

impl Position {
    /// Whether the side to move may resurrect its army.
    ///
    /// Only a side that was just checkmated and never resurrected before may do so.
    pub fn can_resurrect(&self) -> bool {
        !self.is_revived(self.turn) && self.outcome() == Some(Outcome::Checkmate(!self.turn))
    }

    /// Brings the checkmated side back with a fresh army led by a heavy-queen.
    ///
    /// The side keeps the move. Legions and chimeras it held return as legions in place of its
    /// knights, archons return in place of its rooks, bound to the shade of the rook's square.
    /// Enemy pieces on the deployment squares are removed, except for the enemy royal unit.
    #[instrument(level = "debug", skip(self), err)]
    pub fn resurrect(&mut self) -> Result<(), ResurrectionUnavailable> {
        let side = self.turn;
        if !self.can_resurrect() {
            return Err(ResurrectionUnavailable(side));
        }

        let mut legions = 0;
        let mut archons = 0;
        let survivors: Vec<_> = self.board.iter().filter(|(p, _)| p.color() == side).collect();
        for (p, sq) in survivors {
            match p.role() {
                Role::Legion | Role::Chimera => legions += 1,
                r if r.is_archon() => archons += 1,
                _ => {}
            }

            self.board[sq] = None;
        }

        let home = Rank::home(side);
        let enemy = Piece::new(self.royal(!side), !side);
        let deploy = |board: &mut Board, sq: Square, p: Option<Piece>| {
            if board[sq] != Some(enemy) {
                board[sq] = p;
            }
        };

        for (f, role) in File::iter().zip(Board::ARMY) {
            let pawn = Some(Piece::new(Role::Pawn, side));
            deploy(&mut self.board, Square::new(f, Rank::pawns(side)), pawn);

            let sq = Square::new(f, home);
            let officer = match role {
                Role::King => None,
                Role::Queen => Some(Role::HeavyQueen),
                Role::Knight if legions > 0 => {
                    legions -= 1;
                    Some(Role::Legion)
                }

                Role::Rook if archons > 0 => {
                    archons -= 1;
                    Some(Role::archon(sq.is_light()))
                }

                role => Some(role),
            };

            deploy(&mut self.board, sq, officer.map(|r| Piece::new(r, side)));
        }

        self.revived[side.index()] = true;
        self.mode = Mode::Resurrected;
        self.castles.forfeit(side);
        self.loyalty.prune(&self.board);

        info!(%side, "army resurrected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::Move;

    fn fools_mate() -> Position {
        let mut pos = Position::default();
        for m in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            pos.play(m.parse::<Move>().unwrap()).unwrap();
        }

        pos
    }

    #[test]
    fn checkmated_side_may_resurrect_once() {
        let mut pos = fools_mate();
        assert_eq!(pos.outcome(), Some(Outcome::Checkmate(Color::Black)));
        assert!(pos.can_resurrect());

        assert_eq!(pos.resurrect(), Ok(()));
        assert_eq!(
            pos.board().to_string(),
            "RNB1KBNR/PPPP1PPP/8/4P3/7Q/8/pppppppp/rnbz1bnr"
        );

        assert_eq!(pos.turn(), Color::White);
        assert_eq!(pos.mode(), Mode::Resurrected);
        assert!(pos.is_revived(Color::White));
        assert!(!pos.is_revived(Color::Black));
        assert_eq!(pos.royal(Color::White), Role::HeavyQueen);
        assert_eq!(pos.royal_square(Color::White), Some("d1".parse().unwrap()));
        assert_eq!(pos.outcome(), None);
    }

    #[test]
    fn resurrection_is_unavailable_before_checkmate() {
        let mut pos = Position::default();
        assert_eq!(pos.resurrect(), Err(ResurrectionUnavailable(Color::White)));
        assert_eq!(pos, Position::default());
    }

    #[test]
    fn resurrecting_twice_leaves_the_board_unchanged() {
        let mut pos = fools_mate();
        pos.resurrect().unwrap();

        let mut again = pos.clone();
        again.board[Square::new(File::D, Rank::First)] = None;
        assert_eq!(again.outcome(), Some(Outcome::Checkmate(Color::Black)));

        let before = again.clone();
        assert_eq!(again.resurrect(), Err(ResurrectionUnavailable(Color::White)));
        assert_eq!(again, before);
    }

    #[test]
    fn fused_pieces_return_in_place_of_what_they_were_fused_from() {
        let board = "xc6/h7/8/8/8/5K2/6Q1/7k".parse().unwrap();
        let mut pos = Position::new(board, Color::White);
        assert_eq!(pos.outcome(), Some(Outcome::Checkmate(Color::Black)));
        assert_eq!(pos.loyalty().len(), 1);

        pos.resurrect().unwrap();
        assert_eq!(pos.board().to_string(), "8/8/8/8/8/5K2/pppppppp/chbz1bhr");
        assert!(pos.loyalty().is_empty());
    }

    #[test]
    fn enemy_royal_on_a_deployment_square_is_left_alone() {
        let board = "8/8/8/8/8/7Q/5K2/7k".parse().unwrap();
        let mut pos = Position::new(board, Color::White);
        assert_eq!(pos.outcome(), Some(Outcome::Checkmate(Color::Black)));

        pos.resurrect().unwrap();
        assert_eq!(pos.board().to_string(), "8/8/8/8/8/7Q/pppppKpp/rnbz1bnr");
    }
}
