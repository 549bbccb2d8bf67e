use crate::chess::attacks::{archon_sees_diagonals, DIAGONAL, KING, KNIGHT, LONG_KNIGHT, ORTHOGONAL};
use crate::chess::{Color, File, Move, MoveContext, MoveKind, Piece, Position, Rank, Role};
use crate::chess::{Square, Wing};
use arrayvec::ArrayVec;

/// The moves of a single piece.
pub type Moves = ArrayVec<MoveContext, 32>;

impl Position {
    /// What moving `piece` onto a [`Square`] would do by default, if allowed at all.
    ///
    /// Friendly pieces block, enemy royal units are never captured.
    fn target(&self, piece: Piece, whither: Square) -> Option<MoveKind> {
        match self.board[whither] {
            None => Some(MoveKind::Quiet),
            Some(p) if p.color() == piece.color() => None,
            Some(p) if p.role().is_royal() => None,
            Some(p) => Some(MoveKind::Capture(p)),
        }
    }

    /// What a knight landing on a [`Square`] would do.
    fn knight_target(&self, knight: Piece, whither: Square) -> Option<MoveKind> {
        match self.board[whither] {
            Some(p) if p.role() == Role::Knight && p.color() == knight.color() => {
                Some(MoveKind::MergeLegion)
            }

            Some(p) if p.role() == Role::Knight => Some(MoveKind::ProposeChimera(p)),
            _ => self.target(knight, whither),
        }
    }

    fn jumps(&self, whence: Square, piece: Piece, offsets: &[(i8, i8)], moves: &mut Moves) {
        for &(df, dr) in offsets {
            let Some(whither) = whence.offset(df, dr) else {
                continue;
            };

            let kind = match piece.role() {
                Role::Knight => self.knight_target(piece, whither),
                _ => self.target(piece, whither),
            };

            if let Some(kind) = kind {
                moves.push(MoveContext(Move(whence, whither), kind));
            }
        }
    }

    fn slides(&self, whence: Square, piece: Piece, dirs: &[(i8, i8)], moves: &mut Moves) {
        let partner = match piece.role() {
            Role::Rook => Some(Piece::new(Role::Bishop, piece.color())),
            Role::Bishop => Some(Piece::new(Role::Rook, piece.color())),
            _ => None,
        };

        for &dir in dirs {
            for whither in self.board.ray(whence, dir) {
                let kind = match self.board[whither] {
                    Some(p) if Some(p) == partner => Some(MoveKind::FuseArchon),
                    _ => self.target(piece, whither),
                };

                if let Some(kind) = kind {
                    moves.push(MoveContext(Move(whence, whither), kind));
                }
            }
        }
    }

    fn pawn_pushes(&self, whence: Square, side: Color, moves: &mut Moves) {
        let forward = Rank::forward(side);

        let Some(one) = whence.offset(0, forward).filter(|&sq| self.board[sq].is_none()) else {
            return;
        };

        moves.push(MoveContext(Move(whence, one), MoveKind::Quiet));

        if whence.rank() == Rank::pawns(side) {
            if let Some(two) = one.offset(0, forward).filter(|&sq| self.board[sq].is_none()) {
                moves.push(MoveContext(Move(whence, two), MoveKind::Quiet));
            }
        }
    }

    fn pawn_captures(&self, whence: Square, pawn: Piece, moves: &mut Moves) {
        for df in [-1, 1] {
            let Some(whither) = whence.offset(df, Rank::forward(pawn.color())) else {
                continue;
            };

            if self.board[whither].is_some() {
                if let Some(kind) = self.target(pawn, whither) {
                    moves.push(MoveContext(Move(whence, whither), kind));
                }
            }
        }
    }

    /// The castling moves available to the king on a [`Square`].
    fn castling(&self, whence: Square, side: Color, moves: &mut Moves) {
        let home = Rank::home(side);
        if whence != Square::new(File::E, home) || self.is_check(side) {
            return;
        }

        let wings = [
            (Wing::Short, File::H, &[File::F, File::G][..], [File::F, File::G], File::G),
            (Wing::Long, File::A, &[File::B, File::C, File::D][..], [File::D, File::C], File::C),
        ];

        for (wing, corner, between, transit, landing) in wings {
            let rook = Piece::new(Role::Rook, side);
            if !self.castles.has(side, wing) || self.board[Square::new(corner, home)] != Some(rook) {
                continue;
            }

            if between.iter().any(|&f| self.board[Square::new(f, home)].is_some()) {
                continue;
            }

            if transit.into_iter().any(|f| self.board.is_threatened(Square::new(f, home), !side)) {
                continue;
            }

            let whither = Square::new(landing, home);
            moves.push(MoveContext(Move(whence, whither), MoveKind::Castle(wing)));
        }
    }

    /// The moves of the piece on a [`Square`] by its geometry alone, without castling.
    ///
    /// Moves that would leave the mover in check are included.
    pub fn pseudo_moves(&self, whence: Square) -> Moves {
        let mut moves = Moves::new();

        let Some(piece) = self.board[whence] else {
            return moves;
        };

        match piece.role() {
            Role::Pawn => {
                self.pawn_pushes(whence, piece.color(), &mut moves);
                self.pawn_captures(whence, piece, &mut moves);
            }

            Role::Knight => self.jumps(whence, piece, &KNIGHT, &mut moves),
            Role::Legion => self.jumps(whence, piece, &LONG_KNIGHT, &mut moves),
            Role::Chimera => {
                self.jumps(whence, piece, &KNIGHT, &mut moves);
                self.jumps(whence, piece, &LONG_KNIGHT, &mut moves);
            }

            Role::King | Role::HeavyQueen => self.jumps(whence, piece, &KING, &mut moves),

            Role::Rook => self.slides(whence, piece, &ORTHOGONAL, &mut moves),
            Role::Bishop => self.slides(whence, piece, &DIAGONAL, &mut moves),
            Role::Queen => {
                self.slides(whence, piece, &ORTHOGONAL, &mut moves);
                self.slides(whence, piece, &DIAGONAL, &mut moves);
            }

            Role::LightArchon | Role::DarkArchon => {
                self.slides(whence, piece, &ORTHOGONAL, &mut moves);
                if archon_sees_diagonals(piece.role(), whence) {
                    self.slides(whence, piece, &DIAGONAL, &mut moves);
                }
            }
        }

        moves
    }

    /// Whether a move would leave the side making it in check.
    pub fn is_suicidal(&self, side: Color, m: MoveContext) -> bool {
        let mut board = self.board;
        board.perform(m);
        board.is_check(side, self.royal(side))
    }

    /// The legal moves of the piece on a [`Square`], whatever its color.
    pub fn moves(&self, whence: Square) -> Moves {
        let Some(piece) = self.board[whence] else {
            return Moves::new();
        };

        let mut moves = self.pseudo_moves(whence);
        if piece.role() == Role::King {
            self.castling(whence, piece.color(), &mut moves);
        }

        moves.retain(|m| !self.is_suicidal(piece.color(), *m));
        moves
    }

    /// An iterator over the legal moves of the side to move.
    pub fn legal_moves(&self) -> impl Iterator<Item = MoveContext> + '_ {
        self.board
            .by_color(self.turn)
            .flat_map(move |sq| self.moves(sq))
    }
}
