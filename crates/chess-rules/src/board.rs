//! Board state: piece ownership, occupancy, and the speculative
//! move validator.
//!
//! The board owns every live piece in a slot arena and mirrors their
//! positions in an 8×8 occupancy grid of [`PieceId`] handles. All
//! legality questions funnel through [`Board::dry_run`], which applies
//! a move speculatively, tests whether the mover's own king would be
//! attacked, and rolls the board back before returning on every path.

use chess_core::{Color, File, PieceKind, PromotionKind, Rank, Square};

use crate::movement;

/// Handle to a piece in the board's slot arena.
///
/// Slots are never reused within a game, so a handle held across the
/// referenced piece's capture resolves to nothing instead of aliasing
/// a different piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(u16);

/// A piece owned by the board.
///
/// Side and kind are fixed at creation; the square and moved flag
/// change as the piece is relocated. The moved flag is never reset:
/// castling eligibility and the pawn double-step both depend on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    side: Color,
    kind: PieceKind,
    square: Square,
    has_moved: bool,
}

impl Piece {
    /// The side this piece belongs to.
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    /// The kind of this piece.
    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// The square this piece currently occupies.
    #[inline]
    pub fn square(&self) -> Square {
        self.square
    }

    /// Whether this piece has ever been relocated.
    #[inline]
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }
}

/// Outcome of a legality probe: either a quiet relocation or a
/// capture of an identified piece.
///
/// Carrying the victim's handle lets callers resolve the capture
/// without a second occupancy lookup; for en passant the victim does
/// not even stand on the destination square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    Quiet,
    Capture(PieceId),
}

impl Reach {
    /// The captured piece, if this outcome is a capture.
    #[inline]
    pub fn captured(self) -> Option<PieceId> {
        match self {
            Reach::Quiet => None,
            Reach::Capture(id) => Some(id),
        }
    }
}

/// The 8×8 board and every piece on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    slots: Vec<Option<Piece>>,
    grid: [Option<PieceId>; 64],
    kings: [Option<PieceId>; 2],
    en_passant: [Option<PieceId>; 2],
}

impl Board {
    /// Creates a board with no pieces on it.
    ///
    /// Attack and legality queries require both kings; place them
    /// before asking. Intended for setting up test positions.
    pub fn empty() -> Self {
        Board {
            slots: Vec::with_capacity(32),
            grid: [None; 64],
            kings: [None; 2],
            en_passant: [None; 2],
        }
    }

    /// Creates a board in the standard initial arrangement.
    pub fn standard() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::empty();
        for side in Color::ALL {
            let home = side.home_rank();
            let pawn_rank = Rank::from_index((home.index() as i8 + side.pawn_direction()) as u8)
                .expect("pawn rank neighbors the home rank");
            for (file, kind) in File::ALL.into_iter().zip(BACK_RANK) {
                let _ = board.place(side, kind, Square::new(file, home));
            }
            for file in File::ALL {
                let _ = board.place(side, PieceKind::Pawn, Square::new(file, pawn_rank));
            }
        }
        board
    }

    /// Places a new, unmoved piece on an empty square and returns its
    /// handle.
    pub fn place(&mut self, side: Color, kind: PieceKind, square: Square) -> PieceId {
        debug_assert!(self.is_empty(square), "{square} is already occupied");
        self.insert(Piece {
            side,
            kind,
            square,
            has_moved: false,
        })
    }

    /// Returns the piece a handle refers to, or `None` if it has been
    /// captured or replaced since the handle was obtained.
    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.slots[id.0 as usize].as_ref()
    }

    /// Returns the handle of the piece occupying a square.
    #[inline]
    pub fn id_at(&self, square: Square) -> Option<PieceId> {
        self.grid[square.index() as usize]
    }

    /// Returns the piece occupying a square.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.id_at(square).map(|id| self.live(id))
    }

    /// Returns the occupant of a square together with its handle.
    #[inline]
    pub fn entry_at(&self, square: Square) -> Option<(PieceId, &Piece)> {
        self.id_at(square).map(|id| (id, self.live(id)))
    }

    /// Returns true if no piece occupies the square.
    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.id_at(square).is_none()
    }

    /// Iterates over all live pieces of one side.
    pub fn pieces_of(&self, side: Color) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            slot.as_ref()
                .filter(|piece| piece.side == side)
                .map(|piece| (PieceId(i as u16), piece))
        })
    }

    /// The pawn of `side` that may currently be captured en passant,
    /// if any. The window lasts exactly one opposing reply.
    #[inline]
    pub fn en_passant_target(&self, side: Color) -> Option<PieceId> {
        self.en_passant[side.index()]
    }

    /// Asks the legality oracle whether a piece can reach a square,
    /// ignoring king safety. Pure; never touches board state.
    pub fn reach(&self, id: PieceId, dst: Square) -> Option<Reach> {
        movement::reach(self, id, dst)
    }

    /// Returns true if any piece of `by` can reach `target` according
    /// to the oracle.
    ///
    /// The scan walks the grid, not the slot arena: a victim lifted
    /// off the grid inside [`Board::dry_run`] must not keep attacking
    /// from its still-live slot.
    pub fn square_attacked(&self, target: Square, by: Color) -> bool {
        Square::all()
            .filter_map(|square| self.id_at(square))
            .any(|id| self.live(id).side == by && self.reach(id, target).is_some())
    }

    /// Returns true if `side`'s king is attacked by any opposing
    /// piece.
    pub fn is_attacked(&self, side: Color) -> bool {
        self.square_attacked(self.king_square(side), side.opposite())
    }

    /// Speculatively applies a move, verifies the mover's own king is
    /// not left in check, and rolls the board back.
    ///
    /// Whatever the answer, the board is bit-for-bit identical to its
    /// state before the call when this returns. On success the
    /// returned [`Reach`] identifies the piece that an actual commit
    /// would capture.
    pub fn dry_run(&mut self, id: PieceId, dst: Square) -> Option<Reach> {
        let reach = self.reach(id, dst)?;
        let captured = reach.captured();

        let (side, from, had_moved) = {
            let piece = self.live(id);
            (piece.side, piece.square, piece.has_moved)
        };
        let captured_square = captured.map(|victim| self.live(victim).square);

        // Apply: lift the victim off the grid, then relocate the
        // mover. The victim's slot stays alive; the attack test only
        // consults the grid, so it cannot see the lifted piece.
        if let Some(square) = captured_square {
            self.grid[square.index() as usize] = None;
        }
        self.grid[from.index() as usize] = None;
        self.grid[dst.index() as usize] = Some(id);
        {
            let piece = self.live_mut(id);
            piece.square = dst;
            piece.has_moved = true;
        }

        let safe = !self.is_attacked(side);

        // Restore, unconditionally and in reverse.
        {
            let piece = self.live_mut(id);
            piece.square = from;
            piece.has_moved = had_moved;
        }
        self.grid[dst.index() as usize] = None;
        self.grid[from.index() as usize] = Some(id);
        if let (Some(victim), Some(square)) = (captured, captured_square) {
            self.grid[square.index() as usize] = Some(victim);
        }

        if safe {
            Some(reach)
        } else {
            None
        }
    }

    /// Returns true if `side` has no legal move anywhere on the
    /// board: every piece × every destination fails [`Board::dry_run`].
    ///
    /// Castling is left out of this scan on purpose. Its own
    /// preconditions require the king's transit squares to be empty
    /// and unattacked, so whenever castling would be available the
    /// king already has an ordinary legal step and the scan returns
    /// false without it.
    pub fn has_no_legal_move(&mut self, side: Color) -> bool {
        let ids: Vec<PieceId> = self.pieces_of(side).map(|(id, _)| id).collect();
        for id in ids {
            for dst in Square::all() {
                if self.dry_run(id, dst).is_some() {
                    return false;
                }
            }
        }
        true
    }

    /// Commits a move previously validated by [`Board::dry_run`]:
    /// destroys the victim (if any), relocates the mover, and updates
    /// the mover's en-passant window. Returns the victim's side and
    /// kind for narration.
    pub(crate) fn commit(&mut self, id: PieceId, dst: Square, reach: Reach) -> Option<(Color, PieceKind)> {
        let captured = reach.captured().map(|victim| {
            let (side, kind) = {
                let piece = self.live(victim);
                (piece.side, piece.kind)
            };
            self.destroy(victim);
            (side, kind)
        });

        let (side, kind, from) = {
            let piece = self.live(id);
            (piece.side, piece.kind, piece.square)
        };
        self.relocate(id, dst);

        // A double-stepped pawn becomes this side's en-passant target
        // for exactly one opposing reply; any other move by this side
        // closes the window.
        let rank_delta = dst.rank().index() as i8 - from.rank().index() as i8;
        self.en_passant[side.index()] = if kind == PieceKind::Pawn && rank_delta.abs() == 2 {
            Some(id)
        } else {
            None
        };

        captured
    }

    /// Attempts castling for the king `id` toward `dst`, committing it
    /// atomically on success.
    ///
    /// Preconditions, checked in order: the piece is an unmoved king,
    /// the destination lies on its home rank exactly two files away,
    /// the path to the rank corner is empty, the corner holds an
    /// unmoved piece (which can only be the original rook), and none
    /// of the three squares the king starts on, crosses, or lands on
    /// is attacked.
    pub(crate) fn try_castle(&mut self, id: PieceId, dst: Square) -> bool {
        let (side, from, kind, has_moved) = {
            let piece = self.live(id);
            (piece.side, piece.square, piece.kind, piece.has_moved)
        };
        if kind != PieceKind::King || has_moved {
            return false;
        }

        let home = side.home_rank();
        if from.rank() != home || dst.rank() != home {
            return false;
        }
        let file_delta = dst.file().index() as i8 - from.file().index() as i8;
        if file_delta.abs() != 2 {
            return false;
        }
        let step = file_delta.signum();

        let corner_file = if step > 0 { File::H } else { File::A };
        let corner = Square::new(corner_file, home);

        // Every square strictly between the king and the corner must
        // be empty.
        let mut file = from.file().index() as i8 + step;
        while file != corner_file.index() as i8 {
            let square = Square::new(
                File::from_index(file as u8).expect("file stays on the board"),
                home,
            );
            if !self.is_empty(square) {
                return false;
            }
            file += step;
        }

        let rook = match self.id_at(corner) {
            Some(rook) if !self.live(rook).has_moved => rook,
            _ => return false,
        };

        // The king may not castle out of, through, or into an attack.
        let enemy = side.opposite();
        for hop in 0..=2 {
            let square = from
                .offset(step * hop, 0)
                .expect("castling track stays on the home rank");
            if self.square_attacked(square, enemy) {
                return false;
            }
        }

        // Atomic commit: king two files over, rook on the square the
        // king crossed.
        let rook_dst = from
            .offset(step, 0)
            .expect("rook destination stays on the home rank");
        self.relocate(id, dst);
        self.relocate(rook, rook_dst);
        self.en_passant[side.index()] = None;
        true
    }

    /// Replaces the promotion pawn `id` with a fresh piece of the
    /// chosen kind on the same square, returning the new handle.
    ///
    /// The replacement is created with its moved flag already set, so
    /// it can never satisfy the unmoved-corner-piece test in castling.
    pub(crate) fn promote(&mut self, id: PieceId, choice: PromotionKind) -> PieceId {
        let (side, square) = {
            let piece = self.live(id);
            debug_assert_eq!(piece.kind, PieceKind::Pawn, "only pawns promote");
            (piece.side, piece.square)
        };
        self.destroy(id);
        self.insert(Piece {
            side,
            kind: choice.kind(),
            square,
            has_moved: true,
        })
    }

    /// Square of `side`'s king. A board without a king for `side` is
    /// a contract violation.
    fn king_square(&self, side: Color) -> Square {
        let id = self.kings[side.index()].expect("board holds a king for each side");
        self.live(id).square
    }

    fn insert(&mut self, piece: Piece) -> PieceId {
        let id = PieceId(self.slots.len() as u16);
        if piece.kind == PieceKind::King {
            debug_assert!(
                self.kings[piece.side.index()].is_none(),
                "one king per side"
            );
            self.kings[piece.side.index()] = Some(id);
        }
        self.grid[piece.square.index() as usize] = Some(id);
        self.slots.push(Some(piece));
        id
    }

    /// Moves a live piece to an empty square and marks it moved.
    fn relocate(&mut self, id: PieceId, dst: Square) {
        let from = self.live(id).square;
        debug_assert!(self.is_empty(dst), "relocation target is empty");
        self.grid[from.index() as usize] = None;
        self.grid[dst.index() as usize] = Some(id);
        let piece = self.live_mut(id);
        piece.square = dst;
        piece.has_moved = true;
    }

    /// Destroys a captured or replaced piece and invalidates any
    /// cached handle to it at the same moment.
    fn destroy(&mut self, id: PieceId) {
        if let Some(piece) = self.slots[id.0 as usize].take() {
            debug_assert_ne!(piece.kind, PieceKind::King, "kings are never captured");
            self.grid[piece.square.index() as usize] = None;
            for target in &mut self.en_passant {
                if *target == Some(id) {
                    *target = None;
                }
            }
        }
    }

    #[inline]
    fn live(&self, id: PieceId) -> &Piece {
        self.slots[id.0 as usize]
            .as_ref()
            .expect("piece handle refers to a live piece")
    }

    #[inline]
    fn live_mut(&mut self, id: PieceId) -> &mut Piece {
        self.slots[id.0 as usize]
            .as_mut()
            .expect("piece handle refers to a live piece")
    }
}
