//! Turn ownership, status classification, and the command surface
//! consumed by the presentation layers.

use std::fmt;

use chess_core::{Color, File, PieceKind, PromotionKind, Rank, Square};
use thiserror::Error;

use crate::board::{Board, Piece, PieceId};

/// Status of the side currently to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Nothing special.
    Normal,
    /// The king is attacked but a legal reply exists.
    Check,
    /// No legal reply and the king is not attacked.
    ///
    /// Unlike FIDE chess this engine awards the win to the other
    /// side; the deviation is inherited and kept deliberately.
    Stalemate,
    /// No legal reply and the king is attacked.
    Checkmate,
}

impl Status {
    /// Numeric code used in the compact rendering.
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            Status::Normal => 0,
            Status::Check => 1,
            Status::Stalemate => 2,
            Status::Checkmate => 3,
        }
    }

    /// Returns true if this status ends the game.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Status::Stalemate | Status::Checkmate)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Normal => "normal",
            Status::Check => "check",
            Status::Stalemate => "stalemate",
            Status::Checkmate => "checkmate",
        };
        write!(f, "{}", name)
    }
}

/// Why a move submission was rejected. The board is untouched in
/// every case.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,

    #[error("a promotion is pending, choose the new piece first")]
    PromotionPending,

    #[error("there is no piece at {0}")]
    EmptySquare(Square),

    #[error("it is not {0}'s turn to move")]
    NotYourTurn(Color),

    #[error("{side}'s {kind} cannot move to {to}")]
    CannotMove {
        side: Color,
        kind: PieceKind,
        to: Square,
    },
}

/// Why a promotion submission was rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PromotionError {
    #[error("the game is already over")]
    GameOver,

    #[error("no promotion is pending")]
    NothingToPromote,
}

/// What a committed move did, for the presentation layers to narrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub side: Color,
    pub kind: PieceKind,
    pub from: Square,
    pub to: Square,
    /// Side and kind of the captured piece, if any.
    pub captured: Option<(Color, PieceKind)>,
    /// True if this move was a castling (king and rook both moved).
    pub castled: bool,
    /// True if the mover now owes a promotion choice; the turn has
    /// not been passed yet.
    pub promotion_pending: bool,
    /// Status of the side to move after this command.
    pub status: Status,
}

/// What a committed promotion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionOutcome {
    pub side: Color,
    pub choice: PromotionKind,
    pub square: Square,
    /// Status of the side to move after this command.
    pub status: Status,
}

/// A full chess game: the board plus turn ownership, terminal-state
/// tracking, and the deferred-promotion gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    status: Status,
    winner: Option<Color>,
    promotion_pending: [Option<PieceId>; 2],
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Starts a game from the standard initial arrangement, White to
    /// move.
    pub fn new() -> Self {
        Game {
            board: Board::standard(),
            side_to_move: Color::White,
            status: Status::Normal,
            winner: None,
            promotion_pending: [None; 2],
        }
    }

    /// Starts a game from an arbitrary board with the given side to
    /// move, classifying its status immediately. Intended for setting
    /// up positions in tests.
    pub fn from_position(board: Board, side_to_move: Color) -> Self {
        let mut game = Game {
            board,
            side_to_move,
            status: Status::Normal,
            winner: None,
            promotion_pending: [None; 2],
        };
        game.classify();
        game
    }

    /// Discards all pieces and re-establishes the initial position.
    pub fn reset(&mut self) {
        *self = Game::new();
    }

    /// The board being played on.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The piece occupying a square, if any.
    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.board.piece_at(square)
    }

    /// The pawn of `side` currently capturable en passant, if any.
    pub fn en_passant_target(&self, side: Color) -> Option<&Piece> {
        self.board
            .en_passant_target(side)
            .and_then(|id| self.board.piece(id))
    }

    /// The side whose turn it is.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Status of the side to move.
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// The winner, once the game has been decided.
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Returns true if the side to move owes a promotion choice.
    #[inline]
    pub fn promotion_pending(&self) -> bool {
        self.promotion_pending[self.side_to_move.index()].is_some()
    }

    /// Submits a move for the side to move.
    ///
    /// Castling is recognized first (king moving two files along its
    /// home rank); everything else goes through the oracle and the
    /// dry-run validator. A pawn reaching its promotion rank commits
    /// the move but holds the turn until [`Game::submit_promotion`].
    pub fn submit_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if self.promotion_pending() {
            return Err(MoveError::PromotionPending);
        }

        let (id, side, kind) = {
            let (id, piece) = self
                .board
                .entry_at(from)
                .ok_or(MoveError::EmptySquare(from))?;
            (id, piece.side(), piece.kind())
        };
        if side != self.side_to_move {
            return Err(MoveError::NotYourTurn(side));
        }

        if self.board.try_castle(id, to) {
            self.advance_turn();
            return Ok(MoveOutcome {
                side,
                kind,
                from,
                to,
                captured: None,
                castled: true,
                promotion_pending: false,
                status: self.status,
            });
        }

        let reach = self
            .board
            .dry_run(id, to)
            .ok_or(MoveError::CannotMove { side, kind, to })?;
        let captured = self.board.commit(id, to, reach);

        if kind == PieceKind::Pawn && to.rank() == side.promotion_rank() {
            // The move is fully committed but the turn is frozen
            // until the promotion choice arrives.
            self.promotion_pending[side.index()] = Some(id);
            return Ok(MoveOutcome {
                side,
                kind,
                from,
                to,
                captured,
                castled: false,
                promotion_pending: true,
                status: self.status,
            });
        }

        self.advance_turn();
        Ok(MoveOutcome {
            side,
            kind,
            from,
            to,
            captured,
            castled: false,
            promotion_pending: false,
            status: self.status,
        })
    }

    /// Resolves a pending promotion with the chosen piece kind, then
    /// passes the turn.
    pub fn submit_promotion(
        &mut self,
        choice: PromotionKind,
    ) -> Result<PromotionOutcome, PromotionError> {
        if self.winner.is_some() {
            return Err(PromotionError::GameOver);
        }
        let side = self.side_to_move;
        let id = self.promotion_pending[side.index()].ok_or(PromotionError::NothingToPromote)?;
        let square = self
            .board
            .piece(id)
            .expect("pending promotion pawn is live")
            .square();

        let _ = self.board.promote(id, choice);
        self.promotion_pending[side.index()] = None;

        self.advance_turn();
        Ok(PromotionOutcome {
            side,
            choice,
            square,
            status: self.status,
        })
    }

    /// Verbose annotated rendering: bordered grid with rank and file
    /// legends, rank 8 at the top. Uppercase letters are White.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("  +-----------------+\n");
        for rank in Rank::ALL.iter().rev() {
            out.push(rank.to_char());
            out.push_str(" |");
            for file in File::ALL {
                out.push(' ');
                out.push(self.square_char(Square::new(file, *rank)));
            }
            out.push_str(" |\n");
        }
        out.push_str("  +-----------------+\n");
        out.push_str("    A B C D E F G H\n");
        out
    }

    /// Compact machine-parsable rendering: a header line
    /// `<side> <status-code> <pending>` (`w`/`b`, 0-3, `p`/`-`)
    /// followed by eight rows of piece letters, rank 8 first,
    /// `.` for empty squares.
    pub fn render_compact(&self) -> String {
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let pending = if self.promotion_pending() { 'p' } else { '-' };
        let mut out = format!("{} {} {}\n", side, self.status.code(), pending);
        for rank in Rank::ALL.iter().rev() {
            for file in File::ALL {
                out.push(self.square_char(Square::new(file, *rank)));
            }
            out.push('\n');
        }
        out
    }

    fn square_char(&self, square: Square) -> char {
        self.board
            .piece_at(square)
            .map_or('.', |piece| piece.kind().to_char(piece.side()))
    }

    /// Passes the turn and re-derives the new mover's status.
    fn advance_turn(&mut self) {
        self.side_to_move = self.side_to_move.opposite();
        self.classify();
    }

    /// Classifies the side to move along two axes: is its king
    /// attacked, and does any legal reply exist anywhere.
    fn classify(&mut self) {
        let attacked = self.board.is_attacked(self.side_to_move);
        let stuck = self.board.has_no_legal_move(self.side_to_move);
        self.status = match (attacked, stuck) {
            (true, true) => Status::Checkmate,
            (true, false) => Status::Check,
            (false, true) => Status::Stalemate,
            (false, false) => Status::Normal,
        };
        if self.status.is_terminal() {
            // Stalemate counts as a loss for the stuck side here; see
            // the Status docs.
            self.winner = Some(self.side_to_move.opposite());
        }
    }
}
