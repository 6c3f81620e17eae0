//! Chess rules engine.
//!
//! This crate owns the board, enforces move legality, and tracks game
//! status:
//! - [`Board`] holds every live piece and answers occupancy and
//!   legality queries, including the speculative dry-run validator
//!   that guards against self-check.
//! - [`Game`] layers turn ownership, castling, en passant, deferred
//!   promotion, and check/checkmate/stalemate classification on top,
//!   exposing the command and query surface the front-ends consume.
//!
//! ```
//! use chess_core::Square;
//! use chess_rules::Game;
//!
//! let mut game = Game::new();
//! let e2 = Square::from_algebraic("E2").unwrap();
//! let e4 = Square::from_algebraic("E4").unwrap();
//! let outcome = game.submit_move(e2, e4).unwrap();
//! assert!(outcome.captured.is_none());
//! ```

mod board;
mod game;
mod movement;

pub use board::{Board, Piece, PieceId, Reach};
pub use game::{Game, MoveError, MoveOutcome, PromotionError, PromotionOutcome, Status};
