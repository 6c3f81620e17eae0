//! Core types for chess.
//!
//! This crate provides the fundamental types used across the rules engine:
//! - [`Color`] for the two sides
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`PieceKind`] and [`PromotionKind`] for piece classification
//!
//! It carries no game state; board ownership and move legality live in
//! the `chess-rules` crate.

mod color;
mod piece;
mod square;

pub use color::Color;
pub use piece::{PieceKind, PromotionKind};
pub use square::{File, Rank, Square};
