//! Per-kind movement geometry.
//!
//! [`reach`] answers whether a piece can reach a destination square
//! and what, if anything, it would capture there. It never mutates
//! the board and ignores king safety; [`Board::dry_run`] layers that
//! on top. Castling is not expressed here — it is a compound move
//! with its own precondition gate on the board.

use chess_core::{PieceKind, Square};

use crate::board::{Board, Piece, PieceId, Reach};

/// The legality oracle shared by every kind.
///
/// Common precondition: the destination may not hold a piece of the
/// mover's own side (this also rules out "moving" to the source
/// square). Kind-specific geometry and path emptiness decide the
/// rest; occupancy of the destination decides quiet move vs capture.
pub(crate) fn reach(board: &Board, id: PieceId, dst: Square) -> Option<Reach> {
    let piece = board.piece(id)?;
    let from = piece.square();

    let occupant = board.id_at(dst);
    if let Some(other) = occupant.and_then(|o| board.piece(o)) {
        if other.side() == piece.side() {
            return None;
        }
    }

    let file_delta = dst.file().index() as i8 - from.file().index() as i8;
    let rank_delta = dst.rank().index() as i8 - from.rank().index() as i8;

    let reachable = match piece.kind() {
        PieceKind::King => file_delta.abs().max(rank_delta.abs()) == 1,
        PieceKind::Rook => {
            (file_delta == 0 || rank_delta == 0) && path_clear(board, from, dst)
        }
        PieceKind::Bishop => {
            file_delta.abs() == rank_delta.abs() && path_clear(board, from, dst)
        }
        PieceKind::Queen => {
            (file_delta == 0 || rank_delta == 0 || file_delta.abs() == rank_delta.abs())
                && path_clear(board, from, dst)
        }
        PieceKind::Knight => {
            (file_delta.abs() == 1 && rank_delta.abs() == 2)
                || (file_delta.abs() == 2 && rank_delta.abs() == 1)
        }
        PieceKind::Pawn => return pawn_reach(board, piece, dst, file_delta, rank_delta),
    };

    if !reachable {
        return None;
    }
    Some(occupant.map_or(Reach::Quiet, Reach::Capture))
}

/// Pawn geometry: single step onto an empty square, diagonal step
/// capturing the occupant or the adjacent en-passant pawn, or a
/// double step from the starting position. Anything else is illegal.
fn pawn_reach(
    board: &Board,
    piece: &Piece,
    dst: Square,
    file_delta: i8,
    rank_delta: i8,
) -> Option<Reach> {
    let dir = piece.side().pawn_direction();

    if file_delta == 0 && rank_delta == dir {
        return board.is_empty(dst).then_some(Reach::Quiet);
    }

    if file_delta.abs() == 1 && rank_delta == dir {
        // Same-side occupants were already filtered by the caller.
        if let Some(victim) = board.id_at(dst) {
            return Some(Reach::Capture(victim));
        }
        // En passant: the victim stands beside the pawn, on the
        // destination file but the pawn's own rank, and must be the
        // opponent's currently flagged double-stepper.
        let beside = Square::new(dst.file(), piece.square().rank());
        if let Some(victim) = board.id_at(beside) {
            if Some(victim) == board.en_passant_target(piece.side().opposite()) {
                return Some(Reach::Capture(victim));
            }
        }
        return None;
    }

    if file_delta == 0 && rank_delta == 2 * dir && !piece.has_moved() {
        let skipped = piece.square().offset(0, dir)?;
        return (board.is_empty(skipped) && board.is_empty(dst)).then_some(Reach::Quiet);
    }

    None
}

/// Walks the straight or diagonal line strictly between two squares,
/// checking that every intermediate square is empty.
fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    let step_file = (to.file().index() as i8 - from.file().index() as i8).signum();
    let step_rank = (to.rank().index() as i8 - from.rank().index() as i8).signum();

    let mut square = from;
    loop {
        square = match square.offset(step_file, step_rank) {
            Some(next) => next,
            None => return false,
        };
        if square == to {
            return true;
        }
        if !board.is_empty(square) {
            return false;
        }
    }
}
