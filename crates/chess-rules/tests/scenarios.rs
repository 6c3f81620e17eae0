//! Game-level scenario tests: turn discipline, the special moves,
//! and terminal classification.

use chess_core::{Color, PieceKind, PromotionKind, Square};
use chess_rules::{Board, Game, MoveError, MoveOutcome, PromotionError, Status};
use proptest::prelude::*;

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

fn play(game: &mut Game, from: &str, to: &str) -> MoveOutcome {
    game.submit_move(sq(from), sq(to))
        .unwrap_or_else(|e| panic!("{from}-{to} rejected: {e}"))
}

#[test]
fn turn_discipline() {
    let mut game = Game::new();

    // Black may not open, and the rejection mutates nothing.
    let before = game.clone();
    assert_eq!(
        game.submit_move(sq("E7"), sq("E5")),
        Err(MoveError::NotYourTurn(Color::Black))
    );
    assert_eq!(game, before);

    let _ = play(&mut game, "E2", "E4");

    // Now it is Black's turn and White is locked out.
    let before = game.clone();
    assert_eq!(
        game.submit_move(sq("D2"), sq("D4")),
        Err(MoveError::NotYourTurn(Color::White))
    );
    assert_eq!(game, before);
}

#[test]
fn check_flips_on_when_a_line_opens_and_off_when_blocked() {
    let mut game = Game::new();
    let _ = play(&mut game, "E2", "E4");
    let _ = play(&mut game, "E7", "E5");
    let _ = play(&mut game, "D1", "H5");
    let _ = play(&mut game, "G7", "G6");

    // Queen takes the E5 pawn; the E file to the king is now open.
    let outcome = play(&mut game, "H5", "E5");
    assert_eq!(outcome.captured, Some((Color::Black, PieceKind::Pawn)));
    assert_eq!(outcome.status, Status::Check);
    assert_eq!(game.status(), Status::Check);
    assert!(game.winner().is_none());

    // While in check, unrelated moves stay illegal.
    assert_eq!(
        game.submit_move(sq("A7"), sq("A6")),
        Err(MoveError::CannotMove {
            side: Color::Black,
            kind: PieceKind::Pawn,
            to: sq("A6"),
        })
    );

    // Interposing the bishop blocks the line again.
    let outcome = play(&mut game, "F8", "E7");
    assert_eq!(outcome.status, Status::Normal);
    assert_eq!(game.status(), Status::Normal);
}

#[test]
fn check_is_resolved_by_capturing_the_checker() {
    let mut game = Game::new();
    let _ = play(&mut game, "E2", "E4");
    let _ = play(&mut game, "E7", "E5");
    let _ = play(&mut game, "D1", "H5");
    let _ = play(&mut game, "B8", "C6");

    // The undefended queen grabs F7 with check; the king takes it
    // straight back and play continues.
    let outcome = play(&mut game, "H5", "F7");
    assert_eq!(outcome.captured, Some((Color::Black, PieceKind::Pawn)));
    assert_eq!(outcome.status, Status::Check);
    assert!(game.winner().is_none());

    let outcome = play(&mut game, "E8", "F7");
    assert_eq!(outcome.captured, Some((Color::White, PieceKind::Queen)));
    assert_eq!(outcome.status, Status::Normal);
    assert_eq!(game.side_to_move(), Color::White);
    assert!(game.winner().is_none());
}

#[test]
fn check_with_a_lone_capture_escape_is_not_mate() {
    // The cornered king's one legal move is taking the adjacent
    // queen; that single escape keeps this from being checkmate.
    let mut board = Board::empty();
    let _ = board.place(Color::White, PieceKind::King, sq("A1"));
    let _ = board.place(Color::Black, PieceKind::Queen, sq("B2"));
    let _ = board.place(Color::Black, PieceKind::King, sq("D4"));
    let mut game = Game::from_position(board, Color::White);

    assert_eq!(game.status(), Status::Check);
    assert!(game.winner().is_none());

    let outcome = play(&mut game, "A1", "B2");
    assert_eq!(outcome.captured, Some((Color::Black, PieceKind::Queen)));
    assert_eq!(outcome.status, Status::Normal);
    assert!(game.winner().is_none());
}

#[test]
fn kingside_castling_relocates_both_pieces_atomically() {
    let mut game = Game::new();
    let _ = play(&mut game, "E2", "E4");
    let _ = play(&mut game, "E7", "E5");
    let _ = play(&mut game, "G1", "F3");
    let _ = play(&mut game, "B8", "C6");
    let _ = play(&mut game, "F1", "C4");
    let _ = play(&mut game, "G8", "F6");

    let outcome = play(&mut game, "E1", "G1");
    assert!(outcome.castled);
    assert_eq!(outcome.captured, None);

    let king = game.piece_at(sq("G1")).expect("king landed on G1");
    assert_eq!(king.kind(), PieceKind::King);
    assert!(king.has_moved());
    let rook = game.piece_at(sq("F1")).expect("rook crossed to F1");
    assert_eq!(rook.kind(), PieceKind::Rook);
    assert!(rook.has_moved());
    assert!(game.board().is_empty(sq("E1")));
    assert!(game.board().is_empty(sq("H1")));
    assert_eq!(game.side_to_move(), Color::Black);
}

#[test]
fn queenside_castling_works_too() {
    let mut board = Board::empty();
    let _ = board.place(Color::White, PieceKind::King, sq("E1"));
    let _ = board.place(Color::White, PieceKind::Rook, sq("A1"));
    let _ = board.place(Color::Black, PieceKind::King, sq("E8"));
    let mut game = Game::from_position(board, Color::White);

    let outcome = play(&mut game, "E1", "C1");
    assert!(outcome.castled);
    assert_eq!(game.piece_at(sq("C1")).map(|p| p.kind()), Some(PieceKind::King));
    assert_eq!(game.piece_at(sq("D1")).map(|p| p.kind()), Some(PieceKind::Rook));
    assert!(game.board().is_empty(sq("A1")));
}

#[test]
fn castling_is_refused_through_an_attacked_square() {
    let mut board = Board::empty();
    let _ = board.place(Color::White, PieceKind::King, sq("E1"));
    let _ = board.place(Color::White, PieceKind::Rook, sq("H1"));
    let _ = board.place(Color::Black, PieceKind::King, sq("E8"));
    // Black rook covers F1, the square the king would cross.
    let _ = board.place(Color::Black, PieceKind::Rook, sq("F8"));
    let mut game = Game::from_position(board, Color::White);

    assert_eq!(
        game.submit_move(sq("E1"), sq("G1")),
        Err(MoveError::CannotMove {
            side: Color::White,
            kind: PieceKind::King,
            to: sq("G1"),
        })
    );
}

#[test]
fn castling_is_refused_once_the_rook_has_moved() {
    let mut board = Board::empty();
    let _ = board.place(Color::White, PieceKind::King, sq("E1"));
    let _ = board.place(Color::White, PieceKind::Rook, sq("H1"));
    let _ = board.place(Color::Black, PieceKind::King, sq("E8"));
    let mut game = Game::from_position(board, Color::White);

    // Shuffle the rook out and back; the moved flag never resets.
    let _ = play(&mut game, "H1", "H3");
    let _ = play(&mut game, "E8", "D8");
    let _ = play(&mut game, "H3", "H1");
    let _ = play(&mut game, "D8", "E8");

    assert!(game.submit_move(sq("E1"), sq("G1")).is_err());
}

#[test]
fn castling_is_refused_through_a_blocked_path() {
    let mut game = Game::new();
    // Bishop and knight still stand between king and rook.
    assert!(game.submit_move(sq("E1"), sq("G1")).is_err());
}

#[test]
fn en_passant_window_opens_for_exactly_one_reply() {
    let mut game = Game::new();
    let _ = play(&mut game, "E2", "E4");
    let _ = play(&mut game, "A7", "A6");
    let _ = play(&mut game, "E4", "E5");
    let _ = play(&mut game, "D7", "D5");

    // The double-stepper is flagged and the capture is available now.
    let target = game.en_passant_target(Color::Black).expect("flagged pawn");
    assert_eq!(target.square(), sq("D5"));
    {
        let mut probe = game.clone();
        let outcome = play(&mut probe, "E5", "D6");
        assert_eq!(outcome.captured, Some((Color::Black, PieceKind::Pawn)));
        assert!(probe.board().is_empty(sq("D5")), "victim leaves its own square");
        assert_eq!(
            probe.piece_at(sq("D6")).map(|p| p.kind()),
            Some(PieceKind::Pawn)
        );
    }

    // One move later the window has closed.
    let _ = play(&mut game, "B1", "C3");
    let _ = play(&mut game, "A6", "A5");
    assert!(game.en_passant_target(Color::Black).is_none());
    assert_eq!(
        game.submit_move(sq("E5"), sq("D6")),
        Err(MoveError::CannotMove {
            side: Color::White,
            kind: PieceKind::Pawn,
            to: sq("D6"),
        })
    );
}

#[test]
fn promotion_gates_every_other_move_until_resolved() {
    let mut board = Board::empty();
    let _ = board.place(Color::White, PieceKind::King, sq("E1"));
    let _ = board.place(Color::Black, PieceKind::King, sq("H7"));
    let _ = board.place(Color::White, PieceKind::Pawn, sq("B7"));
    let _ = board.place(Color::White, PieceKind::Knight, sq("D3"));
    let mut game = Game::from_position(board, Color::White);

    let outcome = play(&mut game, "B7", "B8");
    assert!(outcome.promotion_pending);
    assert!(game.promotion_pending());
    // The move itself is committed, but the turn has not passed.
    assert_eq!(game.side_to_move(), Color::White);
    assert_eq!(game.piece_at(sq("B8")).map(|p| p.kind()), Some(PieceKind::Pawn));

    // Everything but the promotion choice is refused.
    assert_eq!(
        game.submit_move(sq("D3"), sq("E5")),
        Err(MoveError::PromotionPending)
    );
    assert_eq!(
        game.submit_move(sq("H7"), sq("H6")),
        Err(MoveError::PromotionPending)
    );

    let outcome = game.submit_promotion(PromotionKind::Queen).unwrap();
    assert_eq!(outcome.square, sq("B8"));
    assert_eq!(outcome.side, Color::White);
    assert_eq!(game.piece_at(sq("B8")).map(|p| p.kind()), Some(PieceKind::Queen));
    assert!(!game.promotion_pending());
    assert_eq!(game.side_to_move(), Color::Black);

    // No second promotion to claim.
    let mut black_turn = game.clone();
    assert_eq!(
        black_turn.submit_promotion(PromotionKind::Rook),
        Err(PromotionError::NothingToPromote)
    );
}

#[test]
fn capturing_into_the_promotion_rank_also_defers() {
    let mut board = Board::empty();
    let _ = board.place(Color::White, PieceKind::King, sq("E1"));
    let _ = board.place(Color::Black, PieceKind::King, sq("H7"));
    let _ = board.place(Color::White, PieceKind::Pawn, sq("B7"));
    let _ = board.place(Color::Black, PieceKind::Rook, sq("A8"));
    let mut game = Game::from_position(board, Color::White);

    let outcome = play(&mut game, "B7", "A8");
    assert_eq!(outcome.captured, Some((Color::Black, PieceKind::Rook)));
    assert!(outcome.promotion_pending);

    let outcome = game.submit_promotion(PromotionKind::Knight).unwrap();
    assert_eq!(outcome.square, sq("A8"));
    assert_eq!(game.piece_at(sq("A8")).map(|p| p.kind()), Some(PieceKind::Knight));
}

#[test]
fn fools_mate_is_checkmate_for_black() {
    let mut game = Game::new();
    let _ = play(&mut game, "F2", "F3");
    let _ = play(&mut game, "E7", "E5");
    let _ = play(&mut game, "G2", "G4");
    let outcome = play(&mut game, "D8", "H4");

    assert_eq!(outcome.status, Status::Checkmate);
    assert_eq!(game.status(), Status::Checkmate);
    assert_eq!(game.winner(), Some(Color::Black));

    // The game is decided; every further command bounces.
    assert_eq!(
        game.submit_move(sq("E2"), sq("E3")),
        Err(MoveError::GameOver)
    );
    assert_eq!(
        game.submit_promotion(PromotionKind::Queen),
        Err(PromotionError::GameOver)
    );
}

#[test]
fn stalemate_awards_win_to_other_side() {
    // Queen to G6 leaves the cornered king unattacked but with no
    // legal reply. This engine scores that as a win for the side
    // that delivered it, not a draw.
    let mut board = Board::empty();
    let _ = board.place(Color::Black, PieceKind::King, sq("H8"));
    let _ = board.place(Color::White, PieceKind::King, sq("F6"));
    let _ = board.place(Color::White, PieceKind::Queen, sq("G2"));
    let mut game = Game::from_position(board, Color::White);

    let outcome = play(&mut game, "G2", "G6");
    assert_eq!(outcome.status, Status::Stalemate);
    assert_eq!(game.winner(), Some(Color::White));
    assert_eq!(
        game.submit_move(sq("H8"), sq("H7")),
        Err(MoveError::GameOver)
    );
}

#[test]
fn constructed_checkmate_is_classified_on_entry() {
    // Back-rank mate: the rook pins the king behind its own pawns.
    let mut board = Board::empty();
    let _ = board.place(Color::Black, PieceKind::King, sq("H8"));
    let _ = board.place(Color::Black, PieceKind::Pawn, sq("G7"));
    let _ = board.place(Color::Black, PieceKind::Pawn, sq("H7"));
    let _ = board.place(Color::White, PieceKind::Rook, sq("A8"));
    let _ = board.place(Color::White, PieceKind::King, sq("E1"));
    let game = Game::from_position(board, Color::Black);

    assert_eq!(game.status(), Status::Checkmate);
    assert_eq!(game.winner(), Some(Color::White));
}

#[test]
fn compact_rendering_reflects_pending_promotion_and_check() {
    let mut board = Board::empty();
    let _ = board.place(Color::White, PieceKind::King, sq("E1"));
    let _ = board.place(Color::Black, PieceKind::King, sq("H7"));
    let _ = board.place(Color::White, PieceKind::Pawn, sq("B7"));
    let mut game = Game::from_position(board, Color::White);

    let _ = play(&mut game, "B7", "B8");
    let header = game.render_compact();
    assert!(header.starts_with("w 0 p"), "got: {header}");

    let _ = game.submit_promotion(PromotionKind::Queen).unwrap();
    let header = game.render_compact();
    assert!(header.starts_with("b 0 -"), "got: {header}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // From positions reached by arbitrary play, probing any square
    // pair through the validator leaves the board untouched.
    #[test]
    fn dry_run_is_pure_on_reached_positions(
        seeds in proptest::collection::vec((0u8..64, 0u8..64), 0..24),
        probe in (0u8..64, 0u8..64),
    ) {
        let mut game = Game::new();
        for (from, to) in seeds {
            let from = Square::from_index(from).unwrap();
            let to = Square::from_index(to).unwrap();
            if game.promotion_pending() {
                let _ = game.submit_promotion(PromotionKind::Queen);
            }
            let _ = game.submit_move(from, to);
        }

        let mut board = game.board().clone();
        let before = board.clone();
        let from = Square::from_index(probe.0).unwrap();
        let to = Square::from_index(probe.1).unwrap();
        if let Some(id) = board.id_at(from) {
            let _ = board.dry_run(id, to);
            prop_assert_eq!(&before, &board);
        }
    }
}
