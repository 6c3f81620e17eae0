//! Line-mode console front-end for the chess rules engine.
//!
//! Reads whitespace-separated tokens from its input: `quit` exits,
//! `restart` begins a fresh game, a pending promotion consumes one
//! token naming the new piece, and anything else is read as a source
//! coordinate followed by a destination coordinate (e.g. `D2 D4`).
//! All game logic lives in `chess-rules`; this binary only narrates.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use chess_core::{PromotionKind, Square};
use chess_rules::{Game, MoveOutcome, Status};

fn main() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(stdin.lock(), stdout.lock())
}

/// Drives one interactive session over the given streams.
fn run<R: BufRead, W: Write>(input: R, mut out: W) -> io::Result<()> {
    let mut game = Game::new();
    let mut tokens = Tokens::new(input);

    banner(&mut out, &game)?;

    while let Some(token) = tokens.next()? {
        match token.as_str() {
            "quit" => break,
            "restart" => {
                game.reset();
                banner(&mut out, &game)?;
            }
            _ if game.promotion_pending() => match PromotionKind::from_name(&token) {
                Some(choice) => match game.submit_promotion(choice) {
                    Ok(outcome) => {
                        writeln!(
                            out,
                            "{}'s pawn at {} is promoted to a {}",
                            outcome.side, outcome.square, outcome.choice
                        )?;
                        report_status(&mut out, &game)?;
                        draw(&mut out, &game)?;
                    }
                    Err(err) => writeln!(out, "{err}")?,
                },
                None => writeln!(
                    out,
                    "\"{token}\" is not a valid promotion; choose queen, rook, bishop or knight"
                )?,
            },
            _ => {
                let Some(second) = tokens.next()? else { break };
                match (
                    Square::from_algebraic(&token),
                    Square::from_algebraic(&second),
                ) {
                    (None, _) => writeln!(out, "{token} is not a valid position!")?,
                    (_, None) => writeln!(out, "{second} is not a valid position!")?,
                    (Some(src), Some(dst)) => match game.submit_move(src, dst) {
                        Ok(outcome) => {
                            narrate(&mut out, &game, outcome)?;
                            draw(&mut out, &game)?;
                        }
                        Err(err) => writeln!(out, "{err}")?,
                    },
                }
            }
        }
    }
    Ok(())
}

fn banner<W: Write>(out: &mut W, game: &Game) -> io::Result<()> {
    writeln!(out, "====================")?;
    writeln!(out, "  New Game Started  ")?;
    writeln!(out, "====================")?;
    writeln!(out)?;
    draw(out, game)
}

fn draw<W: Write>(out: &mut W, game: &Game) -> io::Result<()> {
    write!(out, "{}", game.render())?;
    writeln!(out)
}

fn narrate<W: Write>(out: &mut W, game: &Game, outcome: MoveOutcome) -> io::Result<()> {
    if outcome.castled {
        writeln!(out, "{} castles: king to {}", outcome.side, outcome.to)?;
    } else {
        write!(
            out,
            "{}'s {} moves from {} to {}",
            outcome.side, outcome.kind, outcome.from, outcome.to
        )?;
        if let Some((side, kind)) = outcome.captured {
            write!(out, " taking {side}'s {kind}")?;
        }
        writeln!(out)?;
    }
    if outcome.promotion_pending {
        writeln!(
            out,
            "{}'s pawn must be promoted: choose queen, rook, bishop or knight",
            outcome.side
        )?;
        return Ok(());
    }
    report_status(out, game)
}

fn report_status<W: Write>(out: &mut W, game: &Game) -> io::Result<()> {
    match game.status() {
        Status::Normal => {}
        Status::Check => writeln!(out, "{} is in check", game.side_to_move())?,
        Status::Stalemate | Status::Checkmate => {
            writeln!(out, "{} is in {}", game.side_to_move(), game.status())?;
            if let Some(winner) = game.winner() {
                writeln!(out, "{winner} wins!")?;
            }
        }
    }
    Ok(())
}

/// Whitespace token stream over a buffered reader, spanning lines.
struct Tokens<R> {
    reader: R,
    queued: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Tokens {
            reader,
            queued: VecDeque::new(),
        }
    }

    fn next(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.queued.pop_front() {
                return Ok(Some(token));
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.queued
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }
}
