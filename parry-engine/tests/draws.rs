//! Draws
//!
//! Tests to ensure game ending positions, including repetitions, are classified
//! and that search stops on them.

use parry_engine::coretypes::{Color::*, GameStatus, Move, Square::*};
use parry_engine::fen::Fen;
use parry_engine::*;

fn status(fen: &str) -> GameStatus {
    Position::parse_fen(fen).unwrap().status()
}

#[test]
fn stalemate() {
    assert_eq!(status("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"), GameStatus::Stalemate);
    // Same position with White to move is an ordinary position.
    assert_eq!(status("7k/5Q2/6K1/8/8/8/8/8 w - - 0 1"), GameStatus::Ongoing);
}

#[test]
fn checkmate_names_winner() {
    assert_eq!(
        status("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1"),
        GameStatus::Checkmate { winner: White }
    );
    assert_eq!(
        status("6k1/8/8/8/8/8/5PPP/r5K1 w - - 1 2"),
        GameStatus::Checkmate { winner: Black }
    );
}

#[test]
fn insufficient_material() {
    for fen in [
        "7k/8/8/8/8/8/8/7K w - - 0 1",
        "7k/8/8/8/8/8/8/2B4K w - - 0 1",
        "7k/8/8/8/8/8/8/2N4K b - - 0 1",
        // Bishops on the same square color.
        "5b1k/8/8/8/8/8/8/2B4K w - - 0 1",
    ] {
        assert_eq!(status(fen), GameStatus::InsufficientMaterial, "{fen}");
    }
    for fen in [
        // Bishops on opposite square colors can still mate.
        "4b2k/8/8/8/8/8/8/2B4K w - - 0 1",
        "6nk/8/8/8/8/8/8/2B4K w - - 0 1",
        "7k/8/8/8/8/8/P7/7K w - - 0 1",
    ] {
        assert_eq!(status(fen), GameStatus::Ongoing, "{fen}");
    }
}

#[test]
fn seventy_five_move_rule() {
    assert_eq!(
        status("4k3/8/8/8/8/8/8/R3K3 w - - 149 90"),
        GameStatus::Ongoing
    );
    assert_eq!(
        status("4k3/8/8/8/8/8/8/R3K3 w - - 150 90"),
        GameStatus::SeventyFiveMoves
    );

    // The quiet move that reaches 150 half moves ends the game.
    let mut position = Position::parse_fen("4k3/8/8/8/8/8/8/R3K3 w - - 149 90").unwrap();
    position.do_legal_move(Move::new(A1, A2, None)).unwrap();
    assert!(position.is_game_over());
    assert_eq!(select_move(&mut position, 3), None);
}

#[test]
fn checkmate_beats_seventy_five_move_rule() {
    // Mate delivered on the move that reaches the limit is still mate.
    assert_eq!(
        status("R5k1/5ppp/8/8/8/8/8/6K1 b - - 150 90"),
        GameStatus::Checkmate { winner: White }
    );
}

#[test]
fn fivefold_repetition_knight_shuffle() {
    let shuffle: [Move; 4] = [
        Move::new(B1, C3, None),
        Move::new(B8, C6, None),
        Move::new(C3, B1, None),
        Move::new(C6, B8, None),
    ];
    let mut game = Game::start_position();
    let mut played = 0;
    while game.status() == GameStatus::Ongoing {
        game.do_legal_move(shuffle[played % shuffle.len()]).unwrap();
        played += 1;
    }

    // Back to the start position for the fifth time.
    assert_eq!(played, 16);
    assert_eq!(game.status(), GameStatus::FivefoldRepetition);
    assert_eq!(
        game.position().to_fen(),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 16 9"
    );
    assert_eq!(select_move(&mut game, 2), None);
}
