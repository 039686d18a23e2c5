//! Performance Test (perft)
//!
//! Tests to ensure engine passes Perft test by checking against pre-determined results.
//! [Perft Results](https://www.chessprogramming.org/Perft_Results)

use std::thread::available_parallelism;

use parry_engine::fen::Fen;
use parry_engine::perft::*;
use parry_engine::*;

const ONE_THREAD: usize = 1;

fn cpu_threads() -> usize {
    available_parallelism()
        .map(|inner| inner.get())
        .unwrap_or(1)
}

/// Run single and multithreaded perft `expected_nodes.len()` times.
/// The index of each expected_node value is its ply.
#[inline(always)]
fn perft_tester(position: Position, expected_nodes: Vec<u64>) {
    for (ply, expected_node) in expected_nodes.into_iter().enumerate() {
        let single_thread_result = perft(position, ply as u8, ONE_THREAD);
        let multi_thread_result = perft(position, ply as u8, cpu_threads());

        println!("perft({ply}): {single_thread_result:?}");
        assert_eq!(single_thread_result.nodes, expected_node);
        assert_eq!(single_thread_result, multi_thread_result);
    }
}

#[test]
fn perft_starting_position() {
    perft_tester(Position::start_position(), vec![1, 20, 400, 8_902, 197_281]);
}

#[test]
#[ignore]
fn perft_starting_position_expensive() {
    let ply5 = perft(Position::start_position(), 5, cpu_threads());
    println!("perft(5): {:?}", ply5);
    assert_eq!(ply5.nodes, 4_865_609);
}

/// Kiwipete exercises castling, en passant, promotion and pins together.
fn kiwipete_position() -> Position {
    Position::parse_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
        .unwrap()
}

#[test]
fn perft_kiwipete_position() {
    perft_tester(kiwipete_position(), vec![1, 48, 2_039, 97_862]);
}

#[test]
#[ignore]
fn perft_kiwipete_position_expensive() {
    let ply4 = perft(kiwipete_position(), 4, cpu_threads());
    assert_eq!(ply4.nodes, 4_085_603);
}

/// Discovered checks and en passant along a rank.
fn position_3() -> Position {
    Position::parse_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap()
}

#[test]
fn perft_test_position_3() {
    perft_tester(position_3(), vec![1, 14, 191, 2_812, 43_238]);
}

fn position_4() -> Position {
    Position::parse_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1").unwrap()
}

#[test]
fn perft_test_position_4() {
    perft_tester(position_4(), vec![1, 6, 264, 9_467]);
}

/// Mirror of position 4, must produce identical counts.
#[test]
fn perft_test_position_4_mirrored() {
    let mirrored = Position::parse_fen(
        "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
    )
    .unwrap();
    assert_eq!(mirrored, position_4().color_flipped());
    perft_tester(mirrored, vec![1, 6, 264, 9_467]);
}

fn position_5() -> Position {
    Position::parse_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8").unwrap()
}

#[test]
fn perft_test_position_5() {
    perft_tester(position_5(), vec![1, 44, 1_486, 62_379]);
}

fn position_6() -> Position {
    Position::parse_fen("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10")
        .unwrap()
}

#[test]
fn perft_test_position_6() {
    perft_tester(position_6(), vec![1, 46, 2_079, 89_890]);
}
