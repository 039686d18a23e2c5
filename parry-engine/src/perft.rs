//! Performance Test
//!
//! [Perft](https://www.chessprogramming.org/Perft)
//!
//! Counts the leaf nodes of the legal move tree to a fixed depth. The known
//! counts for standard positions pin down the move generator, and the same
//! make and undo discipline search relies on.

use std::ops::{Add, AddAssign};
use std::panic;
use std::thread;

use crate::coretypes::{Move, PlyKind};
use crate::position::Position;
use crate::rules::{Played, Rules};

/// Debugging information about results of perft test.
/// nodes: Number of nodes at lowest depth of perft.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct PerftInfo {
    pub nodes: u64,
}

impl PerftInfo {
    pub const fn new(nodes: u64) -> Self {
        PerftInfo { nodes }
    }
}

impl Add for PerftInfo {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        PerftInfo::new(self.nodes + rhs.nodes)
    }
}

impl AddAssign for PerftInfo {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
    }
}

/// Count the number of nodes at a certain depth.
/// Terminal positions above that depth contribute nothing, so this counts
/// the paths of exactly `ply` moves.
///
/// With more than one thread the root moves are split into contiguous chunks,
/// each walked on its own copy of the position.
pub fn perft(position: Position, ply: PlyKind, threads: usize) -> PerftInfo {
    if ply == 0 {
        return PerftInfo::new(1);
    }
    let mut position = position;
    if ply <= 2 || threads <= 1 {
        return perft_recurse(&mut position, ply);
    }

    let legal_moves = position.get_legal_moves();
    if legal_moves.is_empty() {
        return PerftInfo::new(0);
    }
    let chunk_size = (legal_moves.len() + threads - 1) / threads;

    thread::scope(|scope| {
        let handles: Vec<_> = legal_moves
            .chunks(chunk_size)
            .map(|moves| scope.spawn(move || perft_moves(position, ply, moves)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|err| panic::resume_unwind(err)))
            .fold(PerftInfo::default(), Add::add)
    })
}

/// Perft over a subset of the root moves of `position`.
fn perft_moves(mut position: Position, ply: PlyKind, moves: &[Move]) -> PerftInfo {
    let mut perft_info = PerftInfo::default();
    for &move_ in moves {
        let mut child = Played::new(&mut position, move_);
        perft_info += perft_recurse(&mut *child, ply - 1);
    }
    perft_info
}

/// Ply must be non-zero.
fn perft_recurse<R: Rules>(position: &mut R, ply: PlyKind) -> PerftInfo {
    debug_assert_ne!(ply, 0);
    if ply == 1 {
        // Bulk count at the frontier.
        return PerftInfo::new(position.num_legal_moves() as u64);
    }

    let mut perft_info = PerftInfo::default();
    for legal_move in position.legal_moves() {
        let mut child = Played::new(&mut *position, legal_move);
        perft_info += perft_recurse(&mut *child, ply - 1);
    }
    perft_info
}
