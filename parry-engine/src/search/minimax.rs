//! Minimax implementation.
//!
//! Plain minimax visits every node to the requested depth. It chooses exactly as
//! `alpha_beta` does, so it is the reference alpha-beta is checked against.

use crate::coretypes::{Cp, PlyKind};
use crate::eval::evaluate_abs;
use crate::rules::{Played, Rules};
use crate::search::alpha_beta::is_better;

/// Returns the minimax score of `position` searched to `ply` plies and the first
/// move reaching it. `nodes` is incremented once per visited position.
pub fn minimax<R: Rules>(
    position: &mut R,
    ply: PlyKind,
    maximizing: bool,
    nodes: &mut u64,
) -> (Cp, Option<R::Move>) {
    *nodes += 1;

    if ply == 0 || position.is_terminal() {
        return (evaluate_abs(position), None);
    }

    let mut best: Option<(Cp, R::Move)> = None;
    for legal_move in position.legal_moves() {
        let (move_cp, _) = {
            let mut child = Played::new(&mut *position, legal_move);
            minimax(&mut *child, ply - 1, !maximizing, nodes)
        };
        if best.map_or(true, |(best_cp, _)| is_better(move_cp, best_cp, maximizing)) {
            best = Some((move_cp, legal_move));
        }
    }

    match best {
        Some((best_cp, best_move)) => (best_cp, Some(best_move)),
        None => (evaluate_abs(position), None),
    }
}
