//! Minimax with Alpha-Beta pruning implementation.

use std::cmp;

use tracing::trace;

use crate::coretypes::{Cp, PlyKind};
use crate::eval::evaluate_abs;
use crate::rules::{Played, Rules};
use crate::search::SearchStats;

/// Properties of Alpha-Beta pruning.
/// * The maxing player can only update alpha from its children.
/// * The minning player can only update beta from its children.
/// * Alpha and Beta can only be inherited from their ancestors, and are otherwise Alpha=-Inf, Beta=Inf.
/// * Alpha is usually less than Beta. When they are equal or cross, a cut off occurs.
///
/// Returns the best absolute score reachable from `position` within `ply` plies and
/// the move leading to it. Leaves, game over positions and `ply == 0` return the
/// static evaluation and no move. Moves are tried in the order `legal_moves` gives,
/// and among equal scores the first move found is kept.
///
/// Every move is played through a `Played` guard, so `position` is unchanged when
/// this returns, including after a cut off.
pub fn alpha_beta<R: Rules>(
    position: &mut R,
    ply: PlyKind,
    mut alpha: Cp,
    mut beta: Cp,
    maximizing: bool,
    stats: &mut SearchStats,
) -> (Cp, Option<R::Move>) {
    stats.nodes += 1;

    // Stop at terminal node: Checkmate/Stalemate/Draw/last depth.
    if ply == 0 || position.is_terminal() {
        return (evaluate_abs(position), None);
    }

    let mut best: Option<(Cp, R::Move)> = None;

    for legal_move in position.legal_moves() {
        let (move_cp, _) = {
            let mut child = Played::new(&mut *position, legal_move);
            alpha_beta(&mut *child, ply - 1, alpha, beta, !maximizing, stats)
        };
        trace!(ply, move_ = ?legal_move, score = %move_cp, "searched move");

        let best_cp = match best {
            Some((best_cp, _)) if !is_better(move_cp, best_cp, maximizing) => best_cp,
            _ => {
                best = Some((move_cp, legal_move));
                move_cp
            }
        };

        if maximizing {
            alpha = cmp::max(alpha, best_cp);
        } else {
            beta = cmp::min(beta, best_cp);
        }
        if beta <= alpha {
            stats.cut_nodes += 1;
            break;
        }
    }

    match best {
        Some((best_cp, best_move)) => (best_cp, Some(best_move)),
        // Rules that do not report a position without moves as terminal.
        None => (evaluate_abs(position), None),
    }
}

/// Strict improvement, so ties keep the earlier move.
#[inline(always)]
pub(crate) fn is_better(candidate: Cp, current: Cp, maximizing: bool) -> bool {
    match maximizing {
        true => candidate > current,
        false => candidate < current,
    }
}
