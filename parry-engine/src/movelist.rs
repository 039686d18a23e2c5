//! MoveList types used in the Parry engine.
//!
//! The underlying type of MoveList may change at any time during
//! pre-1.0 development, so a MoveList type alias makes changes easy.

use arrayvec::ArrayVec;

use crate::coretypes::{Move, MAX_MOVES};

/// MoveList is a container that can hold at most `MAX_MOVES`, the most number of moves per any chess position.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Sequence of moves played in a game, from its base position.
pub type MoveHistory = Vec<Move>;

/// Space separated long algebraic form of a sequence of moves.
pub fn display<'a, I>(moves: I) -> String
where
    I: IntoIterator<Item = &'a Move>,
{
    moves
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;

    #[test]
    fn display_moves() {
        let mut moves = MoveList::new();
        moves.push(Move::new(E2, E4, None));
        moves.push(Move::new(E7, E5, None));
        assert_eq!(display(&moves), "e2e4 e7e5");
        assert_eq!(display(&MoveHistory::new()), "");
    }
}
