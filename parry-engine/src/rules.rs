//! The rules oracle seen by search and evaluation.
//!
//! Search only needs a handful of questions answered about a game state: whose turn
//! it is, which moves are legal, how to play and take back a move, whether the game
//! is over, and how much material is on the board. `Rules` captures exactly that,
//! so search and evaluation are written once over any implementation.

use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use crate::coretypes::{Color, Move, MoveInfo, Piece};
use crate::movelist::MoveList;
use crate::position::Position;

pub trait Rules {
    /// A legal transition, comparable only by equality.
    type Move: Copy + Eq + Debug;
    /// Token returned by `apply`, consumed by `undo` to restore the prior state.
    type Undo;
    type Moves: IntoIterator<Item = Self::Move>;

    /// Color of the player to move.
    fn player(&self) -> Color;

    /// Every legal move for the player to move, in a fixed order.
    /// Empty exactly when the player to move has no legal response.
    fn legal_moves(&self) -> Self::Moves;

    fn num_legal_moves(&self) -> usize {
        self.legal_moves().into_iter().count()
    }

    /// Play a move from `legal_moves` in place.
    fn apply(&mut self, move_: Self::Move) -> Self::Undo;

    /// Take back the most recent `apply`.
    fn undo(&mut self, undo: Self::Undo);

    /// True for checkmate, stalemate, or any other game ending condition.
    fn is_terminal(&self) -> bool;

    /// Number of pieces of one color and kind.
    fn piece_count(&self, piece: Piece) -> u32;
}

impl Rules for Position {
    type Move = Move;
    type Undo = MoveInfo;
    type Moves = MoveList;

    fn player(&self) -> Color {
        self.side_to_move()
    }
    fn legal_moves(&self) -> MoveList {
        self.get_legal_moves()
    }
    fn num_legal_moves(&self) -> usize {
        self.get_legal_moves().len()
    }
    fn apply(&mut self, move_: Move) -> MoveInfo {
        self.do_move(move_)
    }
    fn undo(&mut self, move_info: MoveInfo) {
        self.undo_move(move_info)
    }
    fn is_terminal(&self) -> bool {
        self.is_game_over()
    }
    fn piece_count(&self, piece: Piece) -> u32 {
        self.count(piece)
    }
}

/// A move played on a borrowed game state for the lifetime of the guard.
///
/// The move is applied on construction and undone on drop, so the borrowed state is
/// restored on every way out of a scope: falling off the end, `break`, `return`,
/// or unwinding.
pub struct Played<'a, R: Rules> {
    state: &'a mut R,
    undo: Option<R::Undo>,
}

impl<'a, R: Rules> Played<'a, R> {
    pub fn new(state: &'a mut R, move_: R::Move) -> Self {
        let undo = state.apply(move_);
        Self {
            state,
            undo: Some(undo),
        }
    }
}

impl<R: Rules> Deref for Played<'_, R> {
    type Target = R;
    fn deref(&self) -> &R {
        self.state
    }
}

impl<R: Rules> DerefMut for Played<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.state
    }
}

impl<R: Rules> Drop for Played<'_, R> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.state.undo(undo);
        }
    }
}
