//! Static Evaluation Functions.
//!
//! All scores here are absolute: White is the maxing player and Black is the
//! minning player, so a centipawn score of +10 is good for White while -10 is
//! good for Black.
//!
//! The evaluation is material plus a mobility bonus. Mobility counts the legal
//! moves of the player to move only, and its sign follows that player: White to
//! move adds it, Black to move subtracts it. This is not a side-neutral mobility
//! difference, so `evaluate_abs` is not antisymmetric under a color flip; only
//! `material` is.
//!
//! Checkmate and stalemate get no special score. A mated player simply has zero
//! mobility, and search relies on depth to find mating lines.

use crate::coretypes::{Color, Cp, Piece, PieceKind};
use crate::coretypes::{Color::*, PieceKind::*};
use crate::rules::Rules;

impl PieceKind {
    /// Default, independent value per piece.
    /// The king has no material value: losing it is handled by terminal detection.
    pub const fn centipawns(&self) -> Cp {
        Cp(match self {
            Pawn => 100, // 100 Centipawn == 1 Pawn
            Knight => 300,
            Bishop => 330,
            Rook => 500,
            Queen => 900,
            King => 0,
        })
    }
}

// Evaluation Constants
pub const MOBILITY_CP: Cp = Cp(10);

/// Primary evaluate function for engine.
/// Statically evaluate a position as `material + mobility`.
pub fn evaluate_abs<R: Rules + ?Sized>(position: &R) -> Cp {
    material(position) + mobility(position)
}

/// Returns relative strength difference of pieces in position.
/// Is equivalent of piece_centipawn(White) - pieces_centipawn(Black).
/// A positive value is an advantage for white, 0 is even, negative is advantage for black.
pub fn material<R: Rules + ?Sized>(position: &R) -> Cp {
    PieceKind::ALL
        .into_iter()
        .fold(Cp::default(), |acc, piece_kind| {
            let white = position.piece_count(Piece::new(White, piece_kind));
            let black = position.piece_count(Piece::new(Black, piece_kind));
            acc + piece_kind.centipawns() * white - piece_kind.centipawns() * black
        })
}

/// Mobility bonus of the player to move, signed by that player.
pub fn mobility<R: Rules + ?Sized>(position: &R) -> Cp {
    mobility_for(position.player(), position.num_legal_moves())
}

fn mobility_for(player: Color, num_moves: usize) -> Cp {
    MOBILITY_CP * num_moves as u32 * player.sign()
}
