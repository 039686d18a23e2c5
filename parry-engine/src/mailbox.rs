//! A [mailbox](https://www.chessprogramming.org/Mailbox) is a square-centric
//! representation of a chess board.
//!
//! A Mailbox is an array of size Files x Ranks where each index may contain a
//! chess piece or be empty.

use std::fmt::{self, Display};
use std::ops::{Index, IndexMut};

use crate::coretypes::{Color, Piece, PieceKind, Square, NUM_FILES, NUM_RANKS, NUM_SQUARES};

/// Classic 8x8 square board representation of Chess board.
/// Index starts at A1.
/// A1 = idx 0
/// B1 = idx 1
/// A2 = idx 8
/// H8 = idx 63
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Mailbox {
    board: [Option<Piece>; Self::SIZE],
}

impl Mailbox {
    pub const FILES: usize = NUM_FILES;
    pub const RANKS: usize = NUM_RANKS;
    pub const SIZE: usize = NUM_SQUARES;

    /// Creates an empty Mailbox, where all squares are None.
    pub fn new() -> Self {
        Mailbox {
            board: [None; Mailbox::SIZE],
        }
    }

    /// Create Mailbox with pieces arranged in starting chess position.
    pub fn start_position() -> Self {
        use Color::*;
        use PieceKind::*;
        const BACK_RANK: [PieceKind; NUM_FILES] =
            [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut mb = Self::new();

        for (file, piece_kind) in BACK_RANK.into_iter().enumerate() {
            mb.board[file] = Some(Piece::new(White, piece_kind));
            mb.board[NUM_FILES + file] = Some(Piece::new(White, Pawn));
            mb.board[6 * NUM_FILES + file] = Some(Piece::new(Black, Pawn));
            mb.board[7 * NUM_FILES + file] = Some(Piece::new(Black, piece_kind));
        }

        mb
    }

    pub fn board(&self) -> &[Option<Piece>; Self::SIZE] {
        &self.board
    }

    /// Iterate over all occupied squares and their pieces, from A1 to H8.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::ALL
            .into_iter()
            .filter_map(move |square| self[square].map(|piece| (square, piece)))
    }

    /// Number of squares holding exactly `piece`.
    pub fn count(&self, piece: Piece) -> u32 {
        self.board.iter().filter(|sq| **sq == Some(piece)).count() as u32
    }

    /// Square of the first king of `color`, if one is on the board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Some(Piece::new(color, PieceKind::King));
        Square::ALL.into_iter().find(|square| self[*square] == king)
    }

    /// The same board seen from the other side: ranks mirrored and colors swapped.
    pub fn color_flipped(&self) -> Self {
        let mut mb = Self::new();
        for (square, piece) in self.occupied() {
            mb[square.flip_rank()] = Some(Piece::new(!piece.color, piece.piece_kind));
        }
        mb
    }

    /// Returns pretty-printed chess board representation of Self.
    /// The chess board has borders and file/rank indicators.
    pub fn pretty(&self) -> String {
        const RANK_SEP: &str = "  +---+---+---+---+---+---+---+---+\n";
        let mut pretty = String::with_capacity(700);

        pretty.push_str(RANK_SEP);
        for rank in (0..Self::RANKS).rev() {
            pretty.push_str(&format!("{} |", rank + 1));
            for file in 0..Self::FILES {
                let ch = match self.board[rank * Self::FILES + file] {
                    Some(piece) => char::from(piece),
                    None => ' ',
                };
                pretty.push(' ');
                pretty.push(ch);
                pretty.push_str(" |");
            }
            pretty.push('\n');
            pretty.push_str(RANK_SEP);
        }
        pretty.push_str("    a   b   c   d   e   f   g   h\n");

        pretty
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Square> for Mailbox {
    type Output = Option<Piece>;
    fn index(&self, square: Square) -> &Self::Output {
        &self.board[square.idx()]
    }
}

impl IndexMut<Square> for Mailbox {
    fn index_mut(&mut self, square: Square) -> &mut Self::Output {
        &mut self.board[square.idx()]
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}
