//! Holds Position struct, the most important data structure for the engine.
//! Position represents a chess position.

use std::fmt::{self, Display};

use crate::coretypes::{Castling, Color, GameStatus, Move, MoveCount, MoveInfo, MoveKind};
use crate::coretypes::{Piece, Square};
use crate::coretypes::{Color::*, PieceKind::*};
use crate::error::{self, ErrorKind};
use crate::fen::Fen;
use crate::mailbox::Mailbox;
use crate::movegen as mg;
use crate::movelist::MoveList;

/// Half-moves without a capture or pawn move after which the game is drawn.
pub const SEVENTY_FIVE_MOVE_HALFMOVES: MoveCount = 150;

/// struct Position
/// A complete data set that can represent any chess position.
/// # Members:
/// * board - a square-centric container of all chess pieces.
/// * side_to_move - Color of player whose turn it is.
/// * castling - Castling rights for both players.
/// * en_passant - Indicates if en passant is possible, and for which square.
/// * halfmoves - Tracker for 50 move draw rule. Resets after capture/pawn move.
/// * fullmoves - Starts at 1, increments after each black player's move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Position {
    pub(crate) board: Mailbox,
    pub(crate) side_to_move: Color,
    pub(crate) castling: Castling,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmoves: MoveCount,
    pub(crate) fullmoves: MoveCount,
}

impl Position {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self {
            board: Mailbox::start_position(),
            side_to_move: Color::White,
            castling: Castling::start_position(),
            en_passant: None,
            halfmoves: 0,
            fullmoves: 1,
        }
    }

    /// Const getters.
    pub fn board(&self) -> &Mailbox {
        &self.board
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn castling(&self) -> Castling {
        self.castling
    }
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }
    pub fn halfmoves(&self) -> MoveCount {
        self.halfmoves
    }
    pub fn fullmoves(&self) -> MoveCount {
        self.fullmoves
    }

    /// Apply a move to self, in place, and return the information needed to undo it.
    ///
    /// `do_move` does not check if the move is legal, it executes it while assuming legality.
    /// Only moves from `get_legal_moves` of this exact position may be given.
    ///
    /// # Panics
    /// Panics if there is no piece on the origin square.
    pub fn do_move(&mut self, move_: Move) -> MoveInfo {
        let player = self.side_to_move;
        let piece = match self.board[move_.from] {
            Some(piece) => piece,
            None => panic!("do_move {move_}: no piece on origin square"),
        };
        debug_assert_eq!(piece.color, player);

        let move_kind = if piece.piece_kind == King
            && mg::castle_rook_move(move_.from, move_.to).is_some()
        {
            MoveKind::Castle
        } else if piece.piece_kind == Pawn
            && self.en_passant == Some(move_.to)
            && self.board[move_.to].is_none()
        {
            MoveKind::EnPassant
        } else if let Some(captured) = self.board[move_.to] {
            MoveKind::Capture(captured.piece_kind)
        } else {
            MoveKind::Quiet
        };

        let move_info = MoveInfo {
            move_,
            piece_kind: piece.piece_kind,
            move_kind,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmoves: self.halfmoves,
        };

        // Move the piece, promoting if needed.
        self.board[move_.from] = None;
        self.board[move_.to] = Some(match move_.promotion {
            Some(promotion) => Piece::new(player, promotion),
            None => piece,
        });

        match move_kind {
            MoveKind::Castle => {
                if let Some((rook_from, rook_to)) = mg::castle_rook_move(move_.from, move_.to) {
                    self.board[rook_to] = self.board[rook_from].take();
                }
            }
            MoveKind::EnPassant => {
                if let Some(captured) = Square::from_coords(move_.to.file(), move_.from.rank()) {
                    self.board[captured] = None;
                }
            }
            _ => (),
        }

        // A double pawn push leaves the skipped square as en passant target.
        self.en_passant = if piece.piece_kind == Pawn
            && (move_.to.rank() - move_.from.rank()).abs() == 2
        {
            move_.from.offset(0, player.pawn_direction())
        } else {
            None
        };

        self.castling.clear(Castling::lost_on(move_.from));
        self.castling.clear(Castling::lost_on(move_.to));

        if piece.piece_kind == Pawn || move_info.is_capture() {
            self.halfmoves = 0;
        } else {
            self.halfmoves += 1;
        }
        if player == Black {
            self.fullmoves += 1;
        }
        self.side_to_move = !player;

        move_info
    }

    /// Undo the application of a move, in place.
    /// `move_info` must be the value returned by the latest `do_move` on this position.
    pub fn undo_move(&mut self, move_info: MoveInfo) {
        let player = !self.side_to_move;
        let move_ = move_info.move_;

        self.side_to_move = player;
        if player == Black {
            self.fullmoves -= 1;
        }
        self.castling = move_info.castling;
        self.en_passant = move_info.en_passant;
        self.halfmoves = move_info.halfmoves;

        self.board[move_.from] = Some(Piece::new(player, move_info.piece_kind));
        self.board[move_.to] = match move_info.move_kind {
            MoveKind::Capture(captured) => Some(Piece::new(!player, captured)),
            _ => None,
        };

        match move_info.move_kind {
            MoveKind::Castle => {
                if let Some((rook_from, rook_to)) = mg::castle_rook_move(move_.from, move_.to) {
                    self.board[rook_from] = self.board[rook_to].take();
                }
            }
            MoveKind::EnPassant => {
                if let Some(captured) = Square::from_coords(move_.to.file(), move_.from.rank()) {
                    self.board[captured] = Some(Piece::new(!player, Pawn));
                }
            }
            _ => (),
        }
    }

    /// Apply `move_` only if it is legal in this position.
    /// An illegal move leaves the position untouched.
    pub fn do_legal_move(&mut self, move_: Move) -> error::Result<MoveInfo> {
        if self.is_legal_move(move_) {
            Ok(self.do_move(move_))
        } else {
            Err((ErrorKind::PositionIllegalMove, move_).into())
        }
    }

    /// Returns true if `move_` is one of the legal moves of this position.
    pub fn is_legal_move(&self, move_: Move) -> bool {
        self.get_legal_moves().contains(&move_)
    }

    /// Generate all legal moves for the side to move.
    pub fn get_legal_moves(&self) -> MoveList {
        mg::legal_moves(self)
    }

    /// Returns true if the side to move has its king attacked.
    pub fn is_in_check(&self) -> bool {
        mg::king_in_check(self, self.side_to_move)
    }

    /// Side to move is in check and has no legal moves.
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && self.get_legal_moves().is_empty()
    }

    /// Side to move is not in check and has no legal moves.
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && self.get_legal_moves().is_empty()
    }

    /// Neither side has mating material: no pawns, rooks or queens, and either
    /// at most one minor piece or only bishops all standing on one square color.
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors = 0;
        let mut knights = 0;
        let mut bishop_square_colors = [false; 2];

        for (square, piece) in self.board.occupied() {
            match piece.piece_kind {
                Pawn | Rook | Queen => return false,
                Knight => {
                    minors += 1;
                    knights += 1;
                }
                Bishop => {
                    minors += 1;
                    bishop_square_colors[((square.file() + square.rank()) % 2) as usize] = true;
                }
                King => (),
            }
        }

        let same_colored_bishops = knights == 0 && !(bishop_square_colors[0] && bishop_square_colors[1]);
        minors <= 1 || same_colored_bishops
    }

    /// No capture or pawn move in the last seventy-five moves by each side.
    pub fn is_seventy_five_moves(&self) -> bool {
        self.halfmoves >= SEVENTY_FIVE_MOVE_HALFMOVES
    }

    /// Classify the position for the side to move.
    pub fn status(&self) -> GameStatus {
        if self.get_legal_moves().is_empty() {
            if self.is_in_check() {
                GameStatus::Checkmate {
                    winner: !self.side_to_move,
                }
            } else {
                GameStatus::Stalemate
            }
        } else if self.is_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else if self.is_seventy_five_moves() {
            GameStatus::SeventyFiveMoves
        } else {
            GameStatus::Ongoing
        }
    }

    /// Returns true if the game cannot continue from this position.
    pub fn is_game_over(&self) -> bool {
        self.status().is_over()
    }

    /// The same position with colors swapped: the board is mirrored rank-wise,
    /// every piece changes color, and the side to move, castling rights and
    /// en passant square follow.
    pub fn color_flipped(&self) -> Self {
        Self {
            board: self.board.color_flipped(),
            side_to_move: !self.side_to_move,
            castling: self.castling.color_flipped(),
            en_passant: self.en_passant.map(|sq| sq.flip_rank()),
            halfmoves: self.halfmoves,
            fullmoves: self.fullmoves,
        }
    }

    /// Number of pieces of one color and kind on the board.
    pub fn count(&self, piece: Piece) -> u32 {
        self.board.count(piece)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start_position()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.board, self.to_fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;

    #[test]
    fn do_and_undo_restores_position() {
        let mut position = Position::start_position();
        let before = position;
        for move_ in position.get_legal_moves() {
            let move_info = position.do_move(move_);
            assert_ne!(position, before);
            position.undo_move(move_info);
            assert_eq!(position, before);
        }
    }

    #[test]
    fn double_push_sets_en_passant() {
        let mut position = Position::start_position();
        position.do_move(Move::new(E2, E4, None));
        assert_eq!(position.en_passant(), Some(E3));
        assert_eq!(position.side_to_move(), Black);
        position.do_move(Move::new(G8, F6, None));
        assert_eq!(position.en_passant(), None);
        assert_eq!(position.fullmoves(), 2);
        assert_eq!(position.halfmoves(), 1);
    }

    #[test]
    fn en_passant_round_trip() {
        let mut position = Position::parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let before = position;
        let move_info = position.do_move(Move::new(E5, D6, None));
        assert_eq!(move_info.move_kind(), MoveKind::EnPassant);
        assert_eq!(position.board()[D5], None);
        assert_eq!(position.board()[D6], Some(Piece::new(White, Pawn)));
        position.undo_move(move_info);
        assert_eq!(position, before);
    }

    #[test]
    fn castle_moves_rook_and_clears_rights() {
        let mut position = Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let before = position;
        let move_info = position.do_move(Move::new(E1, G1, None));
        assert_eq!(move_info.move_kind(), MoveKind::Castle);
        assert_eq!(position.board()[F1], Some(Piece::new(White, Rook)));
        assert_eq!(position.board()[H1], None);
        assert_eq!(position.castling(), Castling::B_SIDE);
        position.undo_move(move_info);
        assert_eq!(position, before);
    }

    #[test]
    fn capturing_rook_clears_its_castling_right() {
        let mut position = Position::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        position.do_move(Move::new(A1, A8, None));
        assert!(!position.castling().has(Castling::W_QUEEN));
        assert!(!position.castling().has(Castling::B_QUEEN));
        assert!(position.castling().has(Castling::B_KING));
    }

    #[test]
    fn promotion_round_trip() {
        let mut position = Position::parse_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let before = position;
        let move_info = position.do_move(Move::new(A7, B8, Some(Knight)));
        assert_eq!(move_info.move_kind(), MoveKind::Capture(Rook));
        assert_eq!(position.board()[B8], Some(Piece::new(White, Knight)));
        position.undo_move(move_info);
        assert_eq!(position, before);
    }

    #[test]
    fn illegal_move_is_refused() {
        let mut position = Position::start_position();
        let err = position.do_legal_move(Move::new(E2, E5, None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PositionIllegalMove);
        assert_eq!(position, Position::start_position());
        assert!(position.do_legal_move(Move::new(E2, E4, None)).is_ok());
    }

    #[test]
    fn status_detection() {
        let mate = Position::parse_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        assert!(mate.is_checkmate());
        assert_eq!(mate.status(), GameStatus::Checkmate { winner: White });

        let stalemate = Position::parse_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        assert!(stalemate.is_stalemate());
        assert_eq!(stalemate.status(), GameStatus::Stalemate);

        let bare_kings = Position::parse_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").unwrap();
        assert_eq!(bare_kings.status(), GameStatus::InsufficientMaterial);

        let clock = Position::parse_fen("8/8/4k3/8/8/3K4/8/R7 w - - 150 100").unwrap();
        assert_eq!(clock.status(), GameStatus::SeventyFiveMoves);

        assert_eq!(Position::start_position().status(), GameStatus::Ongoing);
        assert!(!Position::start_position().is_game_over());
    }

    #[test]
    fn insufficient_material_cases() {
        let knight = Position::parse_fen("8/8/4k3/8/8/3KN3/8/8 w - - 0 1").unwrap();
        assert!(knight.is_insufficient_material());
        let two_knights = Position::parse_fen("8/8/4k3/8/8/2NKN3/8/8 w - - 0 1").unwrap();
        assert!(!two_knights.is_insufficient_material());
        let same_color_bishops = Position::parse_fen("8/8/4k3/8/8/2BK4/1b6/8 w - - 0 1").unwrap();
        assert!(same_color_bishops.is_insufficient_material());
        let opposite_bishops = Position::parse_fen("8/8/4k3/8/8/2BK4/2b5/8 w - - 0 1").unwrap();
        assert!(!opposite_bishops.is_insufficient_material());
        let pawn = Position::parse_fen("8/8/4k3/8/8/3K4/4P3/8 w - - 0 1").unwrap();
        assert!(!pawn.is_insufficient_material());
    }

    #[test]
    fn color_flip_swaps_everything() {
        let position =
            Position::parse_fen("r3k2r/8/8/3pP3/8/8/8/R3K1R1 w Qkq d6 0 1").unwrap();
        let flipped = position.color_flipped();
        assert_eq!(flipped.side_to_move(), Black);
        assert_eq!(flipped.en_passant(), Some(D3));
        assert_eq!(flipped.board()[E8], Some(Piece::new(Black, King)));
        assert_eq!(flipped.board()[E1], Some(Piece::new(White, King)));
        assert_eq!(flipped.board()[E4], Some(Piece::new(Black, Pawn)));
        assert_eq!(flipped.castling().to_string(), "KQq");
        assert_eq!(flipped.color_flipped(), position);
    }
}
