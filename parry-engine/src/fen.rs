//! Forsyth-Edwards Notation, a standard notation for describing a chess position.
//! <https://en.wikipedia.org/wiki/Forsyth%E2%80%93Edwards_Notation>
//!
//! Example:
//! Starting Chess FEN = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"

use std::error;
use std::fmt::{self, Display};

use crate::coretypes::{Castling, Color, MoveCount, Piece, PieceKind, Square};
use crate::coretypes::{NUM_FILES, NUM_RANKS};
use crate::mailbox::Mailbox;
use crate::movegen;
use crate::position::Position;

/// Fen trait allows objects to be converted to and from FEN strings.
pub trait Fen: Sized {
    fn parse_fen(s: &str) -> Result<Self, ParseFenError>;
    fn to_fen(&self) -> String;
}

/// Reasons a FEN string could not be parsed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParseFenError {
    /// Wrong number of space separated fields.
    IllFormed,
    /// Piece placement field is malformed.
    Placement,
    /// Each side needs exactly one king.
    KingCount,
    /// Pawns cannot stand on the first or last rank.
    PawnOnBackRank,
    /// The side not to move has its king attacked.
    OpponentInCheck,
    SideToMove,
    Castling,
    EnPassant,
    HalfMoveClock,
    FullMoveNumber,
}

impl ParseFenError {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseFenError::IllFormed => "ill-formed fen, expected 6 fields",
            ParseFenError::Placement => "piece placement malformed",
            ParseFenError::KingCount => "each side must have exactly one king",
            ParseFenError::PawnOnBackRank => "pawn on first or last rank",
            ParseFenError::OpponentInCheck => "side not to move is in check",
            ParseFenError::SideToMove => "side to move malformed",
            ParseFenError::Castling => "castling rights malformed",
            ParseFenError::EnPassant => "en passant square malformed",
            ParseFenError::HalfMoveClock => "half-move clock malformed",
            ParseFenError::FullMoveNumber => "full-move number malformed",
        }
    }
}

impl Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl error::Error for ParseFenError {}

impl Fen for Position {
    fn parse_fen(s: &str) -> Result<Self, ParseFenError> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let &[placement, side_to_move, castling, en_passant, halfmoves, fullmoves] =
            fields.as_slice()
        else {
            return Err(ParseFenError::IllFormed);
        };

        let board = parse_placement(placement)?;
        for color in Color::ALL {
            if board.count(Piece::new(color, PieceKind::King)) != 1 {
                return Err(ParseFenError::KingCount);
            }
        }
        let pawn_on_back_rank = board.occupied().any(|(square, piece)| {
            piece.piece_kind == PieceKind::Pawn && matches!(square.rank(), 0 | 7)
        });
        if pawn_on_back_rank {
            return Err(ParseFenError::PawnOnBackRank);
        }

        let side_to_move = match side_to_move {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(ParseFenError::SideToMove),
        };
        let castling: Castling = castling.parse().map_err(|_| ParseFenError::Castling)?;
        let en_passant = parse_en_passant(en_passant, side_to_move)?;
        let halfmoves: MoveCount = halfmoves
            .parse()
            .map_err(|_| ParseFenError::HalfMoveClock)?;
        let fullmoves: MoveCount = fullmoves
            .parse()
            .map_err(|_| ParseFenError::FullMoveNumber)?;
        if fullmoves == 0 {
            return Err(ParseFenError::FullMoveNumber);
        }

        let position = Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmoves,
            fullmoves,
        };
        // The player to move could capture the king.
        if movegen::king_in_check(&position, !side_to_move) {
            return Err(ParseFenError::OpponentInCheck);
        }
        Ok(position)
    }

    fn to_fen(&self) -> String {
        let en_passant = match self.en_passant {
            Some(square) => square.to_string(),
            None => String::from("-"),
        };
        format!(
            "{} {} {} {} {} {}",
            placement_string(&self.board),
            self.side_to_move.to_char(),
            self.castling,
            en_passant,
            self.halfmoves,
            self.fullmoves
        )
    }
}

/// Parse the first FEN field, ranks 8 down to 1 separated by '/'.
fn parse_placement(placement: &str) -> Result<Mailbox, ParseFenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != NUM_RANKS {
        return Err(ParseFenError::Placement);
    }

    let mut board = Mailbox::new();
    for (rank_str, rank) in ranks.into_iter().zip((0..NUM_RANKS as i8).rev()) {
        let mut file: i8 = 0;
        for ch in rank_str.chars() {
            if let Some(empty) = ch.to_digit(10) {
                if !(1..=8).contains(&empty) {
                    return Err(ParseFenError::Placement);
                }
                file += empty as i8;
            } else {
                let piece = Piece::try_from(ch).map_err(|_| ParseFenError::Placement)?;
                let square = Square::from_coords(file, rank).ok_or(ParseFenError::Placement)?;
                board[square] = Some(piece);
                file += 1;
            }
            if file > NUM_FILES as i8 {
                return Err(ParseFenError::Placement);
            }
        }
        if file != NUM_FILES as i8 {
            return Err(ParseFenError::Placement);
        }
    }

    Ok(board)
}

/// En passant target must be on the rank the last double push skipped.
fn parse_en_passant(s: &str, side_to_move: Color) -> Result<Option<Square>, ParseFenError> {
    if s == "-" {
        return Ok(None);
    }
    let square: Square = s.parse().map_err(|_| ParseFenError::EnPassant)?;
    let expected_rank = match side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    if square.rank() != expected_rank {
        return Err(ParseFenError::EnPassant);
    }
    Ok(Some(square))
}

fn placement_string(board: &Mailbox) -> String {
    let mut placement = String::with_capacity(72);
    for rank in (0..NUM_RANKS as i8).rev() {
        let mut empty = 0;
        for file in 0..NUM_FILES as i8 {
            let piece = Square::from_coords(file, rank).and_then(|square| board[square]);
            match piece {
                Some(piece) => {
                    if empty > 0 {
                        placement.push_str(&empty.to_string());
                        empty = 0;
                    }
                    placement.push(char::from(piece));
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            placement.push_str(&empty.to_string());
        }
        if rank > 0 {
            placement.push('/');
        }
    }
    placement
}
