//! Move generation for a mailbox position.
//!
//! Moves are first generated pseudo-legally, then each one is tried on a copy of
//! the position and kept only if the mover's king is not attacked afterwards.

use crate::coretypes::{Castling, Color, Move, Piece, PieceKind, Square};
use crate::coretypes::{Color::*, PieceKind::*, Square::*};
use crate::mailbox::Mailbox;
use crate::movelist::MoveList;
use crate::position::Position;

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];
const ROOK_RAYS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_RAYS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// A castling move, with everything needed to check it is playable.
struct CastleRule {
    rights: Castling,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    /// Squares between king and rook, which must all be empty.
    empty: &'static [Square],
    /// Squares the king starts on, crosses or lands on, which must not be attacked.
    safe: [Square; 3],
}

const CASTLE_RULES: [CastleRule; 4] = [
    CastleRule {
        rights: Castling::W_KING,
        king_from: E1,
        king_to: G1,
        rook_from: H1,
        empty: &[F1, G1],
        safe: [E1, F1, G1],
    },
    CastleRule {
        rights: Castling::W_QUEEN,
        king_from: E1,
        king_to: C1,
        rook_from: A1,
        empty: &[B1, C1, D1],
        safe: [E1, D1, C1],
    },
    CastleRule {
        rights: Castling::B_KING,
        king_from: E8,
        king_to: G8,
        rook_from: H8,
        empty: &[F8, G8],
        safe: [E8, F8, G8],
    },
    CastleRule {
        rights: Castling::B_QUEEN,
        king_from: E8,
        king_to: C8,
        rook_from: A8,
        empty: &[B8, C8, D8],
        safe: [E8, D8, C8],
    },
];

/// Rook origin and destination for a castling king move, if `king_from`/`king_to` is one.
pub(crate) fn castle_rook_move(king_from: Square, king_to: Square) -> Option<(Square, Square)> {
    match (king_from, king_to) {
        (E1, G1) => Some((H1, F1)),
        (E1, C1) => Some((A1, D1)),
        (E8, G8) => Some((H8, F8)),
        (E8, C8) => Some((A8, D8)),
        _ => None,
    }
}

/// Returns true if any piece of color `by` attacks `square`.
pub fn is_attacked(mailbox: &Mailbox, square: Square, by: Color) -> bool {
    let holds = |sq: Option<Square>, piece_kind: PieceKind| {
        sq.map_or(false, |sq| mailbox[sq] == Some(Piece::new(by, piece_kind)))
    };

    // Pawns attack diagonally forward, so look one rank backwards from their view.
    let behind = -by.pawn_direction();
    if holds(square.offset(-1, behind), Pawn) || holds(square.offset(1, behind), Pawn) {
        return true;
    }
    if KNIGHT_STEPS
        .iter()
        .any(|&(df, dr)| holds(square.offset(df, dr), Knight))
    {
        return true;
    }
    if KING_STEPS
        .iter()
        .any(|&(df, dr)| holds(square.offset(df, dr), King))
    {
        return true;
    }

    let slider_hits = |rays: &[(i8, i8)], piece_kind: PieceKind| {
        rays.iter().any(|&(df, dr)| {
            let mut current = square.offset(df, dr);
            while let Some(sq) = current {
                if let Some(piece) = mailbox[sq] {
                    return piece.color == by
                        && (piece.piece_kind == piece_kind || piece.piece_kind == Queen);
                }
                current = sq.offset(df, dr);
            }
            false
        })
    };
    slider_hits(&ROOK_RAYS, Rook) || slider_hits(&BISHOP_RAYS, Bishop)
}

/// Returns true if the king of `color` is attacked in `position`.
pub fn king_in_check(position: &Position, color: Color) -> bool {
    match position.board.king_square(color) {
        Some(king) => is_attacked(&position.board, king, !color),
        None => false,
    }
}

/// Returns true if playing `move_` does not leave the mover's king attacked.
/// `move_` must be pseudo-legal for `position`.
fn is_legal_pseudo_move(position: &Position, move_: Move) -> bool {
    let player = position.side_to_move;
    let mut after = *position;
    after.do_move(move_);
    !king_in_check(&after, player)
}

/// Emit every pseudo-legal move for the side to move, in square order from A1 to H8.
pub(crate) fn pseudo_legal_moves<F: FnMut(Move)>(position: &Position, mut emit: F) {
    let player = position.side_to_move;
    let mailbox = &position.board;

    for (from, piece) in mailbox.occupied() {
        if piece.color != player {
            continue;
        }
        match piece.piece_kind {
            Pawn => pawn_moves(position, from, &mut emit),
            Knight => step_moves(mailbox, from, player, &KNIGHT_STEPS, &mut emit),
            Bishop => ray_moves(mailbox, from, player, &BISHOP_RAYS, &mut emit),
            Rook => ray_moves(mailbox, from, player, &ROOK_RAYS, &mut emit),
            Queen => {
                ray_moves(mailbox, from, player, &ROOK_RAYS, &mut emit);
                ray_moves(mailbox, from, player, &BISHOP_RAYS, &mut emit);
            }
            King => {
                step_moves(mailbox, from, player, &KING_STEPS, &mut emit);
                castle_moves(position, from, &mut emit);
            }
        }
    }
}

/// All legal moves for the side to move.
pub fn legal_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    pseudo_legal_moves(position, |move_| {
        if is_legal_pseudo_move(position, move_) {
            moves.push(move_);
        }
    });
    moves
}

fn pawn_moves<F: FnMut(Move)>(position: &Position, from: Square, emit: &mut F) {
    let player = position.side_to_move;
    let mailbox = &position.board;
    let forward = player.pawn_direction();
    let (start_rank, last_rank) = match player {
        White => (1, 7),
        Black => (6, 0),
    };

    let mut emit_pawn = |to: Square| {
        if to.rank() == last_rank {
            for piece_kind in PieceKind::PROMOTIONS {
                emit(Move::new(from, to, Some(piece_kind)));
            }
        } else {
            emit(Move::new(from, to, None));
        }
    };

    if let Some(single) = from.offset(0, forward) {
        if mailbox[single].is_none() {
            emit_pawn(single);
            if from.rank() == start_rank {
                if let Some(double) = from.offset(0, 2 * forward) {
                    if mailbox[double].is_none() {
                        emit_pawn(double);
                    }
                }
            }
        }
    }

    for side in [-1, 1] {
        if let Some(to) = from.offset(side, forward) {
            match mailbox[to] {
                Some(piece) if piece.color != player => emit_pawn(to),
                None if position.en_passant == Some(to) => emit_pawn(to),
                _ => (),
            }
        }
    }
}

fn step_moves<F: FnMut(Move)>(
    mailbox: &Mailbox,
    from: Square,
    player: Color,
    steps: &[(i8, i8)],
    emit: &mut F,
) {
    for &(df, dr) in steps {
        if let Some(to) = from.offset(df, dr) {
            if mailbox[to].map_or(true, |piece| piece.color != player) {
                emit(Move::new(from, to, None));
            }
        }
    }
}

fn ray_moves<F: FnMut(Move)>(
    mailbox: &Mailbox,
    from: Square,
    player: Color,
    rays: &[(i8, i8)],
    emit: &mut F,
) {
    for &(df, dr) in rays {
        let mut current = from.offset(df, dr);
        while let Some(to) = current {
            match mailbox[to] {
                None => emit(Move::new(from, to, None)),
                Some(piece) => {
                    if piece.color != player {
                        emit(Move::new(from, to, None));
                    }
                    break;
                }
            }
            current = to.offset(df, dr);
        }
    }
}

fn castle_moves<F: FnMut(Move)>(position: &Position, from: Square, emit: &mut F) {
    let player = position.side_to_move;
    let mailbox = &position.board;
    let king = Some(Piece::new(player, King));
    let rook = Some(Piece::new(player, Rook));

    for rule in &CASTLE_RULES {
        if rule.king_from != from
            || !position.castling.has(rule.rights)
            || mailbox[rule.king_from] != king
            || mailbox[rule.rook_from] != rook
        {
            continue;
        }
        if rule.empty.iter().any(|sq| mailbox[*sq].is_some()) {
            continue;
        }
        if rule
            .safe
            .iter()
            .any(|sq| is_attacked(mailbox, *sq, !player))
        {
            continue;
        }
        emit(Move::new(rule.king_from, rule.king_to, None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;

    fn moves_of(fen: &str) -> MoveList {
        legal_moves(&Position::parse_fen(fen).unwrap())
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let moves = legal_moves(&Position::start_position());
        assert_eq!(moves.len(), 20);
        assert!(moves.contains(&Move::new(E2, E4, None)));
        assert!(moves.contains(&Move::new(G1, F3, None)));
        assert!(!moves.contains(&Move::new(E2, E5, None)));
    }

    #[test]
    fn pawn_attacks() {
        let mailbox = Position::parse_fen("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1")
            .unwrap()
            .board;
        assert!(is_attacked(&mailbox, D5, White));
        assert!(is_attacked(&mailbox, F5, White));
        assert!(!is_attacked(&mailbox, E5, White));
        assert!(!is_attacked(&mailbox, D3, White));
    }

    #[test]
    fn sliders_are_blocked() {
        let mailbox = Position::parse_fen("4k3/8/8/8/r2P3K/8/8/8 w - - 0 1")
            .unwrap()
            .board;
        assert!(is_attacked(&mailbox, C4, Black));
        assert!(is_attacked(&mailbox, D4, Black));
        assert!(!is_attacked(&mailbox, H4, Black));
        assert!(is_attacked(&mailbox, A1, Black));
    }

    #[test]
    fn pinned_piece_cannot_move() {
        // Knight on e2 is pinned against the king by the rook on e8.
        let moves = moves_of("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(moves.iter().all(|m| m.from() != E2));
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let moves = moves_of("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        assert!(moves.contains(&Move::new(E5, D6, None)));
    }

    #[test]
    fn en_passant_exposing_king_is_illegal() {
        // Capturing en passant would clear the fifth rank between rook and king.
        let moves = moves_of("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        assert!(!moves.contains(&Move::new(E5, D6, None)));
    }

    #[test]
    fn promotions_generate_all_kinds() {
        let moves = moves_of("k7/4P3/8/8/8/8/8/4K3 w - - 0 1");
        for piece_kind in PieceKind::PROMOTIONS {
            assert!(moves.contains(&Move::new(E7, E8, Some(piece_kind))));
        }
        assert!(!moves.contains(&Move::new(E7, E8, None)));
    }

    #[test]
    fn castling_both_sides() {
        let moves = moves_of("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert!(moves.contains(&Move::new(E1, G1, None)));
        assert!(moves.contains(&Move::new(E1, C1, None)));
    }

    #[test]
    fn castling_through_attack_is_illegal() {
        // Black rook on f8 covers f1, so king side castling is out.
        let moves = moves_of("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.contains(&Move::new(E1, G1, None)));
        assert!(moves.contains(&Move::new(E1, C1, None)));
    }

    #[test]
    fn castling_out_of_check_is_illegal() {
        let moves = moves_of("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1");
        assert!(!moves.contains(&Move::new(E1, G1, None)));
        assert!(!moves.contains(&Move::new(E1, C1, None)));
    }

    #[test]
    fn castling_needs_empty_squares() {
        let moves = moves_of("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1");
        assert!(!moves.contains(&Move::new(E1, G1, None)));
        assert!(!moves.contains(&Move::new(E1, C1, None)));
    }
}
