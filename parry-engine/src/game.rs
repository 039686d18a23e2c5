//! Game structure.

use std::collections::HashMap;

use crate::coretypes::{Castling, Color, GameStatus, Move, MoveInfo, Piece, Square};
use crate::coretypes::PieceKind::Pawn;
use crate::error::{self, ErrorKind};
use crate::mailbox::Mailbox;
use crate::movelist::{MoveHistory, MoveList};
use crate::position::Position;
use crate::rules::Rules;

/// Occurrences of one position after which the game is drawn.
pub const FIVEFOLD_REPETITIONS: u32 = 5;

/// The parts of a position that decide whether two positions are the same
/// for repetition. Move clocks are ignored.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct RepetitionKey {
    board: Mailbox,
    side_to_move: Color,
    castling: Castling,
    en_passant: Option<Square>,
}

impl From<&Position> for RepetitionKey {
    fn from(position: &Position) -> Self {
        // An en passant square only counts when a pawn can actually take on it.
        let en_passant = position.en_passant().filter(|&target| {
            position.get_legal_moves().iter().any(|move_| {
                move_.to() == target
                    && position.board()[move_.from()].map(|piece| piece.piece_kind) == Some(Pawn)
            })
        });
        Self {
            board: *position.board(),
            side_to_move: position.side_to_move(),
            castling: position.castling(),
            en_passant,
        }
    }
}

/// Game contains information for an in progress game:
/// The base position the game started from, the sequence of moves that were
/// played, and the current position.
///
/// Unlike a lone `Position`, a game knows its history, so its status includes
/// fivefold repetition. Searching a `Game` through `Rules` stops on repetitions.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Game {
    base_position: Position,
    moves: MoveHistory,
    position: Position,
    // One entry per move in `moves`, used to take moves back.
    move_infos: Vec<MoveInfo>,
    repetitions: HashMap<RepetitionKey, u32>,
}

impl Game {
    /// Create a new Game from a base position and a sequence of moves.
    /// This generates the current position by applying the sequence of moves to the base.
    /// If a move in the move history was illegal, Err is returned.
    pub fn new(base_position: Position, moves: MoveHistory) -> error::Result<Self> {
        let mut game = Self::from(base_position);
        for move_ in moves {
            game.do_legal_move(move_)
                .map_err(|_| error::Error::from((ErrorKind::GameIllegalMove, move_)))?;
        }
        Ok(game)
    }

    /// Create a new game in the standard chess start position.
    pub fn start_position() -> Self {
        Self::from(Position::start_position())
    }

    pub fn base_position(&self) -> &Position {
        &self.base_position
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Number of times the current position has occurred in this game, itself included.
    pub fn repetitions(&self) -> u32 {
        self.repetitions
            .get(&RepetitionKey::from(&self.position))
            .copied()
            .unwrap_or(0)
    }

    /// Status of the current position, counting fivefold repetition as a draw.
    pub fn status(&self) -> GameStatus {
        match self.position.status() {
            GameStatus::Ongoing if self.repetitions() >= FIVEFOLD_REPETITIONS => {
                GameStatus::FivefoldRepetition
            }
            status => status,
        }
    }

    /// Play a legal move, recording it in the history.
    pub fn do_legal_move(&mut self, move_: Move) -> error::Result<MoveInfo> {
        let move_info = self.position.do_legal_move(move_)?;
        self.record(move_, move_info);
        Ok(move_info)
    }

    /// Take back the most recent move, returning it, or None at the base position.
    pub fn undo(&mut self) -> Option<Move> {
        let move_info = self.move_infos.pop()?;
        self.leave_position();
        self.position.undo_move(move_info);
        self.moves.pop()
    }

    fn record(&mut self, move_: Move, move_info: MoveInfo) {
        self.moves.push(move_);
        self.move_infos.push(move_info);
        self.enter_position();
    }

    fn enter_position(&mut self) {
        *self
            .repetitions
            .entry(RepetitionKey::from(&self.position))
            .or_insert(0) += 1;
    }

    fn leave_position(&mut self) {
        let key = RepetitionKey::from(&self.position);
        if let Some(count) = self.repetitions.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(&key);
            }
        }
    }
}

/// Convert a position to a Game with no past moves.
impl From<Position> for Game {
    fn from(position: Position) -> Self {
        let mut game = Self {
            base_position: position,
            moves: MoveHistory::new(),
            position,
            move_infos: Vec::new(),
            repetitions: HashMap::new(),
        };
        game.enter_position();
        game
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::start_position()
    }
}

impl Rules for Game {
    type Move = Move;
    type Undo = MoveInfo;
    type Moves = MoveList;

    fn player(&self) -> Color {
        self.position.side_to_move()
    }
    fn legal_moves(&self) -> MoveList {
        self.position.get_legal_moves()
    }
    fn num_legal_moves(&self) -> usize {
        self.position.get_legal_moves().len()
    }
    fn apply(&mut self, move_: Move) -> MoveInfo {
        let move_info = self.position.do_move(move_);
        self.record(move_, move_info);
        move_info
    }
    fn undo(&mut self, move_info: MoveInfo) {
        debug_assert_eq!(self.move_infos.last(), Some(&move_info));
        self.undo();
    }
    fn is_terminal(&self) -> bool {
        self.status().is_over()
    }
    fn piece_count(&self, piece: Piece) -> u32 {
        self.position.count(piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coretypes::Square::*;
    use crate::fen::Fen;
    use crate::search::select_move;

    const KNIGHT_SHUFFLE: [Move; 4] = [
        Move::new(G1, F3, None),
        Move::new(G8, F6, None),
        Move::new(F3, G1, None),
        Move::new(F6, G8, None),
    ];

    #[test]
    fn replays_move_history() {
        let moves = vec![Move::new(E2, E4, None), Move::new(E7, E5, None)];
        let game = Game::new(Position::start_position(), moves.clone()).unwrap();
        assert_eq!(game.moves(), moves.as_slice());
        assert_eq!(game.base_position(), &Position::start_position());
        assert_eq!(game.position().fullmoves(), 2);
    }

    #[test]
    fn rejects_illegal_history() {
        let moves = vec![Move::new(E2, E4, None), Move::new(E2, E4, None)];
        let err = Game::new(Position::start_position(), moves).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GameIllegalMove);
    }

    #[test]
    fn undo_restores_positions() {
        let mut game = Game::start_position();
        game.do_legal_move(Move::new(G1, F3, None)).unwrap();
        let after_first = *game.position();
        game.do_legal_move(Move::new(D7, D5, None)).unwrap();

        assert_eq!(game.undo(), Some(Move::new(D7, D5, None)));
        assert_eq!(game.position(), &after_first);
        assert_eq!(game.undo(), Some(Move::new(G1, F3, None)));
        assert_eq!(game, Game::start_position());
        assert_eq!(game.undo(), None);
        assert!(game.moves().is_empty());
    }

    #[test]
    fn illegal_move_leaves_game_unchanged() {
        let mut game = Game::start_position();
        assert!(game.do_legal_move(Move::new(E2, E5, None)).is_err());
        assert_eq!(game, Game::start_position());
    }

    #[test]
    fn knight_shuffle_ends_in_fivefold_repetition() {
        let mut game = Game::start_position();
        assert_eq!(game.repetitions(), 1);

        for cycle in 2..=FIVEFOLD_REPETITIONS {
            assert_eq!(game.status(), GameStatus::Ongoing);
            for move_ in KNIGHT_SHUFFLE {
                game.do_legal_move(move_).unwrap();
            }
            assert_eq!(game.repetitions(), cycle);
        }

        assert_eq!(game.status(), GameStatus::FivefoldRepetition);
        assert!(Rules::is_terminal(&game));
        // The position itself knows nothing of the history.
        assert!(!game.position().is_game_over());
        assert_eq!(select_move(&mut game, 3), None);

        game.undo();
        assert_eq!(game.status(), GameStatus::Ongoing);
    }

    #[test]
    fn search_sees_repetitions() {
        let mut game = Game::start_position();
        for _ in 0..3 {
            for move_ in KNIGHT_SHUFFLE {
                game.do_legal_move(move_).unwrap();
            }
        }
        for move_ in &KNIGHT_SHUFFLE[..3] {
            game.do_legal_move(*move_).unwrap();
        }
        // Black to move, f6g8 would repeat the start position a fifth time.
        let before = game.clone();
        let mut played = game.clone();
        played.apply(KNIGHT_SHUFFLE[3]);
        assert!(played.is_terminal());

        select_move(&mut game, 2);
        assert_eq!(game, before);
    }

    #[test]
    fn unusable_en_passant_square_repeats() {
        // After 1. e4 no black pawn can take on e3, so the target does not matter.
        let pushed = Position::parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
            .unwrap();
        let quiet = Position::parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
            .unwrap();
        assert_eq!(RepetitionKey::from(&pushed), RepetitionKey::from(&quiet));

        let capturable = Position::parse_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 2")
            .unwrap();
        assert_eq!(RepetitionKey::from(&capturable).en_passant, Some(E3));
    }
}
