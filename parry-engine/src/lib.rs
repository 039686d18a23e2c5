//! Parry Engine: a depth-limited alpha-beta chess engine.
//!
//! The engine is split into a rules oracle (`position`, `movegen`, `fen`), a
//! static evaluator (`eval`), and a search (`search`) that only sees the rules
//! through the `Rules` trait.

pub mod coretypes;
pub mod error;
pub mod eval;
pub mod fen;
pub mod game;
pub mod mailbox;
pub mod movegen;
pub mod movelist;
pub mod perft;
pub mod position;
pub mod rules;
pub mod search;

pub use fen::Fen;
pub use game::Game;
pub use position::Position;
pub use rules::{Played, Rules};
pub use search::{search, select_move, validate_depth, SearchResult};
