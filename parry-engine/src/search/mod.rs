//! Search functions.
//!
//! Search is a fixed-depth minimax with alpha-beta pruning over any `Rules`
//! implementation. Scores are absolute: White maximizes and Black minimizes.

mod alpha_beta;
mod minimax;

pub use alpha_beta::*;
pub use minimax::*;

use std::fmt::{self, Display};
use std::time::{Duration, Instant};

use tracing::{debug, debug_span};

use crate::coretypes::{Color, Cp, Move, PlyKind, MAX_DEPTH};
use crate::error::{self, ErrorKind};
use crate::rules::Rules;

/// The results found from running a search on some root position.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SearchResult<M = Move> {
    /// The best move to make for a position discovered from search.
    /// None if the root was terminal or the search had no depth.
    pub best_move: Option<M>,
    /// The centipawn score of making the best move, with absolute Cp (+White, -Black).
    pub score: Cp,
    /// The player to move for the root position that was searched.
    pub player: Color,
    /// Depth (aka ply, half move) in plies that was searched.
    pub depth: PlyKind,
    /// Total number of nodes visited in a search.
    pub nodes: u64,
    /// Number of nodes where remaining siblings were cut off.
    pub cut_nodes: u64,
    /// Total time elapsed from the start to the end of a search.
    pub elapsed: Duration,
}

/// Counters updated while a search runs.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cut_nodes: u64,
}

impl<M> SearchResult<M> {
    /// Get average nodes per second of search.
    pub fn nps(&self) -> f64 {
        (self.nodes as f64 / self.elapsed.as_secs_f64()).round()
    }

    /// Converts the score of the search into one that is relative to search's root player.
    pub fn relative_score(&self) -> Cp {
        self.score * self.player.sign()
    }

    /// Returns the color who is leading in the search of the root position, or None if even.
    pub fn leading(&self) -> Option<Color> {
        self.score.leading()
    }
}

impl<M: Display> Display for SearchResult<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let best_move = match &self.best_move {
            Some(move_) => move_.to_string(),
            None => String::from("none"),
        };
        writeln!(f, "SearchResult {{")?;
        writeln!(f, "    best_move: {best_move}")?;
        writeln!(f, "    abs_score: {}", self.score)?;
        writeln!(f, "    player   : {}", self.player)?;
        writeln!(f, "    depth    : {}", self.depth)?;
        writeln!(f, "    nodes    : {}", self.nodes)?;
        writeln!(f, "    cut_nodes: {}", self.cut_nodes)?;
        writeln!(f, "    nps      : {}", self.nps())?;
        writeln!(
            f,
            "    elapsed  : {}.{:03}s",
            self.elapsed.as_secs(),
            self.elapsed.subsec_millis()
        )?;
        writeln!(f, "}}")
    }
}

/// Check a caller supplied depth before it reaches the search.
/// A negative depth has no meaning and is refused, never clamped.
pub fn validate_depth(depth: i64) -> error::Result<PlyKind> {
    if depth < 0 {
        return Err((ErrorKind::SearchNegativeDepth, depth).into());
    }
    match PlyKind::try_from(depth) {
        Ok(ply) if ply <= MAX_DEPTH => Ok(ply),
        _ => Err((ErrorKind::SearchDepthTooLarge, depth).into()),
    }
}

/// Parry Engine primary position search function.
///
/// Searches `position` to `depth` plies with the full window, maximizing for White
/// and minimizing for Black. `position` is played on in place and is left exactly
/// as it was given once this returns.
pub fn search<R: Rules>(position: &mut R, depth: PlyKind) -> SearchResult<R::Move> {
    let player = position.player();
    let span = debug_span!("search", depth, player = %player);
    let _entered = span.enter();
    debug!("starting search");

    let instant = Instant::now();
    let mut stats = SearchStats::default();
    let maximizing = player == Color::White;
    let (score, best_move) = alpha_beta(position, depth, Cp::MIN, Cp::MAX, maximizing, &mut stats);

    let result = SearchResult {
        best_move,
        score,
        player,
        depth,
        nodes: stats.nodes,
        cut_nodes: stats.cut_nodes,
        elapsed: instant.elapsed(),
    };
    debug!(
        nodes = result.nodes,
        cut_nodes = result.cut_nodes,
        score = %result.score,
        best_move = ?result.best_move,
        elapsed = ?result.elapsed,
        "search complete"
    );
    result
}

/// Choose a move for the player to move, or None if the game is over.
pub fn select_move<R: Rules>(position: &mut R, depth: PlyKind) -> Option<R::Move> {
    search(position, depth).best_move
}
