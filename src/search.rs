// =============================================================================
// Minimax search
//
// Plain full-width minimax to a fixed ply depth, generic over any game that
// implements `MinimaxGame`. Every move is applied to the game in place and
// undone before the next sibling is tried, so the game must restore itself
// exactly on undo.
//
// Scores are absolute: one side maximizes, the other minimizes. Positions
// reached more than once within a search (transpositions) reuse the score
// recorded the first time. The cache is cleared at the start of every
// top-level `get_move`.
// =============================================================================

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChessError, ChessResult};

pub type Score = i32;

/// A won position for the maximizing side.
pub const MAX_SCORE: Score = Score::MAX;
/// A won position for the minimizing side.
pub const MIN_SCORE: Score = -Score::MAX;

fn is_extreme(score: Score) -> bool {
    score == MAX_SCORE || score == MIN_SCORE
}

// =============================================================================
// Game capability
// =============================================================================

/// What the search needs from a game.
pub trait MinimaxGame {
    type Move: Clone + fmt::Debug;
    type Key: Hash + Eq;

    /// Legal moves for the side to move. Empty when the game is over.
    fn legal_moves(&mut self) -> Vec<Self::Move>;

    /// Static evaluation of the current position.
    fn score(&mut self) -> Score;

    /// Value of a position with no legal moves.
    fn terminal_score(&mut self) -> Score {
        self.score()
    }

    /// Apply a move produced by `legal_moves`. Failure is a bug in the game
    /// and may panic.
    fn make_move(&mut self, mv: &Self::Move);

    fn undo_move(&mut self);

    /// Canonical key of the current position for the transposition cache.
    fn position_key(&self) -> Self::Key;
}

// =============================================================================
// Configuration
// =============================================================================

pub const DEPTH_VAR: &str = "MINICHESS_DEPTH";
pub const SEED_VAR: &str = "MINICHESS_SEED";
pub const RANDOM_TIES_VAR: &str = "MINICHESS_RANDOM_TIES";

/// Search settings for an automated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Maximum ply depth, at least 1.
    pub depth: usize,
    /// Pick uniformly among equally scored moves instead of the first one.
    pub randomize_ties: bool,
    /// Seed for tie-breaking. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AiConfig {
    pub fn new() -> Self {
        AiConfig {
            depth: 3,
            randomize_ties: true,
            seed: None,
        }
    }

    /// Defaults overlaid with `MINICHESS_DEPTH`, `MINICHESS_SEED` and
    /// `MINICHESS_RANDOM_TIES` from the process environment.
    pub fn from_env() -> ChessResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with a caller-supplied variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ChessResult<Self> {
        let mut config = AiConfig::new();
        if let Some(depth) = parse_var(&lookup, DEPTH_VAR)? {
            config.depth = depth;
        }
        if let Some(seed) = parse_var(&lookup, SEED_VAR)? {
            config.seed = Some(seed);
        }
        if let Some(randomize) = parse_var(&lookup, RANDOM_TIES_VAR)? {
            config.randomize_ties = randomize;
        }
        config.validate()
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> ChessResult<Self> {
        let config: AiConfig = serde_json::from_str(text).map_err(|e| ChessError::Config {
            message: e.to_string(),
        })?;
        config.validate()
    }

    fn validate(self) -> ChessResult<Self> {
        if self.depth == 0 {
            return Err(ChessError::Config {
                message: "depth must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> ChessResult<Option<T>> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| ChessError::Config {
            message: format!("{name}: cannot parse {raw:?}"),
        })
}

// =============================================================================
// Search
// =============================================================================

/// The chosen move and some statistics about the search that found it.
#[derive(Clone, Debug)]
pub struct SearchResult<M> {
    pub mv: M,
    pub score: Score,
    /// Moves applied during the search.
    pub nodes: u64,
    /// Positions answered from the cache.
    pub cache_hits: u64,
}

pub struct Minimax<G: MinimaxGame> {
    minimize: bool,
    config: AiConfig,
    visited: HashMap<G::Key, Score>,
    rng: Option<StdRng>,
    nodes: u64,
    cache_hits: u64,
}

impl<G: MinimaxGame> Minimax<G> {
    /// A searcher for the side that wants low scores (`minimize`) or high ones.
    pub fn new(minimize: bool, config: AiConfig) -> Self {
        let rng = config.seed.map(StdRng::seed_from_u64);
        let config = AiConfig {
            depth: config.depth.max(1),
            ..config
        };
        Minimax {
            minimize,
            config,
            visited: HashMap::new(),
            rng,
            nodes: 0,
            cache_hits: 0,
        }
    }

    /// Best move for this searcher's side, or `None` when there are no legal
    /// moves. The game is left exactly as it was found.
    pub fn get_move(&mut self, game: &mut G) -> Option<SearchResult<G::Move>> {
        self.visited.clear();
        self.nodes = 0;
        self.cache_hits = 0;

        let mut best: Option<Score> = None;
        let mut ties: Vec<G::Move> = Vec::new();
        for mv in game.legal_moves() {
            let score = self.try_move(game, &mv, self.minimize, 1);
            match best {
                Some(b) if b == score => ties.push(mv),
                Some(b) if !self.improves(self.minimize, score, b) => {}
                _ => {
                    best = Some(score);
                    ties.clear();
                    ties.push(mv);
                }
            }
        }
        let score = best?;

        let mv = if self.config.randomize_ties {
            let picked = match self.rng.as_mut() {
                Some(rng) => ties.choose(rng),
                None => ties.choose(&mut rand::thread_rng()),
            };
            picked.cloned()?
        } else {
            ties.first().cloned()?
        };

        debug!(
            nodes = self.nodes,
            cache_hits = self.cache_hits,
            cached = self.visited.len(),
            score,
            tied = ties.len(),
            "search finished"
        );
        Some(SearchResult {
            mv,
            score,
            nodes: self.nodes,
            cache_hits: self.cache_hits,
        })
    }

    fn improves(&self, minimize: bool, score: Score, best: Score) -> bool {
        if minimize {
            score < best
        } else {
            score > best
        }
    }

    /// Value of the current position with `minimize` choosing at `depth`.
    fn search(&mut self, game: &mut G, minimize: bool, depth: usize) -> Score {
        let moves = game.legal_moves();
        if moves.is_empty() {
            return game.terminal_score();
        }
        let mut best = if minimize { MAX_SCORE } else { MIN_SCORE };
        for mv in &moves {
            let score = self.try_move(game, mv, minimize, depth);
            if self.improves(minimize, score, best) {
                best = score;
            }
        }
        best
    }

    /// Apply `mv`, score the result (searching deeper when allowed) and undo.
    fn try_move(&mut self, game: &mut G, mv: &G::Move, minimize: bool, depth: usize) -> Score {
        self.nodes += 1;
        game.make_move(mv);
        let key = game.position_key();
        if let Some(&cached) = self.visited.get(&key) {
            self.cache_hits += 1;
            game.undo_move();
            return cached;
        }

        let mut score = game.score();
        self.visited.insert(key, score);
        if !is_extreme(score) && depth < self.config.depth {
            score = self.search(game, !minimize, depth + 1);
            self.visited.insert(game.position_key(), score);
        }
        game.undo_move();
        score
    }
}
