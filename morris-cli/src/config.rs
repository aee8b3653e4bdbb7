//! Configuration for computer-vs-computer matches
//!
//! Level 4 - Utilities and configuration

use morris_core::{Heuristics, Player};

/// Match configuration
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Search depth for White
    pub white_depth: u32,
    /// Search depth for Black
    pub black_depth: u32,
    /// Number of games to play
    pub games: usize,
    /// Plies after which a game is called a draw
    pub max_plies: u32,
    /// Opening plies played at random before the engines take over
    pub random_plies: u32,
    /// Heuristics for evaluation
    pub heuristics: Heuristics,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            white_depth: 3,
            black_depth: 3,
            games: 1,
            max_plies: 200,
            random_plies: 0,
            heuristics: Heuristics::default(),
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Both sides searching at `depth`
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.white_depth = depth;
        self.black_depth = depth;
        self
    }

    pub fn with_depths(mut self, white: u32, black: u32) -> Self {
        self.white_depth = white;
        self.black_depth = black;
        self
    }

    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_max_plies(mut self, max_plies: u32) -> Self {
        self.max_plies = max_plies;
        self
    }

    pub fn with_random_plies(mut self, random_plies: u32) -> Self {
        self.random_plies = random_plies;
        self
    }

    /// Set custom heuristics
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Search depth used for `player`
    pub fn depth_for(&self, player: Player) -> u32 {
        match player {
            Player::White => self.white_depth,
            Player::Black => self.black_depth,
        }
    }
}
