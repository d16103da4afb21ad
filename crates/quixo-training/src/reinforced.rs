//! Tabular Q-learning over board states.
//!
//! The learner values *positions*: the key of a state is the board right after one
//! of its own moves ([`Board::state_key`](quixo_engine::Board::state_key)). During
//! training every key visited in a game is pulled towards the game's reward, and at
//! decision time the move leading to the highest-valued position is played.

use std::collections::HashMap;

use quixo_engine::{GameSession, GameState, Move, Player, PlayerId};
use quixo_players::RandomPlayer;
use rand::{Rng, SeedableRng, seq::IndexedRandom};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// State values keyed by [`Board::state_key`](quixo_engine::Board::state_key).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QTable(HashMap<String, f64>);

impl QTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value, 0 for unseen states.
    #[must_use]
    pub fn value(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    /// Moves the value of `key` towards `reward` by the learning rate `alpha`.
    pub fn update(&mut self, key: &str, reward: f64, alpha: f64) {
        let value = self.0.entry(key.to_owned()).or_insert(0.0);
        *value += alpha * (reward - *value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReinforcedConfig {
    pub training_matches: usize,
    /// Learning rate.
    pub alpha: f64,
    /// Exploration probability while training.
    pub epsilon: f64,
    pub win_reward: f64,
}

impl Default for ReinforcedConfig {
    fn default() -> Self {
        Self {
            training_matches: 1000,
            alpha: 0.3,
            epsilon: 0.3,
            win_reward: 10.0,
        }
    }
}

/// Epsilon-greedy Q-learning player.
///
/// An untrained player trains itself on its first [`make_move`](Player::make_move)
/// call, in the seat it was asked to play, and never explores afterwards.
#[derive(Debug, Clone)]
pub struct ReinforcedPlayer {
    config: ReinforcedConfig,
    q_table: QTable,
    trajectory: Vec<String>,
    epsilon: f64,
    trained: bool,
    rng: Pcg32,
}

impl ReinforcedPlayer {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(ReinforcedConfig::default(), seed)
    }

    #[must_use]
    pub fn with_config(config: ReinforcedConfig, seed: u64) -> Self {
        Self {
            epsilon: config.epsilon,
            config,
            q_table: QTable::new(),
            trajectory: vec![],
            trained: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Wraps an already learned table; the player never trains or explores.
    #[must_use]
    pub fn pretrained(q_table: QTable, seed: u64) -> Self {
        Self {
            q_table,
            epsilon: 0.0,
            trained: true,
            ..Self::new(seed)
        }
    }

    #[must_use]
    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Plays the configured number of training matches in `seat` against a random player.
    ///
    /// Afterwards the player is marked trained and stops exploring.
    pub fn train(&mut self, seat: PlayerId) {
        let mut opponent = RandomPlayer::new(self.rng.random());
        let mut wins = 0;
        self.epsilon = self.config.epsilon;
        for _ in 0..self.config.training_matches {
            self.trajectory.clear();
            let mut session = GameSession::new();
            let mut learner = Learner(self);
            let result = match seat {
                PlayerId::Zero => session.play(&mut learner, &mut opponent),
                PlayerId::One => session.play(&mut opponent, &mut learner),
            };
            let won = result.is_ok_and(|winner| winner == seat);
            let reward = if won { self.config.win_reward } else { 0.0 };
            wins += usize::from(won);
            for key in &self.trajectory {
                self.q_table.update(key, reward, self.config.alpha);
            }
        }
        self.trajectory.clear();
        self.trained = true;
        self.epsilon = 0.0;
        debug!(
            %seat,
            matches = self.config.training_matches,
            wins,
            states = self.q_table.len(),
            "reinforcement training finished"
        );
    }

    fn decide(&mut self, state: &GameState) -> Move {
        let me = state.current_player();
        let board = state.board();
        let legal = state.legal_moves();

        let mv = if self.rng.random_bool(self.epsilon.clamp(0.0, 1.0)) {
            self.explore(state)
        } else {
            let values: Vec<f64> = legal
                .iter()
                .map(|mv| {
                    board
                        .with_move(*mv, me)
                        .map_or(f64::NEG_INFINITY, |next| self.q_table.value(&next.state_key()))
                })
                .collect();
            let all_tied = values.windows(2).all(|w| w[0] == w[1]);
            if all_tied {
                self.explore(state)
            } else {
                let mut best = 0;
                for (i, value) in values.iter().enumerate() {
                    if *value > values[best] {
                        best = i;
                    }
                }
                legal[best]
            }
        };

        if !self.trained
            && let Some(next) = board.with_move(mv, me)
        {
            self.trajectory.push(next.state_key());
        }
        mv
    }

    /// Uniform draw among moves taking a neutral cell, or among moves re-taking an own
    /// cell when there is no neutral one.
    fn explore(&mut self, state: &GameState) -> Move {
        let me = state.current_player();
        let (own, free): (Vec<Move>, Vec<Move>) = state
            .legal_moves()
            .into_iter()
            .partition(|mv| state.board().get(mv.cell()) == Some(me));
        *free
            .choose(&mut self.rng)
            .or_else(|| own.choose(&mut self.rng))
            .expect("every reachable position has a legal move")
    }
}

/// Drives the decision rule without triggering training.
struct Learner<'a>(&'a mut ReinforcedPlayer);

impl Player for Learner<'_> {
    fn make_move(&mut self, state: &GameState) -> Move {
        self.0.decide(state)
    }
}

impl Player for ReinforcedPlayer {
    fn make_move(&mut self, state: &GameState) -> Move {
        if !self.trained {
            self.train(state.current_player());
        }
        self.decide(state)
    }
}
