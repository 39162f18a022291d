//! Elo rating of the learning policy against its snapshot pool

use super::scheduler::OpponentTag;
use crate::stats::StatsSummary;

/// Outcome of a finished episode from the learning policy's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// Learning policy won (or drew)
    Win,
    /// Learning policy lost
    Loss,
}

impl GameResult {
    /// Classify by the reward of the final step: negative means a loss
    pub fn from_final_reward(reward: f32) -> Self {
        if reward < 0.0 {
            GameResult::Loss
        } else {
            GameResult::Win
        }
    }

    fn score(self) -> f64 {
        match self {
            GameResult::Win => 1.0,
            GameResult::Loss => 0.0,
        }
    }
}

/// Rating change for the player rated `rating` after `result` against `opponent_rating`
///
/// The magnitude never exceeds `k`.
pub fn compute_elo_rating_change(rating: f64, opponent_rating: f64, result: GameResult, k: f64) -> f64 {
    let r1 = 10f64.powf(rating / 400.0);
    let r2 = 10f64.powf(opponent_rating / 400.0);
    let expected = r1 / (r1 + r2);

    k * (result.score() - expected)
}

/// Ratings of the learning policy and of each snapshot pool slot
#[derive(Debug, Clone)]
pub struct EloTracker {
    current_elo: f64,
    opponent_elos: Vec<f64>,
    k: f64,
}

impl EloTracker {
    /// Create a tracker with `window` opponent slots, all at `initial_elo`
    pub fn new(window: usize, initial_elo: f64, k: f64) -> Self {
        Self { current_elo: initial_elo, opponent_elos: vec![initial_elo; window], k }
    }

    /// Rating of the learning policy
    pub fn current_elo(&self) -> f64 {
        self.current_elo
    }

    /// Ratings of the pool slots
    pub fn opponent_elos(&self) -> &[f64] {
        &self.opponent_elos
    }

    /// Transfer rating between the learning policy and `opponent`
    ///
    /// Returns the change applied to the learning policy, or `None` when the
    /// opponent has no rating (the live policy, or an index outside the pool).
    pub fn apply_outcome(&mut self, opponent: OpponentTag, result: GameResult) -> Option<f64> {
        let OpponentTag::Pool(index) = opponent else {
            return None;
        };
        let opponent_elo = self.opponent_elos.get_mut(index)?;

        let change = compute_elo_rating_change(self.current_elo, *opponent_elo, result, self.k);
        self.current_elo += change;
        *opponent_elo -= change;

        Some(change)
    }

    /// Freeze the learning rating into pool slot `cursor`
    pub fn record_snapshot_insertion(&mut self, cursor: usize) {
        if let Some(slot) = self.opponent_elos.get_mut(cursor) {
            *slot = self.current_elo;
        }
    }

    /// Mean and standard deviation of the pool ratings
    pub fn opponent_summary(&self) -> StatsSummary {
        StatsSummary::from_values(&self.opponent_elos)
    }
}
