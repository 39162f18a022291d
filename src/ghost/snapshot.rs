//! Ring buffer of past policy weights

use rand::Rng;

use super::elo::EloTracker;
use crate::policy::weights::WeightBundle;

/// Fixed-size FIFO ring of weight snapshots
///
/// Slot `i` is rated by `EloTracker::opponent_elos()[i]`; inserting a
/// snapshot also resets that slot's rating to the learning policy's rating.
#[derive(Debug, Clone)]
pub struct SnapshotPool {
    slots: Vec<Option<WeightBundle>>,
    cursor: usize,
}

impl SnapshotPool {
    /// Create an empty pool with `window` slots
    pub fn new(window: usize) -> Self {
        Self { slots: vec![None; window], cursor: 0 }
    }

    /// Number of slots
    pub fn window(&self) -> usize {
        self.slots.len()
    }

    /// Slot the next insertion will overwrite
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Snapshot held in slot `index`
    pub fn get(&self, index: usize) -> Option<&WeightBundle> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Number of filled slots
    pub fn num_filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Fill every slot with `weights`
    pub fn bootstrap(&mut self, weights: &WeightBundle) {
        for slot in &mut self.slots {
            *slot = Some(weights.clone());
        }
    }

    /// Overwrite the oldest slot with `weights`
    ///
    /// Returns the index written.
    pub fn insert(&mut self, weights: WeightBundle, elo: &mut EloTracker) -> usize {
        let index = self.cursor;
        self.slots[index] = Some(weights);
        elo.record_snapshot_insertion(index);
        self.cursor = (self.cursor + 1) % self.slots.len();
        index
    }

    /// Pick a slot uniformly at random
    ///
    /// Returns `None` if the chosen slot was never filled.
    pub fn sample_random<R: Rng>(&self, rng: &mut R) -> Option<(usize, &WeightBundle)> {
        if self.slots.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.slots.len());
        self.get(index).map(|weights| (index, weights))
    }
}
