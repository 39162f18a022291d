//! Opponent selection for ghost behaviors
//!
//! On every snapshot swap each non-learning behavior independently gets
//! either a uniformly sampled pool snapshot or the live weights.

use std::fmt;

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::snapshot::SnapshotPool;
use crate::policy::weights::WeightBundle;

/// Which weights currently back a ghost behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentTag {
    /// Snapshot from pool slot `n`
    Pool(usize),
    /// The learning policy's latest weights
    Live,
}

impl OpponentTag {
    /// Pool index, or -1 for the live policy
    pub fn index(self) -> i64 {
        match self {
            OpponentTag::Pool(index) => index as i64,
            OpponentTag::Live => -1,
        }
    }
}

impl fmt::Display for OpponentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpponentTag::Pool(index) => write!(f, "{index}"),
            OpponentTag::Live => write!(f, "current"),
        }
    }
}

/// Opponent chosen for one ghost behavior
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Ghost behavior identity
    pub behavior_id: String,
    /// Where the weights came from
    pub tag: OpponentTag,
    /// Weights to load into the ghost policy
    pub weights: WeightBundle,
}

/// Uniform-or-live opponent sampler
///
/// Only the tag chosen last is remembered as the current opponent, so Elo
/// attribution is exact only when there is a single ghost behavior.
pub struct OpponentScheduler {
    current_prob: f64,
    rng: StdRng,
    current_opponent: OpponentTag,
}

impl OpponentScheduler {
    /// Create a scheduler that fields the live policy with probability `current_prob`
    pub fn new(current_prob: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { current_prob, rng, current_opponent: OpponentTag::Pool(0) }
    }

    /// Opponent that the next episode outcome is scored against
    pub fn current_opponent(&self) -> OpponentTag {
        self.current_opponent
    }

    /// Probability of fielding the live policy
    pub fn current_prob(&self) -> f64 {
        self.current_prob
    }

    /// Draw one opponent
    ///
    /// Falls back to the live weights if the sampled slot is empty.
    pub fn choose(&mut self, pool: &SnapshotPool, live: &WeightBundle) -> (OpponentTag, WeightBundle) {
        let u: f64 = self.rng.gen();
        if u < 1.0 - self.current_prob {
            if let Some((index, weights)) = pool.sample_random(&mut self.rng) {
                return (OpponentTag::Pool(index), weights.clone());
            }
        }
        (OpponentTag::Live, live.clone())
    }

    /// Choose an opponent for every ghost behavior
    ///
    /// The last assignment becomes the current opponent.
    pub fn reassign<'a, I>(&mut self, ghosts: I, pool: &SnapshotPool, live: &WeightBundle) -> Vec<Assignment>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut assignments = Vec::new();
        for behavior_id in ghosts {
            let (tag, weights) = self.choose(pool, live);
            self.current_opponent = tag;
            assignments.push(Assignment { behavior_id: behavior_id.to_string(), tag, weights });
        }
        assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghost::elo::EloTracker;

    fn bundle(value: f32) -> WeightBundle {
        WeightBundle::new().with_layer("w", vec![1], vec![value])
    }

    fn filled_pool(window: usize) -> SnapshotPool {
        let mut pool = SnapshotPool::new(window);
        let mut elo = EloTracker::new(window, 1200.0, 1.0);
        for i in 0..window {
            pool.insert(bundle(i as f32), &mut elo);
        }
        pool
    }

    #[test]
    fn test_prob_one_always_live() {
        let pool = filled_pool(5);
        let live = bundle(99.0);

        for seed in 0..20 {
            let mut scheduler = OpponentScheduler::new(1.0, Some(seed));
            for _ in 0..50 {
                let (tag, weights) = scheduler.choose(&pool, &live);
                assert_eq!(tag, OpponentTag::Live);
                assert_eq!(weights, live);
            }
        }
    }

    #[test]
    fn test_prob_zero_never_live() {
        let pool = filled_pool(5);
        let live = bundle(99.0);
        let mut scheduler = OpponentScheduler::new(0.0, Some(11));

        for _ in 0..500 {
            let (tag, weights) = scheduler.choose(&pool, &live);
            let OpponentTag::Pool(index) = tag else {
                panic!("live policy fielded with current_prob = 0");
            };
            assert_eq!(weights, bundle(index as f32));
        }
    }

    #[test]
    fn test_mixed_prob_fields_both() {
        let pool = filled_pool(5);
        let live = bundle(99.0);
        let mut scheduler = OpponentScheduler::new(0.5, Some(5));

        let tags: Vec<OpponentTag> = (0..200).map(|_| scheduler.choose(&pool, &live).0).collect();
        assert!(tags.contains(&OpponentTag::Live));
        assert!(tags.iter().any(|t| matches!(t, OpponentTag::Pool(_))));
    }

    #[test]
    fn test_empty_pool_falls_back_to_live() {
        let pool = SnapshotPool::new(3);
        let live = bundle(1.0);
        let mut scheduler = OpponentScheduler::new(0.0, Some(1));

        assert_eq!(scheduler.choose(&pool, &live).0, OpponentTag::Live);
    }

    #[test]
    fn test_reassign_tracks_only_last_opponent() {
        let pool = filled_pool(4);
        let live = bundle(99.0);
        let mut scheduler = OpponentScheduler::new(0.3, Some(9));

        let assignments = scheduler.reassign(["Blue", "Green", "Yellow"], &pool, &live);

        assert_eq!(assignments.len(), 3);
        assert_eq!(assignments[0].behavior_id, "Blue");
        assert_eq!(scheduler.current_opponent(), assignments[2].tag);
    }

    #[test]
    fn test_reassign_without_ghosts_keeps_opponent() {
        let pool = filled_pool(4);
        let mut scheduler = OpponentScheduler::new(0.0, Some(2));

        let assignments = scheduler.reassign(std::iter::empty(), &pool, &bundle(0.0));

        assert!(assignments.is_empty());
        assert_eq!(scheduler.current_opponent(), OpponentTag::Pool(0));
    }

    #[test]
    fn test_seed_is_deterministic() {
        let pool = filled_pool(6);
        let live = bundle(99.0);
        let mut a = OpponentScheduler::new(0.4, Some(123));
        let mut b = OpponentScheduler::new(0.4, Some(123));

        for _ in 0..20 {
            assert_eq!(a.choose(&pool, &live).0, b.choose(&pool, &live).0);
        }
    }

    #[test]
    fn test_tag_display_and_index() {
        assert_eq!(OpponentTag::Pool(3).to_string(), "3");
        assert_eq!(OpponentTag::Live.to_string(), "current");
        assert_eq!(OpponentTag::Pool(3).index(), 3);
        assert_eq!(OpponentTag::Live.index(), -1);
    }
}
