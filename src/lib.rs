//! # Thrust Ghost
//!
//! Self-play training controller for multi-agent reinforcement learning.
//!
//! A [`ghost::GhostTrainer`] wraps any single-policy [`trainer::Trainer`] and
//! makes it play against frozen copies of itself. It keeps a fixed-size ring
//! of historical policy snapshots, tracks an Elo rating for the learning
//! policy and for each snapshot, and on a step cadence swaps which snapshot
//! (or the live policy) controls the non-learning agents.
//!
//! The wrapped trainer never learns that it is playing ghosts: the
//! controller interposes its own relay queues between the environment-facing
//! [`queue::AgentManagerQueue`]s and the trainer's inputs and outputs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use thrust_ghost::prelude::*;
//!
//! # fn wrapped() -> Box<dyn Trainer> { unimplemented!() }
//! # fn main() -> anyhow::Result<()> {
//! let config = GhostConfig::new().window(5).current_prob(0.2).snapshot_per(100);
//! let mut ghost = GhostTrainer::new(wrapped(), config)?;
//!
//! ghost.add_policy("Striker", shared_policy(ParameterPolicy::new("Striker", WeightBundle::new())))?;
//! ghost.publish_policy_queue(AgentManagerQueue::new("Striker"));
//!
//! loop {
//!     ghost.advance()?;
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Typed error conditions
pub mod error;

/// Policy capability trait and weight bundles
pub mod policy;

/// Episode trajectories produced by environment workers
pub mod trajectory;

/// Behavior-tagged queues between environment workers and trainers
pub mod queue;

/// Telemetry sinks
pub mod stats;

/// Capability interface of a wrapped single-policy trainer
pub mod trainer;

/// Self-play controller: snapshot pool, Elo tracking, opponent scheduling
pub mod ghost;

/// Prelude module for convenient imports
///
/// This module re-exports commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::error::GhostError;
    pub use crate::ghost::{
        EloTracker, GameResult, GhostConfig, GhostTrainer, OpponentScheduler, OpponentTag,
        SnapshotPool,
    };
    pub use crate::policy::{shared_policy, ParameterPolicy, Policy, PolicySpec, SharedPolicy};
    pub use crate::policy::weights::WeightBundle;
    pub use crate::queue::AgentManagerQueue;
    pub use crate::stats::{SharedStatsReporter, StatsRecorder, StatsReporter};
    pub use crate::trainer::Trainer;
    pub use crate::trajectory::{AgentExperience, Trajectory};
}

/// Current version of thrust-ghost
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
