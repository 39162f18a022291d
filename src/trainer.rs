//! Trainer capability interface
//!
//! A [`Trainer`] turns trajectories into policy updates for the behaviors it
//! owns. The ghost trainer implements this trait itself and holds the trainer
//! it wraps as a `Box<dyn Trainer>`, so any optimization algorithm can be
//! played against its own snapshots without changes.

use anyhow::Result;

use crate::{
    policy::{PolicySpec, SharedPolicy},
    queue::AgentManagerQueue,
    stats::SharedStatsReporter,
    trajectory::Trajectory,
};

/// Operations the owning training loop drives a trainer through
pub trait Trainer {
    /// Consume available trajectories and update the policy if ready
    ///
    /// Must not block: empty queues are skipped.
    fn advance(&mut self) -> Result<()>;

    /// Number of environment steps processed so far
    fn get_step(&self) -> usize;

    /// Step at which the next policy update is expected
    fn next_update_step(&self) -> usize;

    /// Build a new policy for a behavior
    fn create_policy(&mut self, spec: &PolicySpec) -> Result<SharedPolicy>;

    /// Register a policy under a behavior identity
    fn add_policy(&mut self, behavior_id: &str, policy: SharedPolicy) -> Result<()>;

    /// Policy registered under a behavior identity
    fn get_policy(&self, behavior_id: &str) -> Result<SharedPolicy>;

    /// Policy currently being optimized, if any
    fn policy(&self) -> Option<SharedPolicy>;

    /// Save a checkpoint of a behavior's model
    fn save_model(&self, behavior_id: &str) -> Result<()>;

    /// Export a behavior's model for inference
    fn export_model(&self, behavior_id: &str) -> Result<()>;

    /// Notify the trainer that the current episode has ended
    fn end_episode(&mut self);

    /// Add a queue to publish policy updates to
    fn publish_policy_queue(&mut self, queue: AgentManagerQueue<SharedPolicy>);

    /// Add a queue to read trajectories from
    fn subscribe_trajectory_queue(&mut self, queue: AgentManagerQueue<Trajectory>);

    /// Sink for this trainer's statistics
    fn stats_reporter(&self) -> SharedStatsReporter;
}
