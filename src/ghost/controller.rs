//! Ghost trainer: self-play controller around a wrapped trainer
//!
//! The first behavior registered through [`GhostTrainer::add_policy`] becomes
//! the learning behavior. Only its queues are relayed to the wrapped trainer;
//! every other behavior is a ghost whose weights are swapped in from the
//! snapshot pool on a fixed step cadence.

use std::collections::HashMap;

use anyhow::Result;

use super::{
    config::GhostConfig,
    elo::{EloTracker, GameResult},
    scheduler::{OpponentScheduler, OpponentTag},
    snapshot::SnapshotPool,
};
use crate::{
    error::GhostError,
    policy::{read_weights, weights::WeightBundle, write_weights, PolicySpec, SharedPolicy},
    queue::AgentManagerQueue,
    stats::SharedStatsReporter,
    trainer::Trainer,
    trajectory::Trajectory,
};

/// Stat key under which the learning policy's rating is reported
pub const ELO_STAT: &str = "ELO";

/// Self-play controller
///
/// This component is driven by the owning training loop and is responsible for:
/// - Relaying learning-behavior trajectories to the wrapped trainer
/// - Scoring terminal episodes into the Elo ratings
/// - Capturing the wrapped trainer's policy updates as the live snapshot
/// - Periodically pushing snapshots into the pool and swapping ghost opponents
pub struct GhostTrainer {
    /// Trainer optimizing the learning behavior
    trainer: Box<dyn Trainer>,

    /// Self-play configuration
    config: GhostConfig,

    /// Every published policy queue, in publication order
    policy_queues: Vec<AgentManagerQueue<SharedPolicy>>,

    /// (external, internal) policy queues of the learning behavior
    policy_relays: Vec<(AgentManagerQueue<SharedPolicy>, AgentManagerQueue<SharedPolicy>)>,

    /// (external, internal) trajectory queues of the learning behavior
    trajectory_relays: Vec<(AgentManagerQueue<Trajectory>, AgentManagerQueue<Trajectory>)>,

    /// Trajectory queues of ghost behaviors (drained, never learned from)
    ghost_trajectory_queues: Vec<AgentManagerQueue<Trajectory>>,

    /// Every registered policy by behavior identity
    policies: HashMap<String, SharedPolicy>,

    /// Behavior being trained; fixed by the first registration
    learning_behavior_id: Option<String>,

    /// Most recent weights produced by the wrapped trainer
    current_policy_snapshot: Option<WeightBundle>,

    elo: EloTracker,
    pool: SnapshotPool,
    scheduler: OpponentScheduler,

    /// Step of the last snapshot
    last_step: usize,

    /// Mirror of the wrapped trainer's next update step
    next_update_step: usize,

    stats_reporter: SharedStatsReporter,
}

impl GhostTrainer {
    /// Wrap `trainer` for self-play
    ///
    /// Fails if `config` does not validate.
    pub fn new(trainer: Box<dyn Trainer>, config: GhostConfig) -> Result<Self> {
        config.validate()?;

        let stats_reporter = trainer.stats_reporter();
        let elo = EloTracker::new(config.window, config.initial_elo, config.elo_k);
        let pool = SnapshotPool::new(config.window);
        let scheduler = OpponentScheduler::new(config.current_prob, config.seed);

        Ok(Self {
            trainer,
            config,
            policy_queues: Vec::new(),
            policy_relays: Vec::new(),
            trajectory_relays: Vec::new(),
            ghost_trajectory_queues: Vec::new(),
            policies: HashMap::new(),
            learning_behavior_id: None,
            current_policy_snapshot: None,
            elo,
            pool,
            scheduler,
            last_step: 0,
            next_update_step: 0,
            stats_reporter,
        })
    }

    /// Self-play configuration
    pub fn config(&self) -> &GhostConfig {
        &self.config
    }

    /// Behavior being trained, once the first policy has been registered
    pub fn learning_behavior_id(&self) -> Option<&str> {
        self.learning_behavior_id.as_deref()
    }

    /// Rating of the learning policy
    pub fn current_elo(&self) -> f64 {
        self.elo.current_elo()
    }

    /// Ratings of the snapshot pool slots
    pub fn opponent_elos(&self) -> &[f64] {
        self.elo.opponent_elos()
    }

    /// Opponent the next terminal episode is scored against
    pub fn current_opponent(&self) -> OpponentTag {
        self.scheduler.current_opponent()
    }

    /// Snapshot pool
    pub fn snapshot_pool(&self) -> &SnapshotPool {
        &self.pool
    }

    /// Latest weights captured from the wrapped trainer
    pub fn current_policy_snapshot(&self) -> Option<&WeightBundle> {
        self.current_policy_snapshot.as_ref()
    }

    /// Step at which the last snapshot was taken
    pub fn last_snapshot_step(&self) -> usize {
        self.last_step
    }

    /// Score a finished episode of the learning behavior
    fn process_trajectory(elo: &mut EloTracker, opponent: OpponentTag, trajectory: &Trajectory) {
        if !trajectory.is_terminal() {
            return;
        }
        let Some(final_reward) = trajectory.final_reward() else {
            return;
        };

        let result = GameResult::from_final_reward(final_reward);
        if let Some(change) = elo.apply_outcome(opponent, result) {
            tracing::debug!(
                "Episode {:?} against snapshot {} | Elo change {:+.4}",
                result,
                opponent,
                change
            );
        }
    }

    /// Log and report the current ratings
    fn write_summary(&self, step: usize) {
        let opponents = self.elo.opponent_summary();
        tracing::info!(
            "Step {} | ELO: {:.3} | Mean Opponent ELO: {:.3} | Std Opponent ELO: {:.3}",
            step,
            self.elo.current_elo(),
            opponents.mean,
            opponents.std,
        );
        self.stats_reporter.add_stat(ELO_STAT, self.elo.current_elo() as f32);
    }

    /// Freeze the wrapped trainer's current policy into the pool
    fn save_snapshot(&mut self) -> Result<()> {
        let policy = match self.trainer.policy() {
            Some(policy) => policy,
            None => {
                let learning = self.learning_behavior_id.as_deref().ok_or(GhostError::NoLearningPolicy)?;
                self.get_policy(learning)?
            }
        };

        let weights = read_weights(&policy)?;
        let slot = self.pool.insert(weights, &mut self.elo);
        tracing::debug!("Saved snapshot into slot {} at Elo {:.3}", slot, self.elo.current_elo());
        Ok(())
    }

    /// Ghost behaviors with their policies, in publication order
    ///
    /// Fails on the first published ghost without a registered policy.
    fn ghost_policies(&self, learning: &str) -> Result<Vec<(String, SharedPolicy)>> {
        let mut ghosts: Vec<(String, SharedPolicy)> = Vec::new();
        for queue in &self.policy_queues {
            let id = queue.behavior_id();
            if id != learning && !ghosts.iter().any(|(g, _)| g == id) {
                ghosts.push((id.to_string(), self.get_policy(id)?));
            }
        }
        Ok(ghosts)
    }

    /// Load a freshly chosen opponent into every ghost behavior
    fn swap_snapshots(&mut self, learning: &str, ghosts: &[(String, SharedPolicy)]) -> Result<()> {
        let live = self.current_policy_snapshot.clone().ok_or(GhostError::NoLearningPolicy)?;

        let step = self.get_step();
        let assignments = self.scheduler.reassign(ghosts.iter().map(|(id, _)| id.as_str()), &self.pool, &live);
        for (assignment, (_, policy)) in assignments.into_iter().zip(ghosts) {
            tracing::info!(
                "Step {}: Swapping snapshot {} to id {} with {} learning",
                step,
                assignment.tag,
                assignment.behavior_id,
                learning
            );

            write_weights(policy, &assignment.weights)?;

            for queue in self.policy_queues.iter().filter(|q| q.behavior_id() == assignment.behavior_id) {
                queue.put(policy.clone());
            }
        }
        Ok(())
    }
}

impl Trainer for GhostTrainer {
    fn advance(&mut self) -> Result<()> {
        // 1. Relay learning trajectories and score finished games
        let opponent = self.scheduler.current_opponent();
        for (queue, internal) in &self.trajectory_relays {
            if let Some(trajectory) = queue.try_get() {
                Self::process_trajectory(&mut self.elo, opponent, &trajectory);
                internal.put(trajectory);
            }
        }
        for queue in &self.ghost_trajectory_queues {
            if let Some(trajectory) = queue.try_get() {
                tracing::trace!("Dropped {}-step ghost trajectory from {}", trajectory.len(), queue.behavior_id());
            }
        }

        // 2. Let the wrapped trainer learn
        self.next_update_step = self.trainer.next_update_step();
        self.trainer.advance()?;

        // 3. Report ratings
        let step = self.get_step();
        self.write_summary(step);

        // 4. Capture and republish policy updates
        for (queue, internal) in &self.policy_relays {
            if let Some(policy) = internal.try_get() {
                self.current_policy_snapshot = Some(read_weights(&policy)?);
                queue.put(policy);
            }
        }

        // 5. Snapshot and swap opponents on cadence
        if let Some(learning) = self.learning_behavior_id.clone() {
            if step.saturating_sub(self.last_step) > self.config.snapshot_per {
                // Unknown ghosts fail here, before the pool or ratings change
                let ghosts = self.ghost_policies(&learning)?;
                self.save_snapshot()?;
                self.last_step = step;
                self.swap_snapshots(&learning, &ghosts)?;
            }
        }

        Ok(())
    }

    fn get_step(&self) -> usize {
        self.trainer.get_step()
    }

    fn next_update_step(&self) -> usize {
        self.next_update_step
    }

    fn create_policy(&mut self, spec: &PolicySpec) -> Result<SharedPolicy> {
        self.trainer.create_policy(spec)
    }

    fn add_policy(&mut self, behavior_id: &str, policy: SharedPolicy) -> Result<()> {
        self.policies.insert(behavior_id.to_string(), policy.clone());

        if self.learning_behavior_id.is_none() {
            let weights = read_weights(&policy)?;
            self.pool.bootstrap(&weights);
            self.current_policy_snapshot = Some(weights);

            self.trainer.add_policy(behavior_id, policy)?;
            self.learning_behavior_id = Some(behavior_id.to_string());
            tracing::info!("Behavior {} is learning; snapshot pool of {} bootstrapped", behavior_id, self.pool.window());
        }
        Ok(())
    }

    fn get_policy(&self, behavior_id: &str) -> Result<SharedPolicy> {
        self.policies
            .get(behavior_id)
            .cloned()
            .ok_or_else(|| GhostError::UnknownBehavior(behavior_id.to_string()).into())
    }

    fn policy(&self) -> Option<SharedPolicy> {
        self.trainer.policy()
    }

    fn save_model(&self, behavior_id: &str) -> Result<()> {
        self.trainer.save_model(behavior_id)
    }

    fn export_model(&self, behavior_id: &str) -> Result<()> {
        self.trainer.export_model(behavior_id)
    }

    fn end_episode(&mut self) {
        self.trainer.end_episode();
    }

    fn publish_policy_queue(&mut self, queue: AgentManagerQueue<SharedPolicy>) {
        self.policy_queues.push(queue.clone());

        if self.learning_behavior_id.as_deref() == Some(queue.behavior_id()) {
            let internal = AgentManagerQueue::new(queue.behavior_id());
            self.trainer.publish_policy_queue(internal.clone());
            self.policy_relays.push((queue, internal));
        }
    }

    fn subscribe_trajectory_queue(&mut self, queue: AgentManagerQueue<Trajectory>) {
        let Some(learning) = self.learning_behavior_id.as_deref() else {
            // Without a learning behavior the queue's role is unknown; leave it untouched
            tracing::warn!("Ignoring trajectory queue {} subscribed before any policy", queue.behavior_id());
            return;
        };

        if learning == queue.behavior_id() {
            let internal = AgentManagerQueue::new(queue.behavior_id());
            self.trainer.subscribe_trajectory_queue(internal.clone());
            self.trajectory_relays.push((queue, internal));
        } else {
            self.ghost_trajectory_queues.push(queue);
        }
    }

    fn stats_reporter(&self) -> SharedStatsReporter {
        self.stats_reporter.clone()
    }
}
