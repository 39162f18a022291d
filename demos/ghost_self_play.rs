//! Self-play demo on a toy duel
//!
//! A "skill" scalar stands in for a network. The wrapped trainer nudges the
//! learning policy's skill up every few hundred steps; each duel is won with
//! probability sigmoid(learner - ghost). Watch the Elo climb while the ghost
//! is swapped between old snapshots and the live policy.
//!
//! Run with: cargo run --example ghost_self_play

use std::sync::Arc;

use anyhow::{bail, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use thrust_ghost::{
    policy::{read_weights, shared_policy, write_weights},
    prelude::*,
    stats::{SharedStatsReporter, TracingStatsReporter},
};

const LEARNER: &str = "Blue";
const GHOST: &str = "Purple";
const STEPS_PER_UPDATE: usize = 400;

fn skill_bundle(skill: f32) -> WeightBundle {
    WeightBundle::new().with_layer("skill", vec![1], vec![skill])
}

fn skill_of(policy: &SharedPolicy) -> Result<f32> {
    let weights = read_weights(policy)?;
    match weights.layer("skill") {
        Some(layer) => Ok(layer.values[0]),
        None => bail!("policy has no skill parameter"),
    }
}

/// Trainer that raises skill by a fixed amount per update
struct HillClimbTrainer {
    policy: Option<SharedPolicy>,
    policy_queues: Vec<AgentManagerQueue<SharedPolicy>>,
    trajectory_queues: Vec<AgentManagerQueue<Trajectory>>,
    step: usize,
    next_update_step: usize,
    stats: SharedStatsReporter,
}

impl HillClimbTrainer {
    fn new() -> Self {
        Self {
            policy: None,
            policy_queues: Vec::new(),
            trajectory_queues: Vec::new(),
            step: 0,
            next_update_step: STEPS_PER_UPDATE,
            stats: Arc::new(TracingStatsReporter),
        }
    }
}

impl Trainer for HillClimbTrainer {
    fn advance(&mut self) -> Result<()> {
        for queue in &self.trajectory_queues {
            while let Some(trajectory) = queue.try_get() {
                self.step += trajectory.len();
            }
        }

        if self.step >= self.next_update_step {
            if let Some(policy) = &self.policy {
                let skill = skill_of(policy)?;
                write_weights(policy, &skill_bundle(skill + 0.05))?;
                for queue in &self.policy_queues {
                    queue.put(policy.clone());
                }
            }
            self.next_update_step += STEPS_PER_UPDATE;
        }
        Ok(())
    }

    fn get_step(&self) -> usize {
        self.step
    }

    fn next_update_step(&self) -> usize {
        self.next_update_step
    }

    fn create_policy(&mut self, spec: &PolicySpec) -> Result<SharedPolicy> {
        Ok(shared_policy(ParameterPolicy::new(spec.behavior_id.clone(), skill_bundle(0.0))))
    }

    fn add_policy(&mut self, _behavior_id: &str, policy: SharedPolicy) -> Result<()> {
        self.policy = Some(policy);
        Ok(())
    }

    fn get_policy(&self, behavior_id: &str) -> Result<SharedPolicy> {
        match &self.policy {
            Some(policy) => Ok(policy.clone()),
            None => bail!("no policy for {behavior_id}"),
        }
    }

    fn policy(&self) -> Option<SharedPolicy> {
        self.policy.clone()
    }

    fn save_model(&self, behavior_id: &str) -> Result<()> {
        tracing::info!("save_model({behavior_id}) is a no-op in this demo");
        Ok(())
    }

    fn export_model(&self, behavior_id: &str) -> Result<()> {
        tracing::info!("export_model({behavior_id}) is a no-op in this demo");
        Ok(())
    }

    fn end_episode(&mut self) {}

    fn publish_policy_queue(&mut self, queue: AgentManagerQueue<SharedPolicy>) {
        self.policy_queues.push(queue);
    }

    fn subscribe_trajectory_queue(&mut self, queue: AgentManagerQueue<Trajectory>) {
        self.trajectory_queues.push(queue);
    }

    fn stats_reporter(&self) -> SharedStatsReporter {
        self.stats.clone()
    }
}

/// Play one duel and return the learner's trajectory
fn play_duel(rng: &mut StdRng, learner_skill: f32, ghost_skill: f32) -> Trajectory {
    let p_win = 1.0 / (1.0 + (-(learner_skill - ghost_skill) * 4.0).exp());
    let length = rng.gen_range(5..40);
    let max_step = length >= 35;
    let reward = if rng.gen::<f32>() < p_win { 1.0 } else { -1.0 };

    let mut steps: Vec<AgentExperience> = (0..length - 1)
        .map(|_| AgentExperience::new(vec![learner_skill, ghost_skill], rng.gen_range(0..3), 0.0, false, false))
        .collect();
    steps.push(AgentExperience::new(vec![learner_skill, ghost_skill], 0, reward, true, max_step));

    Trajectory::new(LEARNER, 0, steps)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = GhostConfig::new().window(5).current_prob(0.2).snapshot_per(2_000).seed(7);
    let mut ghost = GhostTrainer::new(Box::new(HillClimbTrainer::new()), config)?;

    let learner_policy = ghost.create_policy(&PolicySpec::new(LEARNER, 2, 3, 1))?;
    let ghost_policy = ghost.create_policy(&PolicySpec::new(GHOST, 2, 3, 1))?;
    ghost.add_policy(LEARNER, learner_policy)?;
    ghost.add_policy(GHOST, ghost_policy)?;

    let learner_policies = AgentManagerQueue::new(LEARNER);
    let ghost_policies = AgentManagerQueue::new(GHOST);
    let learner_trajectories = AgentManagerQueue::new(LEARNER);
    ghost.publish_policy_queue(learner_policies.clone());
    ghost.publish_policy_queue(ghost_policies.clone());
    ghost.subscribe_trajectory_queue(learner_trajectories.clone());

    // Environment side: the skills the workers currently play with
    let mut learner_skill = 0.0;
    let mut ghost_skill = 0.0;
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..2_000 {
        while let Some(policy) = learner_policies.try_get() {
            learner_skill = skill_of(&policy)?;
        }
        while let Some(policy) = ghost_policies.try_get() {
            ghost_skill = skill_of(&policy)?;
        }

        learner_trajectories.put(play_duel(&mut rng, learner_skill, ghost_skill));
        ghost.end_episode();
        ghost.advance()?;
    }

    let opponents = ghost.opponent_elos();
    tracing::info!(
        "Finished at step {} | learner skill {:.2} | ELO {:.2} | pool ELOs {:?}",
        ghost.get_step(),
        learner_skill,
        ghost.current_elo(),
        opponents
    );
    ghost.save_model(LEARNER)?;

    Ok(())
}
