//! Mock wrapped trainer shared by the integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use thrust_ghost::{
    policy::{read_weights, shared_policy, write_weights},
    prelude::*,
    stats::SharedStatsReporter,
};

/// Everything the mock trainer observed, shared with the test body
#[derive(Default)]
pub struct MockLog {
    pub received: Vec<Trajectory>,
    pub added_policies: Vec<String>,
    pub saved: Vec<String>,
    pub exported: Vec<String>,
    pub created: Vec<String>,
    pub episodes_ended: usize,
    pub advances: usize,
    pub published_queues: Vec<String>,
    pub subscribed_queues: Vec<String>,
}

/// Trainer that counts steps and "learns" by writing the step into its weights
pub struct MockTrainer {
    pub log: Arc<Mutex<MockLog>>,
    pub stats: Arc<StatsRecorder>,
    step: usize,
    steps_per_advance: usize,
    publish_updates: bool,
    fail_advance: bool,
    policy: Option<(String, SharedPolicy)>,
    policy_queues: Vec<AgentManagerQueue<SharedPolicy>>,
    trajectory_queues: Vec<AgentManagerQueue<Trajectory>>,
}

impl MockTrainer {
    pub fn new(steps_per_advance: usize) -> Self {
        Self {
            log: Arc::new(Mutex::new(MockLog::default())),
            stats: Arc::new(StatsRecorder::new()),
            step: 0,
            steps_per_advance,
            publish_updates: false,
            fail_advance: false,
            policy: None,
            policy_queues: Vec::new(),
            trajectory_queues: Vec::new(),
        }
    }

    /// Push an updated policy onto every published queue after each advance
    pub fn publishing(mut self) -> Self {
        self.publish_updates = true;
        self
    }

    /// Make `advance` return an error
    pub fn failing(mut self) -> Self {
        self.fail_advance = true;
        self
    }
}

impl Trainer for MockTrainer {
    fn advance(&mut self) -> Result<()> {
        if self.fail_advance {
            bail!("optimizer diverged");
        }

        let mut log = self.log.lock().unwrap();
        log.advances += 1;
        for queue in &self.trajectory_queues {
            while let Some(trajectory) = queue.try_get() {
                log.received.push(trajectory);
            }
        }
        self.step += self.steps_per_advance;

        if self.publish_updates {
            if let Some((_, policy)) = &self.policy {
                write_weights(policy, &weights(self.step as f32))?;
                for queue in &self.policy_queues {
                    queue.put(policy.clone());
                }
            }
        }
        Ok(())
    }

    fn get_step(&self) -> usize {
        self.step
    }

    fn next_update_step(&self) -> usize {
        self.step + self.steps_per_advance
    }

    fn create_policy(&mut self, spec: &PolicySpec) -> Result<SharedPolicy> {
        self.log.lock().unwrap().created.push(spec.behavior_id.clone());
        Ok(shared_policy(ParameterPolicy::new(spec.behavior_id.clone(), weights(0.0))))
    }

    fn add_policy(&mut self, behavior_id: &str, policy: SharedPolicy) -> Result<()> {
        self.log.lock().unwrap().added_policies.push(behavior_id.to_string());
        self.policy = Some((behavior_id.to_string(), policy));
        Ok(())
    }

    fn get_policy(&self, behavior_id: &str) -> Result<SharedPolicy> {
        match &self.policy {
            Some((id, policy)) if id == behavior_id => Ok(policy.clone()),
            _ => bail!("unknown behavior {behavior_id}"),
        }
    }

    fn policy(&self) -> Option<SharedPolicy> {
        self.policy.as_ref().map(|(_, policy)| policy.clone())
    }

    fn save_model(&self, behavior_id: &str) -> Result<()> {
        self.log.lock().unwrap().saved.push(behavior_id.to_string());
        Ok(())
    }

    fn export_model(&self, behavior_id: &str) -> Result<()> {
        self.log.lock().unwrap().exported.push(behavior_id.to_string());
        Ok(())
    }

    fn end_episode(&mut self) {
        self.log.lock().unwrap().episodes_ended += 1;
    }

    fn publish_policy_queue(&mut self, queue: AgentManagerQueue<SharedPolicy>) {
        self.log.lock().unwrap().published_queues.push(queue.behavior_id().to_string());
        self.policy_queues.push(queue);
    }

    fn subscribe_trajectory_queue(&mut self, queue: AgentManagerQueue<Trajectory>) {
        self.log.lock().unwrap().subscribed_queues.push(queue.behavior_id().to_string());
        self.trajectory_queues.push(queue);
    }

    fn stats_reporter(&self) -> SharedStatsReporter {
        self.stats.clone()
    }
}

/// Single-layer bundle holding `value`
pub fn weights(value: f32) -> WeightBundle {
    WeightBundle::new().with_layer("w", vec![1], vec![value])
}

/// Policy for `behavior_id` starting at `value`
pub fn policy(behavior_id: &str, value: f32) -> SharedPolicy {
    shared_policy(ParameterPolicy::new(behavior_id, weights(value)))
}

/// Weight value of a shared policy
pub fn value_of(policy: &SharedPolicy) -> f32 {
    read_weights(policy).unwrap().layer("w").unwrap().values[0]
}

/// One-step trajectory ending with `reward`
pub fn finished(behavior_id: &str, reward: f32, max_step: bool) -> Trajectory {
    Trajectory::new(
        behavior_id,
        0,
        vec![
            AgentExperience::new(vec![0.0; 2], 0, 0.0, false, false),
            AgentExperience::new(vec![0.0; 2], 1, reward, true, max_step),
        ],
    )
}
