//! Episode trajectories sent from environment workers to trainers

/// One agent step inside a trajectory
#[derive(Debug, Clone, PartialEq)]
pub struct AgentExperience {
    /// Observation vector
    pub observation: Vec<f32>,

    /// Action taken
    pub action: i64,

    /// Reward received
    pub reward: f32,

    /// Whether the episode ended at this step
    pub done: bool,

    /// Whether the episode was cut off by the step limit
    pub max_step: bool,
}

impl AgentExperience {
    /// Create a new experience
    pub fn new(observation: Vec<f32>, action: i64, reward: f32, done: bool, max_step: bool) -> Self {
        Self { observation, action, reward, done, max_step }
    }
}

/// Ordered run of experiences for a single agent of a single behavior
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Behavior identity that produced this trajectory
    pub behavior_id: String,

    /// Agent inside the environment
    pub agent_id: usize,

    /// Experiences in time order
    pub steps: Vec<AgentExperience>,
}

impl Trajectory {
    /// Create a new trajectory
    pub fn new(behavior_id: impl Into<String>, agent_id: usize, steps: Vec<AgentExperience>) -> Self {
        Self { behavior_id: behavior_id.into(), agent_id, steps }
    }

    /// Whether the last step ended the episode
    pub fn done_reached(&self) -> bool {
        self.steps.last().is_some_and(|s| s.done)
    }

    /// Whether the episode was truncated by the step limit
    pub fn max_step_reached(&self) -> bool {
        self.steps.last().is_some_and(|s| s.max_step)
    }

    /// Episode reached a real terminal state (not a step-limit cutoff)
    pub fn is_terminal(&self) -> bool {
        self.done_reached() && !self.max_step_reached()
    }

    /// Reward of the final step
    pub fn final_reward(&self) -> Option<f32> {
        self.steps.last().map(|s| s.reward)
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the trajectory has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
