//! Policies as seen by the self-play controller
//!
//! The controller never looks inside a model. It only needs to name a policy,
//! capture its parameters as a [`WeightBundle`] and push a bundle back in.

pub mod weights;

#[cfg(feature = "training")]
pub mod var_store;

use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};

use self::weights::WeightBundle;

/// Capability every trainable policy exposes to the ghost trainer
pub trait Policy: Send + Sync {
    /// Behavior identity this policy was created for
    fn behavior_id(&self) -> &str;

    /// Capture a copy of the current parameters
    fn get_weights(&self) -> Result<WeightBundle>;

    /// Overwrite the current parameters with `weights`
    fn set_weights(&mut self, weights: &WeightBundle) -> Result<()>;
}

/// Policy handle shared between trainers, queues and environment workers
pub type SharedPolicy = Arc<RwLock<dyn Policy>>;

/// Wrap a concrete policy into a [`SharedPolicy`]
pub fn shared_policy<P: Policy + 'static>(policy: P) -> SharedPolicy {
    Arc::new(RwLock::new(policy))
}

/// Capture the weights of a shared policy
pub fn read_weights(policy: &SharedPolicy) -> Result<WeightBundle> {
    let guard = policy.read().map_err(|_| anyhow!("policy lock poisoned"))?;
    guard.get_weights()
}

/// Overwrite the weights of a shared policy
pub fn write_weights(policy: &SharedPolicy, weights: &WeightBundle) -> Result<()> {
    let mut guard = policy.write().map_err(|_| anyhow!("policy lock poisoned"))?;
    guard.set_weights(weights)
}

/// Everything a trainer needs to build a fresh policy for one behavior
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySpec {
    /// Behavior identity
    pub behavior_id: String,

    /// Observation dimensionality
    pub obs_dim: usize,

    /// Number of discrete actions
    pub action_dim: usize,

    /// Hidden layer width
    pub hidden_dim: usize,
}

impl PolicySpec {
    /// Create a new spec
    pub fn new(behavior_id: impl Into<String>, obs_dim: usize, action_dim: usize, hidden_dim: usize) -> Self {
        Self { behavior_id: behavior_id.into(), obs_dim, action_dim, hidden_dim }
    }
}

/// Policy whose whole state is a weight bundle
///
/// Useful for scripted opponents, tests and trainers that keep their model
/// elsewhere and only publish parameters.
#[derive(Debug, Clone)]
pub struct ParameterPolicy {
    behavior_id: String,
    weights: WeightBundle,
}

impl ParameterPolicy {
    /// Create a new parameter policy
    pub fn new(behavior_id: impl Into<String>, weights: WeightBundle) -> Self {
        Self { behavior_id: behavior_id.into(), weights }
    }
}

impl Policy for ParameterPolicy {
    fn behavior_id(&self) -> &str {
        &self.behavior_id
    }

    fn get_weights(&self) -> Result<WeightBundle> {
        Ok(self.weights.clone())
    }

    fn set_weights(&mut self, weights: &WeightBundle) -> Result<()> {
        self.weights = weights.clone();
        Ok(())
    }
}
