//! Weight capture and restore for tch-rs parameter stores
//!
//! Lets a libtorch-backed policy take part in self-play: its `VarStore` is
//! flattened into a [`WeightBundle`] on the CPU and copied back in place.

use anyhow::Result;
use tch::{nn, Device, Kind, Tensor};

use super::{weights::{NamedLayer, WeightBundle}, Policy};
use crate::error::GhostError;

/// Copy every variable of `vs` into a bundle, ordered by name
pub fn capture_var_store(vs: &nn::VarStore) -> Result<WeightBundle> {
    let mut variables: Vec<(String, Tensor)> = vs.variables().into_iter().collect();
    variables.sort_by(|a, b| a.0.cmp(&b.0));

    let mut layers = Vec::with_capacity(variables.len());
    for (name, tensor) in variables {
        let shape: Vec<usize> = tensor.size().iter().map(|&d| d as usize).collect();

        // Move to CPU as contiguous f32 before flattening
        let flat = tensor.to_device(Device::Cpu).to_kind(Kind::Float).contiguous().view([-1]);
        let values = Vec::<f32>::try_from(&flat)?;

        layers.push(NamedLayer::new(name, shape, values));
    }

    Ok(WeightBundle::from_layers(layers))
}

/// Copy `weights` into the matching variables of `vs`
///
/// Every layer in the bundle must name an existing variable of the same
/// shape. Variables absent from the bundle are left untouched.
pub fn restore_var_store(vs: &nn::VarStore, weights: &WeightBundle) -> Result<()> {
    let variables = vs.variables();

    tch::no_grad(|| -> Result<()> {
        for layer in weights.layers() {
            let target = variables.get(&layer.name).ok_or_else(|| GhostError::WeightMismatch {
                name: layer.name.clone(),
                reason: "no such variable".to_string(),
            })?;

            let shape: Vec<i64> = layer.shape.iter().map(|&d| d as i64).collect();
            if target.size() != shape {
                return Err(GhostError::WeightMismatch {
                    name: layer.name.clone(),
                    reason: format!("expected shape {:?}, got {:?}", target.size(), shape),
                }
                .into());
            }

            let source = Tensor::from_slice(&layer.values)
                .view(shape.as_slice())
                .to_kind(target.kind())
                .to_device(target.device());

            let mut target = target.shallow_clone();
            target.copy_(&source);
        }
        Ok(())
    })
}

/// Policy backed by a tch `VarStore`
pub struct VarStorePolicy {
    behavior_id: String,
    vs: nn::VarStore,
}

impl VarStorePolicy {
    /// Wrap an existing parameter store
    pub fn new(behavior_id: impl Into<String>, vs: nn::VarStore) -> Self {
        Self { behavior_id: behavior_id.into(), vs }
    }

    /// Access the underlying parameter store
    pub fn var_store(&self) -> &nn::VarStore {
        &self.vs
    }
}

impl Policy for VarStorePolicy {
    fn behavior_id(&self) -> &str {
        &self.behavior_id
    }

    fn get_weights(&self) -> Result<WeightBundle> {
        capture_var_store(&self.vs)
    }

    fn set_weights(&mut self, weights: &WeightBundle) -> Result<()> {
        restore_var_store(&self.vs, weights)
    }
}
