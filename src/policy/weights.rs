//! Weight bundles: value-type snapshots of a policy's learnable parameters

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One named parameter tensor, flattened row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLayer {
    /// Parameter name (e.g. `shared.fc1.weight`)
    pub name: String,
    /// Tensor shape
    pub shape: Vec<usize>,
    /// Flattened values
    pub values: Vec<f32>,
}

impl NamedLayer {
    /// Create a new layer
    pub fn new(name: impl Into<String>, shape: Vec<usize>, values: Vec<f32>) -> Self {
        Self { name: name.into(), shape, values }
    }

    /// Number of elements implied by the shape
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}

/// Snapshot of all learnable parameters of one policy at one point in time
///
/// Bundles are plain values: cloning one deep-copies its parameters, so a
/// pool slot never aliases the parameters a live policy is still training.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightBundle {
    layers: Vec<NamedLayer>,
}

impl WeightBundle {
    /// Create an empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bundle from layers
    pub fn from_layers(layers: Vec<NamedLayer>) -> Self {
        Self { layers }
    }

    /// Append a layer (builder style)
    pub fn with_layer(mut self, name: impl Into<String>, shape: Vec<usize>, values: Vec<f32>) -> Self {
        self.layers.push(NamedLayer::new(name, shape, values));
        self
    }

    /// All layers in insertion order
    pub fn layers(&self) -> &[NamedLayer] {
        &self.layers
    }

    /// Look up a layer by name
    pub fn layer(&self, name: &str) -> Option<&NamedLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Total number of scalar parameters
    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(|l| l.values.len()).sum()
    }

    /// Whether the bundle holds no layers
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Write the bundle as pretty-printed JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(
            File::create(path).with_context(|| format!("failed to create weight file {}", path.display()))?,
        );
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a bundle written by [`WeightBundle::save_json`]
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader =
            BufReader::new(File::open(path).with_context(|| format!("failed to open weight file {}", path.display()))?);
        serde_json::from_reader(reader).with_context(|| format!("malformed weight file {}", path.display()))
    }

    /// Write the bundle in bincode (requires the "training" feature)
    #[cfg(feature = "training")]
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(
            File::create(path).with_context(|| format!("failed to create weight file {}", path.display()))?,
        );
        bincode::serialize_into(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a bundle written by [`WeightBundle::save_bincode`]
    #[cfg(feature = "training")]
    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader =
            BufReader::new(File::open(path).with_context(|| format!("failed to open weight file {}", path.display()))?);
        bincode::deserialize_from(reader).with_context(|| format!("malformed weight file {}", path.display()))
    }
}
