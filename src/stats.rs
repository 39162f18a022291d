//! Telemetry sinks
//!
//! Trainers report named scalars through a [`StatsReporter`]. The ghost
//! trainer writes into the reporter of the trainer it wraps, so self-play
//! ratings land next to the wrapped trainer's own statistics.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Sink for named scalar statistics
pub trait StatsReporter: Send + Sync {
    /// Record one value for `key`
    fn add_stat(&self, key: &str, value: f32);
}

/// Reporter handle shared between a trainer and its wrappers
pub type SharedStatsReporter = Arc<dyn StatsReporter>;

/// In-memory reporter that keeps every value it receives
#[derive(Debug, Default)]
pub struct StatsRecorder {
    values: Mutex<HashMap<String, Vec<f32>>>,
}

impl StatsRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// All values recorded for `key`, oldest first
    pub fn values(&self, key: &str) -> Vec<f32> {
        self.values
            .lock()
            .map(|values| values.get(key).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Most recent value for `key`
    pub fn latest(&self, key: &str) -> Option<f32> {
        self.values(key).last().copied()
    }
}

impl StatsReporter for StatsRecorder {
    fn add_stat(&self, key: &str, value: f32) {
        if let Ok(mut values) = self.values.lock() {
            values.entry(key.to_string()).or_default().push(value);
        }
    }
}

/// Reporter that forwards every value to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStatsReporter;

impl StatsReporter for TracingStatsReporter {
    fn add_stat(&self, key: &str, value: f32) {
        tracing::debug!(key, value, "stat");
    }
}

/// Mean and population standard deviation of a set of values
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatsSummary {
    /// Arithmetic mean
    pub mean: f64,

    /// Standard deviation (population, ddof = 0)
    pub std: f64,
}

impl StatsSummary {
    /// Summarize `values`; an empty slice yields zeros
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Self { mean, std: variance.sqrt() }
    }
}
