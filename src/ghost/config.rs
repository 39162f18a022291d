//! Self-play configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::GhostError;

/// Ghost trainer configuration
///
/// Field names match the `self_play` section of a trainer config file:
///
/// ```json
/// { "window": 10, "current_prob": 0.5, "snapshot_per": 20000 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostConfig {
    /// Number of past snapshots kept as opponents
    pub window: usize,

    /// Probability of fielding the live policy instead of a pool snapshot
    pub current_prob: f64,

    /// Trainer steps between snapshots
    pub snapshot_per: usize,

    /// Elo K-factor
    pub elo_k: f64,

    /// Starting rating for the learning policy and every pool slot
    pub initial_elo: f64,

    /// Seed for opponent sampling (entropy when unset)
    pub seed: Option<u64>,
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            window: 10,
            current_prob: 0.5,
            snapshot_per: 20_000,
            elo_k: 1.0,
            initial_elo: 1200.0,
            seed: None,
        }
    }
}

impl GhostConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set opponent pool size
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set probability of playing the live policy
    pub fn current_prob(mut self, prob: f64) -> Self {
        self.current_prob = prob;
        self
    }

    /// Set steps between snapshots
    pub fn snapshot_per(mut self, steps: usize) -> Self {
        self.snapshot_per = steps;
        self
    }

    /// Set Elo K-factor
    pub fn elo_k(mut self, k: f64) -> Self {
        self.elo_k = k;
        self
    }

    /// Set initial rating
    pub fn initial_elo(mut self, elo: f64) -> Self {
        self.initial_elo = elo;
        self
    }

    /// Set sampling seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse a config from JSON; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GhostConfig = serde_json::from_str(json)
            .map_err(|e| GhostError::InvalidConfig(format!("failed to parse self-play config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read self-play config {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(GhostError::InvalidConfig("window must be > 0".into()).into());
        }
        if !(0.0..=1.0).contains(&self.current_prob) {
            return Err(GhostError::InvalidConfig("current_prob must be in [0, 1]".into()).into());
        }
        if self.snapshot_per == 0 {
            return Err(GhostError::InvalidConfig("snapshot_per must be > 0".into()).into());
        }
        if !self.elo_k.is_finite() || self.elo_k <= 0.0 {
            return Err(GhostError::InvalidConfig("elo_k must be a positive number".into()).into());
        }
        if !self.initial_elo.is_finite() {
            return Err(GhostError::InvalidConfig("initial_elo must be finite".into()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn invalid(config: GhostConfig) -> bool {
        matches!(
            config.validate().unwrap_err().downcast_ref::<GhostError>(),
            Some(GhostError::InvalidConfig(_))
        )
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = GhostConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.window, 10);
        assert_eq!(config.elo_k, 1.0);
        assert_eq!(config.initial_elo, 1200.0);
    }

    #[test]
    fn test_builder() {
        let config = GhostConfig::new().window(5).current_prob(0.2).snapshot_per(100).seed(7);

        assert_eq!(config.window, 5);
        assert_eq!(config.current_prob, 0.2);
        assert_eq!(config.snapshot_per, 100);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_rejects_zero_window() {
        assert!(invalid(GhostConfig::new().window(0)));
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        assert!(invalid(GhostConfig::new().current_prob(1.5)));
        assert!(invalid(GhostConfig::new().current_prob(-0.1)));
        assert!(invalid(GhostConfig::new().current_prob(f64::NAN)));
    }

    #[test]
    fn test_accepts_probability_bounds() {
        assert!(GhostConfig::new().current_prob(0.0).validate().is_ok());
        assert!(GhostConfig::new().current_prob(1.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_cadence() {
        assert!(invalid(GhostConfig::new().snapshot_per(0)));
    }

    #[test]
    fn test_rejects_bad_k() {
        assert!(invalid(GhostConfig::new().elo_k(0.0)));
        assert!(invalid(GhostConfig::new().elo_k(f64::INFINITY)));
    }

    #[test]
    fn test_partial_json_uses_defaults() -> Result<()> {
        let config = GhostConfig::from_json_str(r#"{ "window": 3, "snapshot_per": 50 }"#)?;

        assert_eq!(config.window, 3);
        assert_eq!(config.snapshot_per, 50);
        assert_eq!(config.current_prob, 0.5);

        Ok(())
    }

    #[test]
    fn test_json_errors_are_invalid_config() {
        let invalid = |json: &str| match GhostConfig::from_json_str(json) {
            Ok(_) => false,
            Err(e) => matches!(e.downcast_ref::<GhostError>(), Some(GhostError::InvalidConfig(_))),
        };

        assert!(invalid(r#"{ "current_prob": 2.0 }"#));
        assert!(invalid(r#"{ "window": -1 }"#));
        assert!(invalid(r#"{ "snapshot_per": "often" }"#));
        assert!(invalid("not json"));
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("self_play.json");
        let mut f = std::fs::File::create(&path)?;
        writeln!(f, r#"{{ "window": 4, "current_prob": 0.1, "snapshot_per": 1000 }}"#)?;

        let config = GhostConfig::from_json_file(&path)?;
        assert_eq!(config.window, 4);
        assert_eq!(config.current_prob, 0.1);

        Ok(())
    }
}
