//! Error conditions a caller of the ghost trainer may need to tell apart.
//!
//! Fallible operations return [`anyhow::Result`]; these variants travel inside
//! the `anyhow::Error` and can be recovered with `downcast_ref::<GhostError>()`.

use thiserror::Error;

/// Self-play controller errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GhostError {
    /// No policy was ever registered under this behavior identity
    #[error("no policy registered for behavior '{0}'")]
    UnknownBehavior(String),

    /// Construction-time configuration is out of range
    #[error("invalid self-play configuration: {0}")]
    InvalidConfig(String),

    /// A snapshot was requested before any learning policy existed
    #[error("no learning policy available to snapshot")]
    NoLearningPolicy,

    /// A weight bundle does not fit the parameter store it is applied to
    #[error("weight layer '{name}' does not match: {reason}")]
    WeightMismatch {
        /// Layer name
        name: String,
        /// What did not match
        reason: String,
    },
}
