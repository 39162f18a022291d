//! Self-play ("ghost") training
//!
//! The learning policy plays against frozen snapshots of itself.
//!
//! # Architecture
//!
//! - **EloTracker**: rating of the learning policy and of every pool slot
//! - **SnapshotPool**: ring buffer of past weights, one slot per rating
//! - **OpponentScheduler**: picks a pool snapshot or the live weights for
//!   each ghost behavior
//! - **GhostTrainer**: relays queues around a wrapped [`Trainer`] and drives
//!   the three components above
//!
//! ```text
//!  env trajectories ──► GhostTrainer ──► internal queue ──► wrapped trainer
//!                          │  └─ Elo update on terminal episodes
//!  env policies    ◄── GhostTrainer ◄── internal queue ◄── wrapped trainer
//!                          └─ every `snapshot_per` steps:
//!                             pool.insert(live) + scheduler.reassign(ghosts)
//! ```
//!
//! [`Trainer`]: crate::trainer::Trainer

pub mod config;
pub mod controller;
pub mod elo;
pub mod scheduler;
pub mod snapshot;

pub use config::GhostConfig;
pub use controller::GhostTrainer;
pub use elo::{compute_elo_rating_change, EloTracker, GameResult};
pub use scheduler::{Assignment, OpponentScheduler, OpponentTag};
pub use snapshot::SnapshotPool;
