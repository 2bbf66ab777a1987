//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Randomness only through [`RandomSource`]
//! - Platforms kept in generation order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod camera;
pub mod charge;
pub mod collision;
pub mod difficulty;
pub mod platforms;
pub mod projectile;
pub mod rng;
pub mod state;
pub mod tick;

pub use charge::{IgnoreReason, LaunchEvent, LaunchOutcome, LaunchState, Launcher, PowerMeter};
pub use collision::{Landing, resolve_landing};
pub use difficulty::{DifficultyTier, difficulty, gap_for_difficulty, height_change_for_difficulty};
pub use platforms::Course;
pub use projectile::{predict_landing, predict_trajectory, terminal_condition};
pub use rng::{RandomSource, ScriptedSource};
pub use state::{
    Ball, DebugInfo, EndReason, GameEvent, Particle, Platform, Session, SessionPhase, Viewport,
};
pub use tick::{TickInput, tick};
