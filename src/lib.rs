//! Bounce Ball - A charge-and-release platform hopping game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (launch physics, landings, camera, course generation)
//! - `platform`: Frame loop driving the simulation from a host scheduler
//! - `persistence`: Coins, best score and high score bookkeeping
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use persistence::{PersistenceSink, ProgressStore, SessionSummary};
pub use settings::{QualityPreset, Settings};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Downward acceleration added to vy every tick
    pub const GRAVITY: f32 = 0.4;

    /// Power meter base speed (velocity after a bounce off either bound)
    pub const POWER_SPEED: f32 = 0.5;
    /// Power meter acceleration per tick
    pub const POWER_ACCELERATION: f32 = 0.02;
    /// Meter velocity is clamped to +/- this
    pub const POWER_VELOCITY_LIMIT: f32 = 3.0;
    pub const MAX_POWER: f32 = 100.0;
    /// Releases below this power are cancelled
    pub const MIN_LAUNCH_POWER: f32 = 3.0;

    /// Launch direction (radians, screen space: negative is up)
    pub const LAUNCH_ANGLE: f32 = -std::f32::consts::FRAC_PI_4;
    /// Launch speed per unit of power
    pub const LAUNCH_SCALE: f32 = 0.4;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 15.0;
    pub const BALL_START_X: f32 = 100.0;
    /// Distance of the resting ball above the viewport bottom
    pub const BALL_START_RISE: f32 = 150.0;
    /// Height the ball is dropped back in at on revive
    pub const REVIVE_Y: f32 = 100.0;

    /// Platform defaults
    pub const PLATFORM_WIDTH: f32 = 90.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const LAUNCH_PAD_X: f32 = 50.0;
    pub const LAUNCH_PAD_WIDTH_FACTOR: f32 = 1.5;
    pub const FIRST_PLATFORM_X: f32 = 200.0;
    pub const INITIAL_PLATFORMS: u32 = 10;
    pub const MIN_PLATFORM_GAP: f32 = 100.0;
    pub const MAX_PLATFORM_GAP: f32 = 180.0;
    pub const MIN_HEIGHT_CHANGE: f32 = 20.0;
    pub const MAX_HEIGHT_CHANGE: f32 = 80.0;
    /// Highest a platform may sit (smallest y)
    pub const PLATFORM_MIN_Y: f32 = 150.0;
    /// Lowest a platform may sit, measured up from the viewport bottom
    pub const PLATFORM_BOTTOM_MARGIN: f32 = 100.0;

    /// Depth below a platform top that still counts as a landing
    pub const LANDING_TOLERANCE: f32 = 25.0;
    /// New platforms are generated while the last one is left of width + this
    pub const GENERATION_LOOKAHEAD: f32 = 100.0;
    /// Platforms whose right edge is left of -this are culled
    pub const CULL_MARGIN: f32 = 100.0;

    /// Landing score: BASE + accuracy * ACCURACY_BONUS
    pub const LANDING_BASE_POINTS: f32 = 10.0;
    pub const LANDING_ACCURACY_BONUS: f32 = 90.0;
    /// Score per coin earned
    pub const POINTS_PER_COIN: u64 = 10;

    /// Landing particle burst
    pub const LANDING_PARTICLES: usize = 10;
    pub const PARTICLE_GRAVITY: f32 = 0.2;
    pub const PARTICLE_DECAY: f32 = 0.02;

    /// Trajectory preview
    pub const TRAJECTORY_STEPS: usize = 50;
    pub const TRAJECTORY_CUTOFF: f32 = 50.0;

    /// Platform palette (0xRRGGBB)
    pub const PLATFORM_COLORS: [u32; 5] = [0xff6b6b, 0x4ecdc4, 0xffe66d, 0x95e1d3, 0xf38181];
    /// Default ball skin colour
    pub const DEFAULT_SKIN_COLOR: u32 = 0xff6b6b;
}

/// Launch velocity for a given meter power
#[inline]
pub fn launch_velocity(power: f32, angle: f32, scale: f32) -> glam::Vec2 {
    let speed = power * scale;
    glam::Vec2::new(angle.cos() * speed, angle.sin() * speed)
}
