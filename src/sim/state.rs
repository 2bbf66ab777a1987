//! Session state and core simulation types
//!
//! A [`Session`] is the explicit context every simulation operation runs
//! against. The render consumer reads it; only the simulation mutates it.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::charge::{LaunchEvent, Launcher};
use super::difficulty::{DifficultyTier, difficulty};
use super::platforms::Course;
use super::projectile;
use super::rng::{self, RandomSource};
use crate::consts::*;
use crate::persistence::SessionSummary;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No session started yet
    Menu,
    /// Active gameplay; the frame loop keeps running
    Playing,
    /// Paused by the player
    Paused,
    /// Run ended (fell through or left the screen)
    GameOver,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Ball dropped below the viewport
    FellThrough,
    /// Ball flew past the right edge
    LeftViewport,
}

/// Viewport size in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Skin colour (0xRRGGBB)
    pub color: u32,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, color: u32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            color,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// A platform (axis-aligned, top-left anchored)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Index into [`PLATFORM_COLORS`]
    pub color_index: usize,
}

impl Platform {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn color(&self) -> u32 {
        PLATFORM_COLORS[self.color_index % PLATFORM_COLORS.len()]
    }
}

/// A particle for visual effects (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: u32,
    /// 1 at spawn, removed at 0
    pub life: f32,
}

/// Events emitted by the simulation for persistence, analytics and UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    SessionStarted { viewport_width: f32, viewport_height: f32 },
    ChargeStarted,
    Launched { power: f32, vx: f32, vy: f32 },
    LaunchCancelled { power: f32 },
    Landed { points: u32, accuracy: f32, combo: u32, score: u64 },
    CoinsEarned { coins_delta: u32 },
    SessionEnded { reason: EndReason, summary: SessionSummary },
    Revived,
}

/// Snapshot for the debug overlay
#[derive(Debug, Clone, Serialize)]
pub struct DebugInfo {
    pub phase: SessionPhase,
    pub is_moving: bool,
    pub is_charging: bool,
    pub platform_count: u32,
    pub difficulty: f32,
    pub tier: DifficultyTier,
    pub velocity: Vec2,
}

/// One play-through and everything the simulation owns
pub struct Session<R: RandomSource = Pcg32> {
    pub phase: SessionPhase,
    pub viewport: Viewport,
    pub tuning: Tuning,
    /// None until the first session starts
    pub ball: Option<Ball>,
    pub course: Course,
    pub launcher: Launcher,
    pub particles: Vec<Particle>,
    pub score: u64,
    /// Successful landings this session; never reset mid-session, so it
    /// doubles as the platforms-cleared count
    pub combo: u32,
    pub time_ticks: u64,
    pub max_particles: usize,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) rng: R,
}

impl Session<Pcg32> {
    /// Session with default tuning and a seeded PCG source
    pub fn seeded(seed: u64) -> Self {
        Self::new(Tuning::default(), rng::seeded(seed))
    }
}

impl<R: RandomSource> Session<R> {
    pub fn new(tuning: Tuning, rng: R) -> Self {
        let launcher = Launcher::new(&tuning);
        Self {
            phase: SessionPhase::Menu,
            viewport: Viewport::new(0.0, 0.0),
            tuning,
            ball: None,
            course: Course::default(),
            launcher,
            particles: Vec::new(),
            score: 0,
            combo: 0,
            time_ticks: 0,
            max_particles: Settings::default().max_particles(),
            events: Vec::new(),
            rng,
        }
    }

    /// (Re)initialise ball, course and score and enter Playing
    pub fn start_session(&mut self, viewport_width: f32, viewport_height: f32, skin_color: u32) {
        let viewport = Viewport::new(viewport_width, viewport_height);
        self.viewport = viewport;
        self.score = 0;
        self.combo = 0;
        self.time_ticks = 0;
        self.particles.clear();
        self.launcher = Launcher::new(&self.tuning);

        let start = Vec2::new(BALL_START_X, viewport_height - BALL_START_RISE);
        self.ball = Some(Ball::new(start, self.tuning.ball_radius, skin_color));
        self.course = Course::seeded(viewport, &self.tuning, &mut self.rng);
        self.phase = SessionPhase::Playing;

        log::info!(
            "Session started: viewport {}x{}, {} platforms",
            viewport_width,
            viewport_height,
            self.course.platforms.len()
        );
        self.events.push(GameEvent::SessionStarted {
            viewport_width,
            viewport_height,
        });
    }

    /// Put the ball back above the launch pad without touching the course or
    /// score. Only valid after a game over.
    pub fn revive_session(&mut self) -> bool {
        if self.phase != SessionPhase::GameOver {
            log::debug!("Revive ignored in phase {:?}", self.phase);
            return false;
        }
        let (Some(ball), Some(pad)) = (self.ball.as_mut(), self.course.platforms.first()) else {
            return false;
        };

        ball.pos = Vec2::new(pad.center_x(), REVIVE_Y);
        self.launcher.handle(LaunchEvent::Reset, Some(ball), &self.tuning);
        self.phase = SessionPhase::Playing;

        log::info!("Session revived at score {}", self.score);
        self.events.push(GameEvent::Revived);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        self.phase = SessionPhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Playing;
        true
    }

    /// Terminal transition; the launcher keeps its Flying state
    pub(crate) fn end_session(&mut self, reason: EndReason) {
        self.phase = SessionPhase::GameOver;
        let summary = self.summary();
        log::info!(
            "Game over ({:?}): score {}, platforms {}, combo {}",
            reason,
            summary.score,
            summary.platforms_cleared,
            summary.combo
        );
        self.events.push(GameEvent::SessionEnded { reason, summary });
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.max_particles = settings.max_particles();
        self.particles.truncate(self.max_particles);
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.score,
            platforms_cleared: self.combo,
            combo: self.combo,
        }
    }

    pub fn ball_is_moving(&self) -> bool {
        self.launcher.is_flying()
    }

    pub fn is_charging(&self) -> bool {
        self.launcher.is_charging()
    }

    pub fn power(&self) -> f32 {
        self.launcher.power()
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Dotted preview of the current charge, empty unless charging
    pub fn trajectory_preview(&self, settings: &Settings) -> Vec<Vec2> {
        let steps = settings.trajectory_steps();
        match (&self.ball, self.is_charging() && steps > 0) {
            (Some(ball), true) => projectile::predict_trajectory(
                ball.pos,
                self.power(),
                &self.tuning,
                steps,
                self.viewport.height,
            ),
            _ => Vec::new(),
        }
    }

    pub fn debug_info(&self) -> DebugInfo {
        let platform_count = self.course.generated();
        let d = difficulty(platform_count);
        DebugInfo {
            phase: self.phase,
            is_moving: self.ball_is_moving(),
            is_charging: self.is_charging(),
            platform_count,
            difficulty: d,
            tier: DifficultyTier::from_difficulty(d),
            velocity: self.ball.as_ref().map(|b| b.vel).unwrap_or(Vec2::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedSource;

    #[test]
    fn test_start_session_layout() {
        let mut session = Session::new(Tuning::default(), ScriptedSource::constant(0.5));
        session.start_session(800.0, 600.0, 0x123456);

        assert_eq!(session.phase, SessionPhase::Playing);
        let ball = session.ball.as_ref().unwrap();
        assert_eq!(ball.pos, Vec2::new(100.0, 450.0));
        assert_eq!(ball.color, 0x123456);
        assert!(!session.ball_is_moving());
        assert!(!session.is_charging());

        let pad = &session.course.platforms[0];
        assert_eq!((pad.x, pad.y, pad.width), (50.0, 500.0, 135.0));
        assert_eq!(session.course.platforms.len(), 11);
        assert_eq!(session.course.generated(), 11);
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::SessionStarted {
                viewport_width: 800.0,
                viewport_height: 600.0
            }]
        );
    }

    #[test]
    fn test_restart_resets_counters() {
        let mut session = Session::seeded(3);
        session.start_session(800.0, 600.0, DEFAULT_SKIN_COLOR);
        session.score = 500;
        session.combo = 4;
        session.start_session(800.0, 600.0, DEFAULT_SKIN_COLOR);
        assert_eq!(session.score, 0);
        assert_eq!(session.combo, 0);
        assert_eq!(session.course.generated(), 11);
    }

    #[test]
    fn test_revive_only_after_game_over() {
        let mut session = Session::seeded(5);
        assert!(!session.revive_session());
        session.start_session(800.0, 600.0, DEFAULT_SKIN_COLOR);
        assert!(!session.revive_session());

        session.score = 120;
        session.end_session(EndReason::FellThrough);
        assert_eq!(session.phase, SessionPhase::GameOver);
        let platforms_before = session.course.platforms.clone();

        assert!(session.revive_session());
        assert_eq!(session.phase, SessionPhase::Playing);
        assert_eq!(session.score, 120);
        assert_eq!(session.course.platforms, platforms_before);
        let ball = session.ball.as_ref().unwrap();
        assert_eq!(ball.pos, Vec2::new(50.0 + 135.0 / 2.0, REVIVE_Y));
        assert_eq!(ball.vel, Vec2::ZERO);
        assert!(!session.ball_is_moving());
    }

    #[test]
    fn test_pause_resume() {
        let mut session = Session::seeded(9);
        assert!(!session.pause());
        session.start_session(640.0, 480.0, DEFAULT_SKIN_COLOR);
        assert!(session.pause());
        assert_eq!(session.phase, SessionPhase::Paused);
        assert!(!session.pause());
        assert!(session.resume());
        assert_eq!(session.phase, SessionPhase::Playing);
    }
}
