//! Landing detection and scoring
//!
//! A landing needs three things at once: the ball's bottom inside a fixed band
//! just below a platform's top, the ball's centre over the platform, and the
//! ball falling. Platforms are tested in sequence order and the first match
//! wins, not the nearest one.
//!
//! The band does not scale with speed, so a fast enough ball can step clean
//! through it in one tick.

use glam::Vec2;

use super::state::{Ball, Platform};
use crate::consts::{LANDING_ACCURACY_BONUS, LANDING_BASE_POINTS};

/// Result of a landing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// Index into the platform sequence at the time of landing
    pub index: usize,
    /// 1 at dead centre, 0 at either edge
    pub accuracy: f32,
    pub points: u32,
}

/// Whether the ball is landing on this platform this tick
#[inline]
pub fn is_landing_on(ball: &Ball, platform: &Platform, tolerance: f32) -> bool {
    let bottom = ball.bottom();
    let in_band = bottom >= platform.y && bottom <= platform.y + tolerance;
    let over = ball.pos.x >= platform.x && ball.pos.x <= platform.right();
    let falling = ball.vel.y > 0.0;
    in_band && over && falling
}

/// First platform (in sequence order) the ball is landing on
pub fn find_landing(ball: &Ball, platforms: &[Platform], tolerance: f32) -> Option<usize> {
    platforms
        .iter()
        .position(|platform| is_landing_on(ball, platform, tolerance))
}

/// How close to the centre the ball came down.
///
/// Negative only if `x` lies outside the platform, which the containment test
/// in [`is_landing_on`] rules out.
pub fn landing_accuracy(x: f32, platform: &Platform) -> f32 {
    let half = platform.width / 2.0;
    let offset = x - platform.x;
    1.0 - (offset - half).abs() / half
}

/// Landing score, 10 at an edge up to 100 dead centre
pub fn points_for_accuracy(accuracy: f32) -> u32 {
    (LANDING_BASE_POINTS + accuracy * LANDING_ACCURACY_BONUS).round() as u32
}

/// Detect a landing and bring the ball to rest on top of the platform.
///
/// Returns immediately after the first hit so one tick never scores twice.
pub fn resolve_landing(ball: &mut Ball, platforms: &[Platform], tolerance: f32) -> Option<Landing> {
    let index = find_landing(ball, platforms, tolerance)?;
    let platform = &platforms[index];

    ball.pos.y = platform.y - ball.radius;
    ball.vel = Vec2::ZERO;

    let accuracy = landing_accuracy(ball.pos.x, platform);
    Some(Landing {
        index,
        accuracy,
        points: points_for_accuracy(accuracy),
    })
}
