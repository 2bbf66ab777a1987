//! Demo-mode player
//!
//! Holds the charge until the current meter power is predicted to come down
//! near the middle of the next platform ahead, then lets go.

use super::collision::Landing;
use super::projectile::predict_landing;
use super::rng::RandomSource;
use super::state::{Ball, Platform, Session};

/// Minimum predicted accuracy before releasing
pub const RELEASE_ACCURACY: f32 = 0.5;
/// Prediction horizon in ticks
pub const PREDICTION_TICKS: usize = 600;

/// What the autopilot wants to do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Wait,
    StartCharge,
    Release,
}

/// Index of the first platform starting to the right of the ball
pub fn target_platform(ball: &Ball, platforms: &[Platform]) -> Option<usize> {
    platforms.iter().position(|p| p.x > ball.pos.x)
}

/// Predicted landing for the current meter power, if it is a good one
pub fn good_release<R: RandomSource>(session: &Session<R>) -> Option<Landing> {
    let ball = session.ball.as_ref()?;
    let power = session.power();
    if power < session.tuning.min_launch_power {
        return None;
    }

    let platforms = &session.course.platforms;
    let target = target_platform(ball, platforms)?;
    let landing = predict_landing(
        ball,
        power,
        platforms,
        session.viewport,
        &session.tuning,
        PREDICTION_TICKS,
    )?;

    (landing.index == target && landing.accuracy >= RELEASE_ACCURACY).then_some(landing)
}

pub fn decide<R: RandomSource>(session: &Session<R>) -> Decision {
    let Some(ball) = session.ball.as_ref() else {
        return Decision::Wait;
    };
    if session.is_charging() {
        if good_release(session).is_some() {
            Decision::Release
        } else {
            Decision::Wait
        }
    } else if !session.ball_is_moving() && ball.vel == glam::Vec2::ZERO {
        Decision::StartCharge
    } else {
        Decision::Wait
    }
}
