//! Ballistic motion
//!
//! The step is tick-coupled: gravity is added to vy once per tick rather than
//! scaled by elapsed time, so the same tick sequence always yields the same
//! path. Prediction replays the exact same step.

use glam::Vec2;

use super::collision::{self, Landing};
use super::state::{Ball, EndReason, Platform, Viewport};
use crate::launch_velocity;
use crate::tuning::Tuning;

/// Advance the ball one tick: gravity first, then position
#[inline]
pub fn step(ball: &mut Ball, gravity: f32) {
    ball.vel.y += gravity;
    ball.pos += ball.vel;
}

/// Same as [`step`] on bare vectors, for previews
#[inline]
fn step_point(pos: &mut Vec2, vel: &mut Vec2, gravity: f32) {
    vel.y += gravity;
    *pos += *vel;
}

/// Whether the ball has left the playable area for good
pub fn terminal_condition(ball: &Ball, viewport: Viewport) -> Option<EndReason> {
    if ball.pos.y - ball.radius > viewport.height {
        Some(EndReason::FellThrough)
    } else if ball.pos.x - ball.radius > viewport.width {
        Some(EndReason::LeftViewport)
    } else {
        None
    }
}

/// Points a ball launched from `origin` with `power` will pass through.
///
/// Starts with `origin` and stops after `steps` points or once a point drops
/// more than the cutoff below the viewport.
pub fn predict_trajectory(
    origin: Vec2,
    power: f32,
    tuning: &Tuning,
    steps: usize,
    viewport_height: f32,
) -> Vec<Vec2> {
    let mut pos = origin;
    let mut vel = launch_velocity(power, tuning.launch_angle, tuning.launch_scale);
    let mut points = Vec::with_capacity(steps + 1);
    points.push(pos);

    for _ in 0..steps {
        step_point(&mut pos, &mut vel, tuning.gravity);
        points.push(pos);
        if pos.y > viewport_height + crate::consts::TRAJECTORY_CUTOFF {
            break;
        }
    }
    points
}

/// Where a launch with `power` would come to rest, if anywhere.
///
/// Runs step, landing test and terminal test in the same order as a tick.
/// Platforms generated mid-flight are not considered.
pub fn predict_landing(
    ball: &Ball,
    power: f32,
    platforms: &[Platform],
    viewport: Viewport,
    tuning: &Tuning,
    max_ticks: usize,
) -> Option<Landing> {
    let mut ghost = ball.clone();
    ghost.vel = launch_velocity(power, tuning.launch_angle, tuning.launch_scale);

    for _ in 0..max_ticks {
        step(&mut ghost, tuning.gravity);
        let landing = collision::resolve_landing(&mut ghost, platforms, tuning.landing_tolerance);
        if landing.is_some() {
            return landing;
        }
        if terminal_condition(&ghost, viewport).is_some() {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_applies_gravity_first() {
        let mut ball = Ball::new(Vec2::new(0.0, 0.0), 15.0, 0);
        ball.vel = Vec2::new(2.0, -1.0);
        step(&mut ball, 0.4);
        assert!((ball.vel.y + 0.6).abs() < 1e-6);
        assert!((ball.pos.x - 2.0).abs() < 1e-6);
        assert!((ball.pos.y + 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_terminal_conditions() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut ball = Ball::new(Vec2::new(400.0, 300.0), 15.0, 0);
        assert_eq!(terminal_condition(&ball, viewport), None);

        // Only fully below the bottom edge counts
        ball.pos.y = 610.0;
        assert_eq!(terminal_condition(&ball, viewport), None);
        ball.pos.y = 616.0;
        assert_eq!(terminal_condition(&ball, viewport), Some(EndReason::FellThrough));

        ball.pos = Vec2::new(816.0, 300.0);
        assert_eq!(terminal_condition(&ball, viewport), Some(EndReason::LeftViewport));
    }

    #[test]
    fn test_trajectory_matches_simulation() {
        let tuning = Tuning::default();
        let origin = Vec2::new(100.0, 450.0);
        let preview = predict_trajectory(origin, 37.5, &tuning, 50, 600.0);

        let mut ball = Ball::new(origin, 15.0, 0);
        ball.vel = launch_velocity(37.5, tuning.launch_angle, tuning.launch_scale);
        assert_eq!(preview[0], origin);
        for point in preview.iter().skip(1) {
            step(&mut ball, tuning.gravity);
            assert_eq!(ball.pos, *point);
        }
    }

    #[test]
    fn test_trajectory_stops_below_cutoff() {
        let tuning = Tuning::default();
        let preview = predict_trajectory(Vec2::new(0.0, 640.0), 10.0, &tuning, 50, 600.0);
        assert!(preview.len() < 51);
        assert!(preview.last().unwrap().y > 650.0);
    }

    #[test]
    fn test_predict_landing_hits_flat_platform() {
        let tuning = Tuning::default();
        let viewport = Viewport::new(800.0, 600.0);
        let ball = Ball::new(Vec2::new(100.0, 485.0), 15.0, 0);
        // Wide floor so any reasonable launch comes down on it
        let floor = vec![Platform {
            x: 150.0,
            y: 500.0,
            width: 600.0,
            height: 20.0,
            color_index: 0,
        }];

        let landing = predict_landing(&ball, 30.0, &floor, viewport, &tuning, 500).unwrap();
        assert_eq!(landing.index, 0);
        assert!((0.0..=1.0).contains(&landing.accuracy));

        // Straight off the right edge instead
        assert!(predict_landing(&ball, 100.0, &[], viewport, &tuning, 500).is_none());
    }
}
