//! Press-and-hold launcher
//!
//! The launcher is the single owner of "is the ball charging" and "is the ball
//! flying". Both are states of one machine, so they can never hold together:
//!
//! ```text
//!   Idle --StartCharge--> Charging --Release(power >= min)--> Flying
//!    ^                       |                                  |
//!    +---Release(power < min)+                                  |
//!    +-------------------------------Landed--------------------+
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Ball;
use crate::launch_velocity;
use crate::tuning::Tuning;

/// Launcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchState {
    /// Ball at rest, waiting for a press
    Idle,
    /// Press held, power meter oscillating
    Charging,
    /// Ball in flight
    Flying,
}

/// Inputs to the launcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchEvent {
    /// Press started
    StartCharge,
    /// Press released
    Release,
    /// Ball came to rest on a platform
    Landed,
    /// Ball placed back at rest (revive)
    Reset,
}

/// Why an input was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoBall,
    AlreadyCharging,
    BallMoving,
    BallHasVelocity,
    NotCharging,
}

/// Result of feeding an event to the launcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaunchOutcome {
    ChargeStarted,
    /// Release below the launch threshold; nothing happened
    Cancelled { power: f32 },
    Launched { power: f32, velocity: Vec2 },
    Settled,
    Ignored(IgnoreReason),
}

/// Oscillating power meter driven while charging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerMeter {
    pub power: f32,
    /// Signed rate of change of power per tick
    pub velocity: f32,
    /// +1 while accelerating upward, -1 downward
    pub direction: f32,
}

impl PowerMeter {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            power: 0.0,
            velocity: tuning.power_speed,
            direction: 1.0,
        }
    }

    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Advance one tick, bouncing between 0 and max power
    pub fn advance(&mut self, tuning: &Tuning) {
        let limit = tuning.power_velocity_limit;
        self.velocity += tuning.power_acceleration * self.direction;
        self.velocity = self.velocity.clamp(-limit, limit);
        self.power += self.velocity;

        if self.power >= tuning.max_power {
            self.power = tuning.max_power;
            self.direction = -1.0;
            self.velocity = -tuning.power_speed;
        } else if self.power <= 0.0 {
            self.power = 0.0;
            self.direction = 1.0;
            self.velocity = tuning.power_speed;
        }
    }
}

/// Launch state machine plus its power meter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Launcher {
    state: LaunchState,
    pub meter: PowerMeter,
}

impl Launcher {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            state: LaunchState::Idle,
            meter: PowerMeter::new(tuning),
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    pub fn is_charging(&self) -> bool {
        self.state == LaunchState::Charging
    }

    pub fn is_flying(&self) -> bool {
        self.state == LaunchState::Flying
    }

    /// Current meter power (0 unless charging)
    pub fn power(&self) -> f32 {
        self.meter.power
    }

    /// Advance the meter if charging
    pub fn update(&mut self, tuning: &Tuning) {
        if self.state == LaunchState::Charging {
            self.meter.advance(tuning);
        }
    }

    /// The only place the launcher changes state. All guards for an event are
    /// checked here before anything is mutated.
    pub fn handle(
        &mut self,
        event: LaunchEvent,
        ball: Option<&mut Ball>,
        tuning: &Tuning,
    ) -> LaunchOutcome {
        match event {
            LaunchEvent::StartCharge => {
                let Some(ball) = ball else {
                    return LaunchOutcome::Ignored(IgnoreReason::NoBall);
                };
                match self.state {
                    LaunchState::Charging => LaunchOutcome::Ignored(IgnoreReason::AlreadyCharging),
                    LaunchState::Flying => LaunchOutcome::Ignored(IgnoreReason::BallMoving),
                    LaunchState::Idle if ball.vel != Vec2::ZERO => {
                        LaunchOutcome::Ignored(IgnoreReason::BallHasVelocity)
                    }
                    LaunchState::Idle => {
                        self.meter.reset(tuning);
                        self.state = LaunchState::Charging;
                        LaunchOutcome::ChargeStarted
                    }
                }
            }

            LaunchEvent::Release => {
                if self.state != LaunchState::Charging {
                    return LaunchOutcome::Ignored(IgnoreReason::NotCharging);
                }
                let Some(ball) = ball else {
                    self.state = LaunchState::Idle;
                    self.meter.reset(tuning);
                    return LaunchOutcome::Ignored(IgnoreReason::NoBall);
                };

                let power = self.meter.power;
                self.meter.reset(tuning);
                if power < tuning.min_launch_power {
                    self.state = LaunchState::Idle;
                    return LaunchOutcome::Cancelled { power };
                }

                let velocity = launch_velocity(power, tuning.launch_angle, tuning.launch_scale);
                ball.vel = velocity;
                self.state = LaunchState::Flying;
                LaunchOutcome::Launched { power, velocity }
            }

            LaunchEvent::Landed | LaunchEvent::Reset => {
                if let Some(ball) = ball {
                    ball.vel = Vec2::ZERO;
                }
                self.state = LaunchState::Idle;
                self.meter.reset(tuning);
                LaunchOutcome::Settled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn resting_ball() -> Ball {
        Ball::new(Vec2::new(100.0, 400.0), 15.0, 0xffffff)
    }

    #[test]
    fn test_start_guards() {
        let tuning = Tuning::default();
        let mut launcher = Launcher::new(&tuning);

        assert_eq!(
            launcher.handle(LaunchEvent::StartCharge, None, &tuning),
            LaunchOutcome::Ignored(IgnoreReason::NoBall)
        );

        let mut drifting = resting_ball();
        drifting.vel = Vec2::new(0.0, 0.1);
        assert_eq!(
            launcher.handle(LaunchEvent::StartCharge, Some(&mut drifting), &tuning),
            LaunchOutcome::Ignored(IgnoreReason::BallHasVelocity)
        );
        assert_eq!(launcher.state(), LaunchState::Idle);

        let mut ball = resting_ball();
        assert_eq!(
            launcher.handle(LaunchEvent::StartCharge, Some(&mut ball), &tuning),
            LaunchOutcome::ChargeStarted
        );
        assert_eq!(
            launcher.handle(LaunchEvent::StartCharge, Some(&mut ball), &tuning),
            LaunchOutcome::Ignored(IgnoreReason::AlreadyCharging)
        );
    }

    #[test]
    fn test_release_at_fifty() {
        let tuning = Tuning::default();
        let mut launcher = Launcher::new(&tuning);
        let mut ball = resting_ball();
        launcher.handle(LaunchEvent::StartCharge, Some(&mut ball), &tuning);
        launcher.meter.power = 50.0;

        let outcome = launcher.handle(LaunchEvent::Release, Some(&mut ball), &tuning);
        assert!(matches!(outcome, LaunchOutcome::Launched { power, .. } if power == 50.0));
        // 50 * 0.4 = 20 along -45 degrees
        assert!((ball.vel.x - 14.142136).abs() < 1e-3);
        assert!((ball.vel.y + 14.142136).abs() < 1e-3);
        assert!(launcher.is_flying());
        assert!(!launcher.is_charging());
        assert_eq!(launcher.power(), 0.0);

        // Charging is refused mid-flight
        assert_eq!(
            launcher.handle(LaunchEvent::StartCharge, Some(&mut ball), &tuning),
            LaunchOutcome::Ignored(IgnoreReason::BallMoving)
        );
    }

    #[test]
    fn test_weak_release_cancels() {
        let tuning = Tuning::default();
        let mut launcher = Launcher::new(&tuning);
        let mut ball = resting_ball();
        launcher.handle(LaunchEvent::StartCharge, Some(&mut ball), &tuning);
        launcher.meter.power = 2.0;

        let outcome = launcher.handle(LaunchEvent::Release, Some(&mut ball), &tuning);
        assert_eq!(outcome, LaunchOutcome::Cancelled { power: 2.0 });
        assert_eq!(launcher.state(), LaunchState::Idle);
        assert_eq!(launcher.meter, PowerMeter::new(&tuning));
        assert_eq!(ball.vel, Vec2::ZERO);

        // A second release is a no-op
        assert_eq!(
            launcher.handle(LaunchEvent::Release, Some(&mut ball), &tuning),
            LaunchOutcome::Ignored(IgnoreReason::NotCharging)
        );
    }

    #[test]
    fn test_landed_settles() {
        let tuning = Tuning::default();
        let mut launcher = Launcher::new(&tuning);
        let mut ball = resting_ball();
        launcher.handle(LaunchEvent::StartCharge, Some(&mut ball), &tuning);
        launcher.meter.power = 40.0;
        launcher.handle(LaunchEvent::Release, Some(&mut ball), &tuning);

        assert_eq!(
            launcher.handle(LaunchEvent::Landed, Some(&mut ball), &tuning),
            LaunchOutcome::Settled
        );
        assert_eq!(launcher.state(), LaunchState::Idle);
        assert_eq!(ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_meter_bounces_off_max() {
        let tuning = Tuning::default();
        let mut meter = PowerMeter::new(&tuning);
        meter.power = 99.0;
        meter.velocity = 2.0;
        meter.advance(&tuning);
        assert_eq!(meter.power, 100.0);
        assert_eq!(meter.direction, -1.0);
        assert_eq!(meter.velocity, -tuning.power_speed);

        meter.power = 0.3;
        meter.velocity = -1.0;
        meter.advance(&tuning);
        assert_eq!(meter.power, 0.0);
        assert_eq!(meter.direction, 1.0);
        assert_eq!(meter.velocity, tuning.power_speed);
    }

    proptest! {
        #[test]
        fn prop_meter_stays_in_bounds(ticks in 1usize..5000) {
            let tuning = Tuning::default();
            let mut meter = PowerMeter::new(&tuning);
            for _ in 0..ticks {
                meter.advance(&tuning);
                prop_assert!((0.0..=tuning.max_power).contains(&meter.power));
                prop_assert!(meter.velocity.abs() <= tuning.power_velocity_limit);
            }
        }
    }
}
