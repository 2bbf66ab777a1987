//! Per-frame simulation tick
//!
//! One call advances the session by exactly one step. Order within a tick:
//! inputs, power meter, ball motion, landing, terminal checks, generation,
//! particles.

use glam::Vec2;

use super::autopilot::{self, Decision};
use super::camera;
use super::charge::{LaunchEvent, LaunchOutcome};
use super::collision::{self, Landing};
use super::projectile;
use super::rng::RandomSource;
use super::state::{GameEvent, Particle, Session, SessionPhase};
use crate::consts::*;

/// Input events for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Press started (mouse down / touch start)
    pub start_charge: bool,
    /// Press released (mouse up / touch end / pointer left)
    pub release_charge: bool,
    /// Demo mode - autopilot plays the game
    pub autopilot: bool,
}

/// Advance the session by one tick
pub fn tick<R: RandomSource>(session: &mut Session<R>, input: &TickInput) {
    if session.phase != SessionPhase::Playing {
        return;
    }
    session.time_ticks += 1;

    let mut input = input.clone();
    if input.autopilot {
        match autopilot::decide(session) {
            Decision::StartCharge => input.start_charge = true,
            Decision::Release => input.release_charge = true,
            Decision::Wait => {}
        }
    }

    if input.start_charge {
        start_charge(session);
    }
    if input.release_charge {
        release_charge(session);
    }

    session.launcher.update(&session.tuning);

    if session.launcher.is_flying() {
        let Some(ball) = session.ball.as_mut() else {
            return;
        };
        projectile::step(ball, session.tuning.gravity);

        let platforms = &session.course.platforms;
        let tolerance = session.tuning.landing_tolerance;
        if let Some(landing) = collision::resolve_landing(ball, platforms, tolerance) {
            on_landing(session, landing);
        }

        if let Some(reason) = session
            .ball
            .as_ref()
            .and_then(|ball| projectile::terminal_condition(ball, session.viewport))
        {
            session.end_session(reason);
            return;
        }

        session
            .course
            .extend(session.viewport, &session.tuning, &mut session.rng);
    }

    update_particles(&mut session.particles);
}

fn start_charge<R: RandomSource>(session: &mut Session<R>) {
    match session
        .launcher
        .handle(LaunchEvent::StartCharge, session.ball.as_mut(), &session.tuning)
    {
        LaunchOutcome::ChargeStarted => {
            log::debug!("Charging");
            session.events.push(GameEvent::ChargeStarted);
        }
        LaunchOutcome::Ignored(reason) => log::debug!("Charge start ignored: {:?}", reason),
        _ => {}
    }
}

fn release_charge<R: RandomSource>(session: &mut Session<R>) {
    match session
        .launcher
        .handle(LaunchEvent::Release, session.ball.as_mut(), &session.tuning)
    {
        LaunchOutcome::Launched { power, velocity } => {
            log::info!("Launched at power {:.1}", power);
            session.events.push(GameEvent::Launched {
                power,
                vx: velocity.x,
                vy: velocity.y,
            });
        }
        LaunchOutcome::Cancelled { power } => {
            log::debug!("Charge too weak ({:.1}), launch cancelled", power);
            session.events.push(GameEvent::LaunchCancelled { power });
        }
        LaunchOutcome::Ignored(reason) => log::debug!("Release ignored: {:?}", reason),
        _ => {}
    }
}

/// Settle the launcher, score the landing, spray particles and move the camera
fn on_landing<R: RandomSource>(session: &mut Session<R>, landing: Landing) {
    let Some(ball) = session.ball.as_mut() else {
        return;
    };
    session
        .launcher
        .handle(LaunchEvent::Landed, Some(&mut *ball), &session.tuning);

    let score_before = session.score;
    session.score += u64::from(landing.points);
    session.combo += 1;

    log::info!(
        "Landed on platform {} (accuracy {:.2}): +{} -> {}",
        landing.index,
        landing.accuracy,
        landing.points,
        session.score
    );
    session.events.push(GameEvent::Landed {
        points: landing.points,
        accuracy: landing.accuracy,
        combo: session.combo,
        score: session.score,
    });

    let coins_delta = (session.score / POINTS_PER_COIN - score_before / POINTS_PER_COIN) as u32;
    if coins_delta > 0 {
        session.events.push(GameEvent::CoinsEarned { coins_delta });
    }

    let color = session.course.platforms[landing.index].color();
    spawn_particles(
        &mut session.particles,
        ball.pos,
        color,
        session.max_particles,
        &mut session.rng,
    );

    camera::follow(
        ball,
        &mut session.course,
        session.viewport,
        session.tuning.cull_margin,
    );
}

/// Landing burst. All samples are drawn even when capped so the random
/// stream does not depend on presentation settings.
fn spawn_particles(
    particles: &mut Vec<Particle>,
    pos: Vec2,
    color: u32,
    max_particles: usize,
    rng: &mut impl RandomSource,
) {
    for _ in 0..LANDING_PARTICLES {
        let vel = Vec2::new(rng.signed(5.0), rng.signed(5.0));
        let radius = rng.next_unit() * 5.0 + 2.0;
        if particles.len() < max_particles {
            particles.push(Particle {
                pos,
                vel,
                radius,
                color,
                life: 1.0,
            });
        }
    }
}

fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
        particle.life -= PARTICLE_DECAY;
    }
    particles.retain(|p| p.life > 0.0);
}
