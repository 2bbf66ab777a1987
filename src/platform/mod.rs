//! Host-facing frame loop
//!
//! The host scheduler (requestAnimationFrame on web, a plain loop natively)
//! calls [`FrameLoop::frame`] once per display refresh. Each frame runs one
//! simulation tick, hands persistence events to the sink, and tells the host
//! whether to schedule another frame.

use rand_pcg::Pcg32;

use crate::persistence::{PersistenceSink, forward_events};
use crate::sim::{GameEvent, RandomSource, Session, SessionPhase, TickInput, tick};

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// A session, its pending input and where progress goes
pub struct FrameLoop<S: PersistenceSink, R: RandomSource = Pcg32> {
    pub session: Session<R>,
    pub sink: S,
    input: TickInput,
    /// Events from the last frame, kept for the UI
    last_events: Vec<GameEvent>,
}

impl<S: PersistenceSink, R: RandomSource> FrameLoop<S, R> {
    pub fn new(session: Session<R>, sink: S) -> Self {
        Self {
            session,
            sink,
            input: TickInput::default(),
            last_events: Vec::new(),
        }
    }

    /// Press started; applied on the next frame
    pub fn press(&mut self) {
        self.input.start_charge = true;
    }

    /// Press released; applied on the next frame
    pub fn release(&mut self) {
        self.input.release_charge = true;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    pub fn autopilot(&self) -> bool {
        self.input.autopilot
    }

    /// Events produced by the most recent frame
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    /// Run one step. Stops once the session is no longer playing.
    pub fn frame(&mut self) -> LoopControl {
        if self.session.phase != SessionPhase::Playing {
            return LoopControl::Stop;
        }

        tick(&mut self.session, &self.input);

        // Clear one-shot inputs after processing
        self.input.start_charge = false;
        self.input.release_charge = false;

        self.last_events = self.session.drain_events();
        forward_events(&self.last_events, &mut self.sink);

        if self.session.phase == SessionPhase::Playing {
            LoopControl::Continue
        } else {
            LoopControl::Stop
        }
    }
}
