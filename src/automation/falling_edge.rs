//! Falling-edge digital handshake (active-low peer).
//!
//! Mirror image of [`RisingEdgeHandshake`](super::rising_edge): the start
//! line idles HIGH, `run` pulls it LOW to start the peer, and completion is
//! a HIGH→LOW transition on the sensed peer line (external pull-up).
//! After completion or cancellation the start line is restored HIGH.

use embedded_hal::digital::PinState;
use log::info;

use super::ports::EdgeLink;
use super::{Automation, AutomationState, DoneCallback};
use crate::error::Result;

pub struct FallingEdgeHandshake<L: EdgeLink> {
    link: L,
    done: Option<DoneCallback>,
    state: AutomationState,
    /// Last sampled sense level, the edge memory.
    last: PinState,
}

impl<L: EdgeLink> FallingEdgeHandshake<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            done: None,
            state: AutomationState::Idle,
            last: PinState::High,
        }
    }
}

impl<L: EdgeLink> Automation for FallingEdgeHandshake<L> {
    fn name(&self) -> &'static str {
        "falling-edge"
    }

    fn setup(&mut self) -> Result<()> {
        info!("setting up falling-edge handshake");
        self.link.drive(PinState::High);
        self.last = PinState::High;
        Ok(())
    }

    fn run(&mut self, _now_ms: u32, done: DoneCallback) {
        info!("[action] pulling start line LOW (active-low peer)");
        self.link.drive(PinState::Low);
        // Prime the edge memory HIGH so only a genuine HIGH→LOW transition
        // after the start counts as completion.
        self.last = PinState::High;
        self.done = Some(done);
        self.state = AutomationState::AwaitingPeer;
    }

    fn update(&mut self, _now_ms: u32) {
        if self.state == AutomationState::Idle {
            return;
        }

        let now = self.link.sense();
        if self.last == PinState::High && now == PinState::Low {
            info!("[action] automation done - falling edge detected");
            self.link.drive(PinState::High); // restore idle level
            self.state = AutomationState::Idle;
            if let Some(cb) = self.done.take() {
                cb();
            }
        }
        self.last = now;
    }

    fn cancel(&mut self) {
        if self.state == AutomationState::Idle {
            return;
        }
        info!("[cancel] falling-edge automation cancelled");
        self.done = None;
        self.state = AutomationState::Idle;
        self.link.drive(PinState::High);
    }

    fn state(&self) -> AutomationState {
        self.state
    }
}
