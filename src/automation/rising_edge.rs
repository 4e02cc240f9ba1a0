//! Rising-edge digital handshake.
//!
//! The start line idles LOW. `run` forces it LOW, holds briefly so the
//! level is latched, then drives it HIGH — a clean LOW→HIGH edge the peer
//! understands as "start". Completion is the next LOW→HIGH transition seen
//! on the sense line (wired loopback on the reference board), detected
//! against the last observed sample rather than the raw level so a line
//! that was already HIGH before `run` cannot be mistaken for completion.
//! After completion the line is reset LOW for the next cycle.

use embedded_hal::digital::PinState;
use log::info;

use super::ports::EdgeLink;
use super::{Automation, AutomationState, DoneCallback};
use crate::error::Result;

/// Settle hold between forcing LOW and driving HIGH.
const SETTLE_MS: u32 = 10;

pub struct RisingEdgeHandshake<L: EdgeLink> {
    link: L,
    done: Option<DoneCallback>,
    state: AutomationState,
    /// Last sampled sense level, the edge memory.
    last: PinState,
}

impl<L: EdgeLink> RisingEdgeHandshake<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            done: None,
            state: AutomationState::Idle,
            last: PinState::Low,
        }
    }
}

impl<L: EdgeLink> Automation for RisingEdgeHandshake<L> {
    fn name(&self) -> &'static str {
        "rising-edge"
    }

    fn setup(&mut self) -> Result<()> {
        info!("setting up rising-edge handshake");
        self.link.drive(PinState::Low);
        self.last = PinState::Low;
        Ok(())
    }

    fn run(&mut self, _now_ms: u32, done: DoneCallback) {
        info!("[action] forcing start line LOW then HIGH for a clean rising edge");
        self.link.drive(PinState::Low);
        self.link.settle(SETTLE_MS);
        self.link.drive(PinState::High);
        // Prime the edge memory LOW regardless of the physical level so the
        // first post-start sample registers as the edge.
        self.last = PinState::Low;
        self.done = Some(done);
        self.state = AutomationState::AwaitingPeer;
    }

    fn update(&mut self, _now_ms: u32) {
        if self.state == AutomationState::Idle {
            return;
        }

        let now = self.link.sense();
        if self.last == PinState::Low && now == PinState::High {
            info!("[action] automation done - rising edge detected");
            self.link.drive(PinState::Low); // reset for the next cycle
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
        info!("[cancel] rising-edge automation cancelled");
        self.done = None;
        self.state = AutomationState::Idle;
        self.link.drive(PinState::Low);
    }

    fn state(&self) -> AutomationState {
        self.state
    }
}
