//! Fixed-delay automation.
//!
//! Used when the kiosk has no effect hardware attached: the "automation" is
//! simply a hold period, long enough for the guest to read the display,
//! after which the kiosk returns to ready.

use log::info;

use super::{Automation, AutomationState, DoneCallback};
use crate::error::Result;

pub struct FixedDelayAutomation {
    hold_ms: u32,
    started_ms: u32,
    done: Option<DoneCallback>,
    state: AutomationState,
}

impl FixedDelayAutomation {
    pub fn new(hold_ms: u32) -> Self {
        Self {
            hold_ms,
            started_ms: 0,
            done: None,
            state: AutomationState::Idle,
        }
    }
}

impl Automation for FixedDelayAutomation {
    fn name(&self) -> &'static str {
        "fixed-delay"
    }

    fn setup(&mut self) -> Result<()> {
        Ok(())
    }

    fn run(&mut self, now_ms: u32, done: DoneCallback) {
        info!("[action] fixed delay started ({} ms)", self.hold_ms);
        self.started_ms = now_ms;
        self.done = Some(done);
        self.state = AutomationState::Running;
    }

    fn update(&mut self, now_ms: u32) {
        if self.state == AutomationState::Idle {
            return;
        }
        if now_ms.wrapping_sub(self.started_ms) < self.hold_ms {
            return;
        }

        info!("[action] fixed delay done");
        self.state = AutomationState::Idle;
        if let Some(cb) = self.done.take() {
            cb();
        }
    }

    fn cancel(&mut self) {
        if self.state == AutomationState::Idle {
            return;
        }
        self.done = None;
        self.state = AutomationState::Idle;
    }

    fn state(&self) -> AutomationState {
        self.state
    }
}
