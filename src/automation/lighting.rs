//! JSON-command lighting automation with a run-time budget.
//!
//! Commands go to a WLED-class controller as compact JSON documents over a
//! serial link; the controller never acknowledges, so completion is
//! time-bounded: once the configured run budget elapses, an explicit off
//! command is sent and the callback fires.
//!
//! `setup` performs a visual self-check — a red blink pattern held for a few
//! seconds — so a miswired link is obvious at boot, then settles to off.
//! Each `run` selects the next preset from a fixed pool via a monotonically
//! increasing counter, so repeated scans visibly rotate content.

use log::{info, warn};
use serde::Serialize;

use super::ports::SerialLink;
use super::{Automation, AutomationState, DoneCallback};
use crate::error::Result;

/// Presets cycled by triggered runs (1-based controller ids).
pub const PRESET_POOL: u32 = 4;

/// Blink effect id used by the startup self-check.
const BLINK_FX: u16 = 1;
/// Blink speed for the self-check pattern.
const BLINK_SPEED: u8 = 200;
/// How long the self-check pattern is held (ms).
const SELF_CHECK_HOLD_MS: u32 = 5_000;
/// Link settle time after bring-up (ms).
const LINK_SETTLE_MS: u32 = 200;

// ───────────────────────────────────────────────────────────────
// Wire format
// ───────────────────────────────────────────────────────────────

/// One segment of a lighting command. Only populated fields are serialized,
/// keeping documents minimal the way the controller expects them.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Segment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fx: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sx: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pal: Option<u8>,
    /// Primary colour slot: `col[0] = [r, g, b]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<[[u8; 3]; 1]>,
}

/// A complete lighting command document.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LightCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seg: Option<[Segment; 1]>,
}

impl LightCommand {
    /// `{"on":true,"ps":<id>}` — activate a stored preset.
    pub fn preset(id: u8) -> Self {
        Self {
            on: Some(true),
            ps: Some(id),
            seg: None,
        }
    }

    /// `{"on":false}` — everything off.
    pub fn off() -> Self {
        Self {
            on: Some(false),
            ps: None,
            seg: None,
        }
    }

    /// Red blink pattern used by the startup self-check.
    pub fn startup_check() -> Self {
        Self {
            on: Some(true),
            ps: None,
            seg: Some([Segment {
                fx: Some(BLINK_FX),
                sx: Some(BLINK_SPEED),
                pal: Some(0),
                col: Some([[255, 0, 0]]),
            }]),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Automation
// ───────────────────────────────────────────────────────────────

pub struct LightingAutomation<L: SerialLink> {
    link: L,
    done: Option<DoneCallback>,
    state: AutomationState,
    /// Run-time budget after which the lights are turned off (ms).
    run_time_ms: u32,
    started_ms: u32,
    /// Monotonic trigger counter; preset = counter % pool + 1.
    counter: u32,
}

impl<L: SerialLink> LightingAutomation<L> {
    pub fn new(link: L, run_time_ms: u32) -> Self {
        Self {
            link,
            done: None,
            state: AutomationState::Idle,
            run_time_ms,
            started_ms: 0,
            counter: 0,
        }
    }

    fn send(&mut self, cmd: &LightCommand) {
        match serde_json::to_string(cmd) {
            Ok(doc) => self.link.send_line(&doc),
            Err(e) => warn!("lighting: could not encode command: {e}"),
        }
    }

    fn finish(&mut self) {
        self.state = AutomationState::Idle;
        if let Some(cb) = self.done.take() {
            cb();
        }
    }
}

impl<L: SerialLink> Automation for LightingAutomation<L> {
    fn name(&self) -> &'static str {
        "lighting"
    }

    fn setup(&mut self) -> Result<()> {
        info!("setting up lighting automation");
        self.link.begin();
        self.link.delay_ms(LINK_SETTLE_MS);

        self.send(&LightCommand::startup_check());
        self.link.delay_ms(SELF_CHECK_HOLD_MS);
        self.send(&LightCommand::off());
        Ok(())
    }

    fn run(&mut self, now_ms: u32, done: DoneCallback) {
        let preset = (self.counter % PRESET_POOL) as u8 + 1;
        info!("[action] turning on preset {preset}");
        self.send(&LightCommand::preset(preset));
        self.counter += 1;

        self.started_ms = now_ms;
        self.done = Some(done);
        self.state = AutomationState::Running;
    }

    fn update(&mut self, now_ms: u32) {
        if self.state == AutomationState::Idle {
            return;
        }
        if now_ms.wrapping_sub(self.started_ms) < self.run_time_ms {
            return;
        }

        info!("[action] hit time limit, turning lights off");
        self.send(&LightCommand::off());
        self.finish();
    }

    fn cancel(&mut self) {
        if self.state == AutomationState::Idle {
            return;
        }
        info!("[cancel] lighting automation cancelled");
        self.send(&LightCommand::off());
        self.done = None;
        self.state = AutomationState::Idle;
    }

    fn state(&self) -> AutomationState {
        self.state
    }
}
