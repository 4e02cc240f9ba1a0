//! Packetized request/acknowledge automation (companion controller).
//!
//! Three symbolic commands — START, STOP, DONE — exchanged with a companion
//! microcontroller as fixed-layout binary records over a framed serial
//! transport. The framing/integrity layer lives in the link adapter; this
//! module only speaks the three-command contract:
//!
//! - `run` transmits START and polls for inbound packets every tick,
//! - a DONE packet completes the run,
//! - `cancel` transmits STOP synchronously and trusts the peer to idle —
//!   no confirmation is awaited.
//!
//! While waiting, a once-per-second link-status line goes to the debug log.
//! It is purely diagnostic and never alters protocol state.

use log::{debug, info};

use super::ports::CommandLink;
use super::{Automation, AutomationState, DoneCallback};
use crate::error::Result;

/// Interval between link-status heartbeat log lines (ms).
const HEARTBEAT_MS: u32 = 1_000;
/// Hold after a synchronous STOP so the frame drains before the line is
/// considered free.
const STOP_DRAIN_MS: u32 = 100;

// ───────────────────────────────────────────────────────────────
// Wire format
// ───────────────────────────────────────────────────────────────

/// The three-command contract with the companion controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PeerCommand {
    Start = 0,
    Stop = 1,
    Done = 2,
}

impl PeerCommand {
    /// Size of one command record on the wire.
    pub const WIRE_SIZE: usize = 4;

    /// Encode as the fixed 4-byte little-endian record the peer expects.
    pub fn encode(self) -> [u8; Self::WIRE_SIZE] {
        (self as i32).to_le_bytes()
    }

    /// Decode a record; `None` for unknown command values.
    pub fn decode(bytes: [u8; Self::WIRE_SIZE]) -> Option<Self> {
        match i32::from_le_bytes(bytes) {
            0 => Some(Self::Start),
            1 => Some(Self::Stop),
            2 => Some(Self::Done),
            _ => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Automation
// ───────────────────────────────────────────────────────────────

pub struct CompanionAutomation<L: CommandLink> {
    link: L,
    done: Option<DoneCallback>,
    state: AutomationState,
    last_heartbeat_ms: u32,
}

impl<L: CommandLink> CompanionAutomation<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            done: None,
            state: AutomationState::Idle,
            last_heartbeat_ms: 0,
        }
    }
}

impl<L: CommandLink> Automation for CompanionAutomation<L> {
    fn name(&self) -> &'static str {
        "companion"
    }

    fn setup(&mut self) -> Result<()> {
        info!("setting up companion automation");
        self.link.begin();
        Ok(())
    }

    fn run(&mut self, now_ms: u32, done: DoneCallback) {
        info!("sending command: START");
        self.link.send(PeerCommand::Start);
        self.done = Some(done);
        self.state = AutomationState::AwaitingPeer;
        self.last_heartbeat_ms = now_ms;
    }

    fn update(&mut self, now_ms: u32) {
        if self.state == AutomationState::Idle {
            return;
        }

        match self.link.poll() {
            Some(PeerCommand::Done) => {
                info!("[action] companion reported DONE");
                self.state = AutomationState::Idle;
                if let Some(cb) = self.done.take() {
                    cb();
                }
            }
            Some(other) => {
                // START/STOP echoes are not protocol events for this side.
                debug!("companion: ignoring inbound {other:?}");
            }
            None => {
                if now_ms.wrapping_sub(self.last_heartbeat_ms) > HEARTBEAT_MS {
                    debug!("companion: waiting, link status {}", self.link.status());
                    self.last_heartbeat_ms = now_ms;
                }
            }
        }
    }

    fn cancel(&mut self) {
        if self.state == AutomationState::Idle {
            return;
        }
        info!("sending command: STOP");
        self.link.send(PeerCommand::Stop);
        self.link.delay_ms(STOP_DRAIN_MS);
        self.done = None;
        self.state = AutomationState::Idle;
    }

    fn state(&self) -> AutomationState {
        self.state
    }
}
