//! Non-blocking automation state machines.
//!
//! Every accepted tag scan triggers exactly one physical side-effect — a
//! relay pulse, a sound clip, a lighting preset, a companion-controller
//! command — that must run to completion while the main loop keeps
//! servicing the scanner, network link, and display. Each variant is a
//! small cooperative state machine behind the [`Automation`] trait:
//!
//! - one-time hardware bring-up in [`setup`](Automation::setup),
//! - a non-blocking start in [`run`](Automation::run),
//! - polled progress in [`update`](Automation::update) every loop tick,
//! - cooperative abort in [`cancel`](Automation::cancel).
//!
//! The completion callback fires exactly once per `run`. It is stored in an
//! `Option` and `take()`n before invocation, so a callback that re-arms the
//! kiosk can never double-fire. Calling `run` while a run is in flight is a
//! clean restart: the previous callback is discarded unused and the start
//! action is re-issued.
//!
//! All peripheral I/O goes through the port traits in [`ports`]; the
//! variants themselves never touch GPIO registers or UART drivers and are
//! fully host-testable.

pub mod ports;

pub mod audio;
pub mod companion;
pub mod falling_edge;
pub mod fixed_delay;
pub mod lighting;
pub mod rising_edge;

pub use audio::AudioClipAutomation;
pub use companion::{CompanionAutomation, PeerCommand};
pub use falling_edge::FallingEdgeHandshake;
pub use fixed_delay::FixedDelayAutomation;
pub use lighting::LightingAutomation;
pub use rising_edge::RisingEdgeHandshake;

use crate::error::Result;

/// One-shot completion notification, invoked at most once per `run`.
pub type DoneCallback = Box<dyn FnOnce()>;

/// Lifecycle state of an automation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationState {
    /// Constructed / set up / finished — ready for the next `run`.
    Idle,
    /// Started; completion is self-determined (timer or fixed hold).
    Running,
    /// Started; completion requires a signal from the peer device.
    AwaitingPeer,
}

/// Contract implemented by every automation variant.
pub trait Automation {
    /// Short name for logs and events.
    fn name(&self) -> &'static str;

    /// One-time hardware bring-up. Called exactly once before any `run`.
    /// This is the only method allowed to block (peer bring-up,
    /// calibration sweeps) — it executes before the operating loop starts.
    fn setup(&mut self) -> Result<()>;

    /// Start the automation and return immediately. Stores `done` and
    /// performs the minimal hardware action that kicks off the effect.
    /// If a run is already in flight, it is restarted: the old callback is
    /// dropped without being invoked.
    fn run(&mut self, now_ms: u32, done: DoneCallback);

    /// Advance the automation; called on every scheduling tick. A no-op
    /// while idle. Must not block beyond brief, bounded pin-settle delays;
    /// peer completion is always detected by polling, never by sleeping.
    fn update(&mut self, now_ms: u32);

    /// Abort the in-flight run: reset the peer/line to its idle level and
    /// drop the pending callback without invoking it. No-op while idle.
    fn cancel(&mut self);

    /// Current lifecycle state.
    fn state(&self) -> AutomationState;

    /// Whether a run is in flight.
    fn is_active(&self) -> bool {
        self.state() != AutomationState::Idle
    }
}

impl Automation for Box<dyn Automation> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn setup(&mut self) -> Result<()> {
        (**self).setup()
    }

    fn run(&mut self, now_ms: u32, done: DoneCallback) {
        (**self).run(now_ms, done);
    }

    fn update(&mut self, now_ms: u32) {
        (**self).update(now_ms);
    }

    fn cancel(&mut self) {
        (**self).cancel();
    }

    fn state(&self) -> AutomationState {
        (**self).state()
    }
}
