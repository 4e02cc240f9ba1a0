//! Port traits — the boundary between automation logic and peripherals.
//!
//! ```text
//!   Link adapter (GPIO/UART) ──▶ port trait ──▶ automation variant
//! ```
//!
//! Hardware adapters implement these traits; the automation variants consume
//! them via generics, so the protocol logic never touches registers and runs
//! unchanged on the host.
//!
//! The `delay_ms`/`settle` methods exist for the bounded, single-digit (or
//! setup-only) delays the protocols require. They must never be used to
//! await peer completion — completion is always detected by polling from
//! [`update`](super::Automation::update).

use embedded_hal::digital::PinState;

use super::companion::PeerCommand;

// ───────────────────────────────────────────────────────────────
// Edge-handshake link
// ───────────────────────────────────────────────────────────────

/// A driven start line plus a sensed completion line.
///
/// Which physical pin `sense` reads is the adapter's choice: the rising-edge
/// variant is wired loopback (sense == the driven line), the falling-edge
/// variant senses a dedicated peer line.
pub trait EdgeLink {
    /// Drive the start line to the given level.
    fn drive(&mut self, level: PinState);

    /// Sample the completion line.
    fn sense(&mut self) -> PinState;

    /// Bounded settle delay so a forced level is latched before the next
    /// transition (single-digit milliseconds).
    fn settle(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Audio module link
// ───────────────────────────────────────────────────────────────

/// Serial-commanded audio module with a busy line.
pub trait AudioLink {
    /// Bring up the serial side channel to the module.
    fn begin(&mut self);

    /// Start playback of the given 1-based clip number.
    fn play_clip(&mut self, clip: u16);

    /// Stop playback.
    fn stop(&mut self);

    /// Set output volume (0–30).
    fn set_volume(&mut self, volume: u8);

    /// Sample the busy line: LOW while a clip is playing, HIGH when idle.
    fn busy(&mut self) -> PinState;

    /// Blocking delay — used only from `setup()` calibration.
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Line-oriented serial link (lighting controller)
// ───────────────────────────────────────────────────────────────

/// Write-only serial link; each payload is terminated with a newline by the
/// adapter (the lighting controller treats the newline as end-of-document).
pub trait SerialLink {
    /// Bring up the serial link.
    fn begin(&mut self);

    /// Transmit one newline-terminated line.
    fn send_line(&mut self, line: &str);

    /// Blocking delay — used only from `setup()`.
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Framed command link (companion controller)
// ───────────────────────────────────────────────────────────────

/// Packet link to the companion controller. Framing and integrity checking
/// live in the adapter; the automation only sees whole commands.
pub trait CommandLink {
    /// Bring up the link.
    fn begin(&mut self);

    /// Transmit one command.
    fn send(&mut self, cmd: PeerCommand);

    /// Non-blocking receive: the next decoded inbound command, if any.
    fn poll(&mut self) -> Option<PeerCommand>;

    /// Framing-layer status code, for the periodic heartbeat diagnostic.
    fn status(&self) -> u8;

    /// Bounded delay after a synchronous STOP transmit.
    fn delay_ms(&mut self, ms: u32);
}
