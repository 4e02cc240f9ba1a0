//! Unified error types for the ScanPoint firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! top-level loop's error handling uniform. All variants are `Copy` so they
//! can be passed around without allocation. None of these errors is fatal to
//! the kiosk: failures degrade to "stay idle / return to ready" rather than
//! halting the scheduling loop.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A peripheral link could not be brought up or used.
    Link(LinkError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Peripheral link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// GPIO direction/level configuration failed.
    GpioConfigFailed,
    /// UART driver install or parameter configuration failed.
    UartInitFailed,
    /// A serial write did not accept the full payload.
    WriteFailed,
    /// The peer never asserted its busy/ready line during bring-up.
    PeerNotResponding,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioConfigFailed => write!(f, "GPIO config failed"),
            Self::UartInitFailed => write!(f, "UART init failed"),
            Self::WriteFailed => write!(f, "serial write failed"),
            Self::PeerNotResponding => write!(f, "peer not responding"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
