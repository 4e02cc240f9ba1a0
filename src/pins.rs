//! GPIO / UART pin assignments for the ScanPoint kiosk main board.
//!
//! Single source of truth — every link adapter references this module rather
//! than hard-coding pin numbers. Only the pins of the automation variant
//! selected in [`KioskConfig`](crate::config::KioskConfig) are configured at
//! startup; the assignments below may therefore overlap between variants.

// ---------------------------------------------------------------------------
// Edge-handshake variants (rising and falling)
// ---------------------------------------------------------------------------

/// Digital output driven to start the peer automation.
pub const EDGE_TX_GPIO: i32 = 5;
/// Digital input read back for the completion edge.
/// The rising-edge variant senses the TX line itself (loopback); the
/// falling-edge variant senses this dedicated peer line.
pub const EDGE_RX_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Audio module (DY-SV17F class MP3 board)
// ---------------------------------------------------------------------------

/// UART TX to the audio module.
pub const AUDIO_TX_GPIO: i32 = 5;
/// UART RX from the audio module.
pub const AUDIO_RX_GPIO: i32 = 4;
/// Busy line from the audio module: LOW while a clip is playing,
/// HIGH when idle (external pull-up).
pub const AUDIO_BUSY_GPIO: i32 = 3;
/// Audio module UART baud rate.
pub const AUDIO_BAUD: u32 = 9_600;

// ---------------------------------------------------------------------------
// Lighting controller (WLED over UART)
// ---------------------------------------------------------------------------

/// UART TX to the lighting controller's RX.
pub const LIGHT_TX_GPIO: i32 = 6;
/// UART RX from the lighting controller's TX (unused by the protocol,
/// wired for future status readback).
pub const LIGHT_RX_GPIO: i32 = 5;
/// Lighting controller UART baud rate.
pub const LIGHT_BAUD: u32 = 115_200;

// ---------------------------------------------------------------------------
// Companion microcontroller (framed command link)
// ---------------------------------------------------------------------------

/// UART TX to the companion controller.
pub const COMPANION_TX_GPIO: i32 = 5;
/// UART RX from the companion controller.
pub const COMPANION_RX_GPIO: i32 = 4;
/// Companion link baud rate.
pub const COMPANION_BAUD: u32 = 9_600;
