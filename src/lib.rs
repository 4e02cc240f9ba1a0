//! ScanPoint firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod automation;
pub mod config;
pub mod history;
pub mod kiosk;

pub mod error;
pub mod pins;

// Adapters contain the ESP-IDF-only implementations; their host
// counterparts keep the crate testable off-device.
pub mod adapters;
