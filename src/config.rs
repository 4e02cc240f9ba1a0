//! Kiosk configuration parameters.
//!
//! All tunable parameters for the ScanPoint kiosk. Values can be overridden
//! via NVS; the defaults mirror the production install (falling-edge
//! handshake, single-entry scan history, 30 s history wipe).

use serde::{Deserialize, Serialize};

/// Number of tag ids kept in the recent-scan history. A tag in the history
/// cannot be re-scanned until it ages out or the history is cleared.
pub const RECENT_SCAN_HISTORY_SIZE: usize = 1;

/// Which automation variant the kiosk drives. Exactly one is active per
/// device; the selection is resolved once at startup into the concrete
/// [`Automation`](crate::automation::Automation) implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutomationKind {
    /// No effect hardware attached — completes after a fixed hold time.
    FixedDelay,
    /// Rising-edge digital handshake (loopback sense).
    RisingEdge,
    /// Falling-edge digital handshake (active-low peer).
    FallingEdge,
    /// Busy-line sensed audio clip player.
    Audio,
    /// JSON-over-serial lighting controller with a run-time budget.
    Lighting,
    /// Packetized START/STOP/DONE companion controller.
    Companion,
}

/// One Wi-Fi network the kiosk may join. Credentials are tried in order
/// until a connection succeeds; `password: None` means an open network.
/// Connectivity itself is handled outside this crate — the list is only
/// carried as configuration data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredential {
    pub ssid: heapless::String<32>,
    pub password: Option<heapless::String<64>>,
}

/// Core kiosk configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KioskConfig {
    // --- Automation ---
    /// Selected automation variant.
    pub automation: AutomationKind,
    /// Max time allowed for a triggered automation to complete (ms).
    /// On timeout the orchestrator cancels it and returns to ready.
    pub automation_timeout_ms: u32,
    /// Hold time for the fixed-delay variant (ms).
    pub fixed_delay_hold_ms: u32,
    /// Run-time budget for the lighting variant (ms).
    pub lighting_run_time_ms: u32,

    // --- Scanning ---
    /// Max time allowed to process a scan, e.g. report it upstream (ms).
    pub scan_timeout_ms: u32,
    /// Wipe the scan history after this long; 0 disables periodic clearing.
    /// With 0 and a non-empty history, a tag can never be re-scanned.
    pub clear_history_after_ms: u32,

    // --- Reporting (consumed by the network layer, not this crate) ---
    /// Location number sent after a successful scan.
    pub location: u16,
    /// Delay between server health-check calls (ms).
    pub health_check_interval_ms: u32,
    /// Upstream server host.
    pub server_host: heapless::String<64>,
    /// Upstream server port.
    pub server_port: u16,

    // --- Wi-Fi ---
    /// Networks tried in order until one connects.
    pub wifi: heapless::Vec<WifiCredential, 4>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        let mut wifi = heapless::Vec::new();
        let _ = wifi.push(WifiCredential {
            ssid: sstr("Life.Church"),
            password: None, // open network
        });

        Self {
            automation: AutomationKind::FallingEdge,
            automation_timeout_ms: 15_000,
            fixed_delay_hold_ms: 3_000,
            lighting_run_time_ms: 10_000,

            scan_timeout_ms: 5_000,
            clear_history_after_ms: 30_000,

            location: 2,
            health_check_interval_ms: 60_000,
            server_host: sstr("atm-clv-37eca624ed8b.herokuapp.com"),
            server_port: 80,

            wifi,
        }
    }
}

/// Build a fixed-capacity string from a literal, truncating on overflow.
fn sstr<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    let _ = out.push_str(&s[..s.len().min(N)]);
    out
}
