//! Outbound kiosk events.
//!
//! The [`KioskService`](super::KioskService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them — log to serial, report upstream, drive the
//! display, etc.

use crate::history::TagId;

/// Structured events emitted by the kiosk core.
#[derive(Debug, Clone)]
pub enum KioskEvent {
    /// The kiosk finished setup and is ready for scans.
    Ready { automation: &'static str },

    /// A scan was accepted and its automation triggered.
    ScanAccepted { tag: TagId },

    /// A scan matched the recent-scan history and was suppressed.
    DuplicateScan { tag: TagId },

    /// A scan arrived while an automation was still in flight.
    ScannerBusy { tag: TagId },

    /// The in-flight automation reported completion.
    AutomationFinished { elapsed_ms: u32 },

    /// The in-flight automation exceeded its completion timeout and was
    /// cancelled.
    AutomationTimedOut { after_ms: u32 },

    /// The periodic history wipe ran.
    HistoryCleared { dropped: usize },
}
