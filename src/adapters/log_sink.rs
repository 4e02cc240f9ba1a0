//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured kiosk events to the
//! logger (UART / USB-CDC in production). A future network reporter would
//! implement the same trait.

use log::{info, warn};

use crate::kiosk::events::KioskEvent;
use crate::kiosk::ports::EventSink;

/// Adapter that logs every [`KioskEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &KioskEvent) {
        match event {
            KioskEvent::Ready { automation } => {
                info!("READY | automation={automation}");
            }
            KioskEvent::ScanAccepted { tag } => {
                info!("SCAN  | accepted tag={tag}");
            }
            KioskEvent::DuplicateScan { tag } => {
                info!("SCAN  | duplicate tag={tag}, suppressed");
            }
            KioskEvent::ScannerBusy { tag } => {
                info!("SCAN  | busy, tag={tag} ignored");
            }
            KioskEvent::AutomationFinished { elapsed_ms } => {
                info!("AUTO  | finished in {elapsed_ms} ms");
            }
            KioskEvent::AutomationTimedOut { after_ms } => {
                warn!("AUTO  | timed out after {after_ms} ms, cancelled");
            }
            KioskEvent::HistoryCleared { dropped } => {
                info!("HIST  | cleared {dropped} remembered tag(s)");
            }
        }
    }
}
