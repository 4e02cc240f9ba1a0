//! Kiosk orchestrator — owns the automation and the scan history.
//!
//! ```text
//!  TagSource ──▶ ┌───────────────────────────┐ ──▶ EventSink
//!                │       KioskService        │
//!                │  Automation · ScanHistory │
//!                └───────────────────────────┘
//! ```
//!
//! One automation instance is constructed at startup from the configured
//! [`AutomationKind`](crate::config::AutomationKind) and injected here.
//! The service consults the recent-scan history before triggering, arms the
//! automation with a completion flag, polls it every tick, and enforces the
//! automation completion timeout — the backstop for peers that never signal.
//!
//! Completion is delivered through the one-shot callback: each `run` gets a
//! closure that sets a shared atomic flag the service drains in
//! [`tick`](KioskService::tick). The flag is the only channel between the
//! automation and the service, so a cancelled run can never resurrect the
//! kiosk state machine.

pub mod events;
pub mod ports;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::automation::Automation;
use crate::config::{KioskConfig, RECENT_SCAN_HISTORY_SIZE};
use crate::error::Result;
use crate::history::{ScanHistory, TagId};
use events::KioskEvent;
use ports::EventSink;

// ───────────────────────────────────────────────────────────────
// Service state
// ───────────────────────────────────────────────────────────────

/// Orchestrator state: either ready for the next scan or riding out an
/// in-flight automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KioskState {
    Ready,
    Automating { started_ms: u32 },
}

// ───────────────────────────────────────────────────────────────
// KioskService
// ───────────────────────────────────────────────────────────────

/// The kiosk domain core. Generic over the injected automation strategy so
/// tests can drive it with scripted variants.
pub struct KioskService<A: Automation> {
    automation: A,
    history: ScanHistory<RECENT_SCAN_HISTORY_SIZE>,
    config: KioskConfig,
    state: KioskState,
    /// Set by the automation's completion callback, drained in `tick`.
    done_flag: Arc<AtomicBool>,
    last_clear_ms: u32,
}

impl<A: Automation> KioskService<A> {
    pub fn new(config: KioskConfig, automation: A) -> Self {
        Self {
            automation,
            history: ScanHistory::new(),
            config,
            state: KioskState::Ready,
            done_flag: Arc::new(AtomicBool::new(false)),
            last_clear_ms: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// One-time bring-up: runs the automation's (possibly blocking) setup.
    /// Must be called before the operating loop starts.
    pub fn setup(&mut self, sink: &mut impl EventSink) -> Result<()> {
        self.automation.setup()?;
        sink.emit(&KioskEvent::Ready {
            automation: self.automation.name(),
        });
        info!("kiosk ready, automation = {}", self.automation.name());
        Ok(())
    }

    // ── Scan handling ─────────────────────────────────────────

    /// Handle an accepted tag scan. Returns `true` if the automation was
    /// triggered, `false` if the scan was suppressed (duplicate, busy, or
    /// unusable id).
    pub fn handle_scan(&mut self, tag: &str, now_ms: u32, sink: &mut impl EventSink) -> bool {
        let Ok(tag_id) = TagId::try_from(tag) else {
            // Oversized/garbled id: log and skip, never fatal.
            warn!("ignoring unusable tag id ({} bytes)", tag.len());
            return false;
        };

        if matches!(self.state, KioskState::Automating { .. }) {
            info!("scan {tag} ignored, automation in flight");
            sink.emit(&KioskEvent::ScannerBusy { tag: tag_id });
            return false;
        }

        if self.history.contains(tag) {
            info!("scan {tag} suppressed, recently seen");
            sink.emit(&KioskEvent::DuplicateScan { tag: tag_id });
            return false;
        }

        // Arm the completion flag and trigger the automation.
        self.done_flag.store(false, Ordering::Relaxed);
        let flag = Arc::clone(&self.done_flag);
        self.automation
            .run(now_ms, Box::new(move || flag.store(true, Ordering::Relaxed)));

        // Remember the tag; the history never evicts on push, so make room
        // explicitly by dropping the oldest entry.
        if self.history.is_full() {
            self.history.drop_oldest();
        }
        if !self.history.push(tag) {
            warn!("scan history rejected tag {tag}");
        }

        self.state = KioskState::Automating { started_ms: now_ms };
        sink.emit(&KioskEvent::ScanAccepted { tag: tag_id });
        true
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Advance the kiosk by one scheduling tick: poll the automation, drain
    /// its completion flag, enforce the completion timeout, and run the
    /// periodic history wipe.
    pub fn tick(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        self.automation.update(now_ms);

        if let KioskState::Automating { started_ms } = self.state {
            let elapsed = now_ms.wrapping_sub(started_ms);

            if self.done_flag.swap(false, Ordering::Relaxed) {
                self.state = KioskState::Ready;
                sink.emit(&KioskEvent::AutomationFinished { elapsed_ms: elapsed });
            } else if elapsed >= self.config.automation_timeout_ms {
                warn!("automation timed out after {elapsed} ms, cancelling");
                self.automation.cancel();
                self.state = KioskState::Ready;
                sink.emit(&KioskEvent::AutomationTimedOut { after_ms: elapsed });
            }
        }

        if self.config.clear_history_after_ms > 0
            && now_ms.wrapping_sub(self.last_clear_ms) >= self.config.clear_history_after_ms
        {
            self.last_clear_ms = now_ms;
            let dropped = self.history.len();
            if dropped > 0 {
                self.history.clear();
                sink.emit(&KioskEvent::HistoryCleared { dropped });
            }
        }
    }

    // ── Introspection ─────────────────────────────────────────

    /// Whether the kiosk is ready to accept the next scan.
    pub fn is_ready(&self) -> bool {
        self.state == KioskState::Ready
    }

    /// Number of tags currently remembered.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The injected automation (for diagnostics).
    pub fn automation(&self) -> &A {
        &self.automation
    }
}
