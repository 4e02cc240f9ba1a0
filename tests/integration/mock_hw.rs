//! Shared mock adapters for the integration tests.
//!
//! The links expose shared handles (`Rc<Cell<…>>` / `Rc<RefCell<…>>`) so a
//! test can observe what the automation drove and script what the peer
//! answers, while the automation owns the link itself.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::digital::PinState;

use scanpoint::automation::PeerCommand;
use scanpoint::automation::ports::{CommandLink, EdgeLink, SerialLink};
use scanpoint::kiosk::events::KioskEvent;
use scanpoint::kiosk::ports::EventSink;

// ── Event sink ────────────────────────────────────────────────

/// Records every emitted kiosk event for later assertions.
pub struct RecordingSink {
    pub events: Vec<KioskEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Compact event-name trace, the usual assertion target.
    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .map(|e| match e {
                KioskEvent::Ready { .. } => "ready",
                KioskEvent::ScanAccepted { .. } => "accepted",
                KioskEvent::DuplicateScan { .. } => "duplicate",
                KioskEvent::ScannerBusy { .. } => "busy",
                KioskEvent::AutomationFinished { .. } => "finished",
                KioskEvent::AutomationTimedOut { .. } => "timed-out",
                KioskEvent::HistoryCleared { .. } => "cleared",
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &KioskEvent) {
        self.events.push(event.clone());
    }
}

// ── Edge link with a scriptable peer line ─────────────────────

/// Handle a test holds to play the peer: set the sensed line level and
/// inspect what the kiosk side drove.
#[derive(Clone)]
pub struct PeerLine {
    level: Rc<Cell<PinState>>,
    driven: Rc<RefCell<Vec<PinState>>>,
}

#[allow(dead_code)]
impl PeerLine {
    pub fn set(&self, level: PinState) {
        self.level.set(level);
    }

    pub fn driven(&self) -> Vec<PinState> {
        self.driven.borrow().clone()
    }

    pub fn last_driven(&self) -> Option<PinState> {
        self.driven.borrow().last().copied()
    }
}

/// Edge link whose sense line is controlled by the test through [`PeerLine`].
pub struct MockEdgeLink {
    level: Rc<Cell<PinState>>,
    driven: Rc<RefCell<Vec<PinState>>>,
}

impl MockEdgeLink {
    /// Build the link plus its test-side handle. The peer line starts at
    /// the given idle level.
    pub fn with_peer(idle: PinState) -> (Self, PeerLine) {
        let level = Rc::new(Cell::new(idle));
        let driven = Rc::new(RefCell::new(Vec::new()));
        let handle = PeerLine {
            level: Rc::clone(&level),
            driven: Rc::clone(&driven),
        };
        (Self { level, driven }, handle)
    }
}

impl EdgeLink for MockEdgeLink {
    fn drive(&mut self, level: PinState) {
        self.driven.borrow_mut().push(level);
    }

    fn sense(&mut self) -> PinState {
        self.level.get()
    }

    fn settle(&mut self, _ms: u32) {}
}

// ── Serial link that collects sent lines ──────────────────────

#[derive(Clone)]
pub struct SentLines(Rc<RefCell<Vec<String>>>);

impl SentLines {
    pub fn all(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

pub struct MockSerialLink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MockSerialLink {
    pub fn new() -> (Self, SentLines) {
        let lines = Rc::new(RefCell::new(Vec::new()));
        let handle = SentLines(Rc::clone(&lines));
        (Self { lines }, handle)
    }
}

impl SerialLink for MockSerialLink {
    fn begin(&mut self) {}

    fn send_line(&mut self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }

    fn delay_ms(&mut self, _ms: u32) {}
}

// ── Command link with a scriptable companion ──────────────────

/// Test-side handle to the companion: queue inbound commands and inspect
/// the outbound ones.
#[derive(Clone)]
pub struct CompanionHandle {
    inbound: Rc<RefCell<VecDeque<PeerCommand>>>,
    outbound: Rc<RefCell<Vec<PeerCommand>>>,
}

impl CompanionHandle {
    pub fn reply(&self, cmd: PeerCommand) {
        self.inbound.borrow_mut().push_back(cmd);
    }

    pub fn sent(&self) -> Vec<PeerCommand> {
        self.outbound.borrow().clone()
    }
}

pub struct MockCommandLink {
    inbound: Rc<RefCell<VecDeque<PeerCommand>>>,
    outbound: Rc<RefCell<Vec<PeerCommand>>>,
}

impl MockCommandLink {
    pub fn new() -> (Self, CompanionHandle) {
        let inbound = Rc::new(RefCell::new(VecDeque::new()));
        let outbound = Rc::new(RefCell::new(Vec::new()));
        let handle = CompanionHandle {
            inbound: Rc::clone(&inbound),
            outbound: Rc::clone(&outbound),
        };
        (
            Self { inbound, outbound },
            handle,
        )
    }
}

impl CommandLink for MockCommandLink {
    fn begin(&mut self) {}

    fn send(&mut self, cmd: PeerCommand) {
        self.outbound.borrow_mut().push(cmd);
    }

    fn poll(&mut self) -> Option<PeerCommand> {
        self.inbound.borrow_mut().pop_front()
    }

    fn status(&self) -> u8 {
        0
    }

    fn delay_ms(&mut self, _ms: u32) {}
}
