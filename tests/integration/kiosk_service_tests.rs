//! End-to-end kiosk flows: real automation variants wired to mock links,
//! driven through the service exactly like the firmware loop does.

use embedded_hal::digital::PinState;

use scanpoint::automation::FallingEdgeHandshake;
use scanpoint::config::KioskConfig;
use scanpoint::kiosk::KioskService;

use crate::mock_hw::{MockEdgeLink, RecordingSink};

fn config() -> KioskConfig {
    KioskConfig {
        clear_history_after_ms: 0,
        ..KioskConfig::default()
    }
}

#[test]
fn falling_edge_scan_completes_when_peer_answers() {
    let (link, peer) = MockEdgeLink::with_peer(PinState::High);
    let mut sink = RecordingSink::new();
    let mut kiosk = KioskService::new(config(), FallingEdgeHandshake::new(link));

    kiosk.setup(&mut sink).unwrap();
    assert_eq!(peer.last_driven(), Some(PinState::High));

    assert!(kiosk.handle_scan("CARD-001", 0, &mut sink));
    // Start line pulled low for the active-low peer.
    assert_eq!(peer.last_driven(), Some(PinState::Low));

    // Peer hasn't answered yet.
    kiosk.tick(100, &mut sink);
    kiosk.tick(200, &mut sink);
    assert!(!kiosk.is_ready());

    // Peer signals completion by pulling its line low.
    peer.set(PinState::Low);
    kiosk.tick(300, &mut sink);
    assert!(kiosk.is_ready());
    // Idle level restored for the next run.
    assert_eq!(peer.last_driven(), Some(PinState::High));
    assert_eq!(sink.names(), vec!["ready", "accepted", "finished"]);
}

#[test]
fn silent_peer_is_cancelled_and_kiosk_recovers() {
    let (link, peer) = MockEdgeLink::with_peer(PinState::High);
    let mut sink = RecordingSink::new();
    let mut kiosk = KioskService::new(config(), FallingEdgeHandshake::new(link));
    kiosk.setup(&mut sink).unwrap();

    assert!(kiosk.handle_scan("CARD-001", 0, &mut sink));
    for t in 1..=14 {
        kiosk.tick(t * 1_000, &mut sink);
    }
    assert!(!kiosk.is_ready());

    // Completion timeout: the run is cancelled, the line restored.
    kiosk.tick(15_000, &mut sink);
    assert!(kiosk.is_ready());
    assert_eq!(peer.last_driven(), Some(PinState::High));
    assert!(sink.names().contains(&"timed-out"));

    // The kiosk accepts the next (different) tag immediately.
    assert!(kiosk.handle_scan("CARD-002", 16_000, &mut sink));
    peer.set(PinState::Low);
    kiosk.tick(16_100, &mut sink);
    assert!(kiosk.is_ready());
}

#[test]
fn late_peer_answer_after_timeout_is_ignored() {
    let (link, peer) = MockEdgeLink::with_peer(PinState::High);
    let mut sink = RecordingSink::new();
    let mut kiosk = KioskService::new(config(), FallingEdgeHandshake::new(link));
    kiosk.setup(&mut sink).unwrap();

    assert!(kiosk.handle_scan("CARD-001", 0, &mut sink));
    kiosk.tick(15_000, &mut sink); // cancelled
    let events_after_cancel = sink.events.len();

    // The peer finally answers; nothing may happen.
    peer.set(PinState::Low);
    kiosk.tick(15_100, &mut sink);
    kiosk.tick(15_200, &mut sink);
    assert_eq!(sink.events.len(), events_after_cancel);
    assert!(kiosk.is_ready());
}

#[test]
fn history_wipe_reenables_a_seen_tag() {
    let (link, peer) = MockEdgeLink::with_peer(PinState::High);
    let mut sink = RecordingSink::new();
    let cfg = KioskConfig {
        clear_history_after_ms: 30_000,
        ..KioskConfig::default()
    };
    let mut kiosk = KioskService::new(cfg, FallingEdgeHandshake::new(link));
    kiosk.setup(&mut sink).unwrap();

    assert!(kiosk.handle_scan("CARD-001", 0, &mut sink));
    peer.set(PinState::Low);
    kiosk.tick(100, &mut sink);
    peer.set(PinState::High);

    assert!(!kiosk.handle_scan("CARD-001", 5_000, &mut sink), "duplicate");

    kiosk.tick(30_000, &mut sink); // periodic wipe
    assert_eq!(kiosk.history_len(), 0);
    assert!(kiosk.handle_scan("CARD-001", 31_000, &mut sink));
}
