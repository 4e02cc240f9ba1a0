//! Companion and lighting variants driven through the kiosk service.

use scanpoint::automation::{CompanionAutomation, LightingAutomation, PeerCommand};
use scanpoint::config::KioskConfig;
use scanpoint::kiosk::KioskService;

use crate::mock_hw::{MockCommandLink, MockSerialLink, RecordingSink};

fn config() -> KioskConfig {
    KioskConfig {
        clear_history_after_ms: 0,
        ..KioskConfig::default()
    }
}

#[test]
fn companion_round_trip() {
    let (link, companion) = MockCommandLink::new();
    let mut sink = RecordingSink::new();
    let mut kiosk = KioskService::new(config(), CompanionAutomation::new(link));
    kiosk.setup(&mut sink).unwrap();

    assert!(kiosk.handle_scan("CARD-001", 0, &mut sink));
    assert_eq!(companion.sent(), vec![PeerCommand::Start]);

    kiosk.tick(100, &mut sink);
    assert!(!kiosk.is_ready(), "no DONE yet");

    companion.reply(PeerCommand::Done);
    kiosk.tick(200, &mut sink);
    assert!(kiosk.is_ready());
    assert_eq!(sink.names(), vec!["ready", "accepted", "finished"]);
}

#[test]
fn companion_timeout_sends_stop() {
    let (link, companion) = MockCommandLink::new();
    let mut sink = RecordingSink::new();
    let mut kiosk = KioskService::new(config(), CompanionAutomation::new(link));
    kiosk.setup(&mut sink).unwrap();

    assert!(kiosk.handle_scan("CARD-001", 0, &mut sink));
    kiosk.tick(15_000, &mut sink);
    assert!(kiosk.is_ready());
    assert_eq!(companion.sent(), vec![PeerCommand::Start, PeerCommand::Stop]);
    assert!(sink.names().contains(&"timed-out"));
}

#[test]
fn lighting_run_respects_time_budget() {
    let (link, lines) = MockSerialLink::new();
    let mut sink = RecordingSink::new();
    let mut kiosk = KioskService::new(config(), LightingAutomation::new(link, 10_000));
    kiosk.setup(&mut sink).unwrap();

    // Self-check pattern then off at boot.
    assert_eq!(lines.all().len(), 2);
    assert_eq!(lines.all()[1], r#"{"on":false}"#);

    assert!(kiosk.handle_scan("CARD-001", 0, &mut sink));
    assert_eq!(lines.all()[2], r#"{"on":true,"ps":1}"#);

    // Budget not yet exhausted.
    kiosk.tick(9_990, &mut sink);
    assert!(!kiosk.is_ready());

    // Budget elapsed: off goes out and the run completes.
    kiosk.tick(10_000, &mut sink);
    assert!(kiosk.is_ready());
    assert_eq!(lines.all().last().map(String::as_str), Some(r#"{"on":false}"#));
    assert_eq!(sink.names(), vec!["ready", "accepted", "finished"]);
}

#[test]
fn lighting_presets_rotate_across_scans() {
    let (link, lines) = MockSerialLink::new();
    let mut sink = RecordingSink::new();
    let mut kiosk = KioskService::new(config(), LightingAutomation::new(link, 100));
    kiosk.setup(&mut sink).unwrap();

    let mut now = 0u32;
    for expected in [1u8, 2, 3, 4, 1] {
        let tag = format!("CARD-{expected:03}-{now}");
        assert!(kiosk.handle_scan(&tag, now, &mut sink));
        let preset_line = format!(r#"{{"on":true,"ps":{expected}}}"#);
        assert!(lines.all().contains(&preset_line));
        now += 200;
        kiosk.tick(now, &mut sink);
        assert!(kiosk.is_ready());
        now += 200;
    }
}
