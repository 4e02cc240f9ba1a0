//! ScanPoint firmware — main entry point.
//!
//! Hexagonal architecture with a polled scheduling loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  Link adapters     LogEventSink    NvsStore              │
//! │  (Edge/Audio/      (EventSink)     (Config+Storage)      │
//! │   Serial/Command)                                        │
//! │  ChannelTagSource  MonotonicClock                        │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ──────────────      │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │          KioskService (pure logic)             │      │
//! │  │  Automation variant · ScanHistory              │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use scanpoint::adapters::hardware::build_automation;
use scanpoint::adapters::log_sink::LogEventSink;
use scanpoint::adapters::nvs::NvsStore;
use scanpoint::automation::Automation;
use scanpoint::config::KioskConfig;
use scanpoint::kiosk::KioskService;
use scanpoint::kiosk::ports::{ConfigPort, TagSource};

/// Scheduling loop period.
const TICK_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_svc::log::EspLogger::initialize_default();
    }
    #[cfg(not(target_os = "espidf"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("ScanPoint v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsStore::new() {
        Ok(store) => match store.load() {
            Ok(cfg) => {
                info!("config loaded from NVS");
                cfg
            }
            Err(e) => {
                warn!("NVS config load failed ({e}), using defaults");
                KioskConfig::default()
            }
        },
        Err(e) => {
            warn!("NVS init failed ({e}), running with defaults and no persistence");
            KioskConfig::default()
        }
    };

    // ── 3. Resolve the automation variant and build the core ──
    let automation = build_automation(&config).map_err(|e| anyhow::anyhow!("{e}"))?;
    let mut sink = LogEventSink::new();
    let mut kiosk = KioskService::new(config, automation);
    kiosk.setup(&mut sink).map_err(|e| anyhow::anyhow!("{e}"))?;

    // ── 4. Operating loop ─────────────────────────────────────
    #[cfg(target_os = "espidf")]
    run_device_loop(kiosk, sink);

    #[cfg(not(target_os = "espidf"))]
    run_simulation(kiosk, sink);

    Ok(())
}

/// Device loop: poll the tag feed and tick the kiosk forever.
#[cfg(target_os = "espidf")]
fn run_device_loop(mut kiosk: KioskService<Box<dyn Automation>>, mut sink: LogEventSink) {
    use scanpoint::adapters::scanner::ChannelTagSource;
    use scanpoint::adapters::time::MonotonicClock;

    let clock = MonotonicClock::new();
    // The sender side goes to the RFID reader task when it is brought up;
    // until then the kiosk idles on an empty feed.
    let (mut tags, _tag_tx) = ChannelTagSource::new();

    info!("entering operating loop");
    loop {
        let now_ms = clock.now_ms();
        if let Some(tag) = tags.poll_tag() {
            kiosk.handle_scan(tag.as_str(), now_ms, &mut sink);
        }
        kiosk.tick(now_ms, &mut sink);
        esp_idf_hal::delay::FreeRtos::delay_ms(TICK_MS);
    }
}

/// Host run: replay a scripted scan sequence against synthetic time so the
/// whole session completes instantly.
#[cfg(not(target_os = "espidf"))]
fn run_simulation(mut kiosk: KioskService<Box<dyn Automation>>, mut sink: LogEventSink) {
    use scanpoint::adapters::scanner::ScriptedTagSource;

    let mut tags = ScriptedTagSource::new(vec!["04:A3:1F:22", "04:A3:1F:22", "04:B7:90:0C"]);

    let mut now_ms: u32 = 0;
    // A scan attempt every simulated second, ticking in between.
    for _ in 0..5 {
        if let Some(tag) = tags.poll_tag() {
            kiosk.handle_scan(tag.as_str(), now_ms, &mut sink);
        }
        for _ in 0..100 {
            now_ms += TICK_MS;
            kiosk.tick(now_ms, &mut sink);
        }
    }
    info!("simulation complete, history holds {} tag(s)", kiosk.history_len());
}
