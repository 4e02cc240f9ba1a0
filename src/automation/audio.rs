//! Level-sensed audio clip automation.
//!
//! `run` starts a clip over the module's serial side channel; completion is
//! read from the dedicated busy line, which is LOW while the module plays
//! and HIGH when idle. Detection is by level, not edge, and is gated behind
//! the active state — level alone cannot distinguish "never started" from
//! "finished", so the busy line is only consulted while a run is in flight.
//!
//! `setup` runs a one-time blocking calibration pass: with the volume at
//! zero it plays successive clip numbers and watches the busy line to count
//! how many clips the module's storage actually holds. Triggered runs then
//! rotate through clips 1..=count so repeated scans don't repeat a clip.

use embedded_hal::digital::PinState;
use log::{info, warn};

use super::ports::AudioLink;
use super::{Automation, AutomationState, DoneCallback};
use crate::error::Result;

/// Module boot time before it accepts serial commands.
const BOOT_DELAY_MS: u32 = 800;
/// Hold between probe commands so the busy line has time to assert.
const PROBE_SETTLE_MS: u32 = 500;
/// Upper bound on the calibration sweep.
const MAX_PROBE_CLIPS: u16 = 255;
/// Steady-state playback volume (module range 0–30).
const DEFAULT_VOLUME: u8 = 30;

pub struct AudioClipAutomation<L: AudioLink> {
    link: L,
    done: Option<DoneCallback>,
    state: AutomationState,
    /// Next clip to play, 1-based.
    clip: u16,
    /// Clips discovered during setup calibration.
    clip_count: u16,
}

impl<L: AudioLink> AudioClipAutomation<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            done: None,
            state: AutomationState::Idle,
            clip: 1,
            clip_count: 0,
        }
    }

    /// How many clips the setup calibration discovered.
    pub fn clip_count(&self) -> u16 {
        self.clip_count
    }

    /// Sequentially probe clip numbers at zero volume until the busy line
    /// fails to assert. Blocking — setup-only.
    fn probe_clip_count(&mut self) -> u16 {
        self.link.set_volume(0);
        self.link.delay_ms(100);

        let mut count = 1;
        while count < MAX_PROBE_CLIPS {
            self.link.play_clip(count);
            self.link.delay_ms(PROBE_SETTLE_MS);
            if self.link.busy() == PinState::High {
                // Busy never asserted: this clip number doesn't exist.
                self.link.stop();
                count -= 1;
                break;
            }
            self.link.stop();
            self.link.delay_ms(PROBE_SETTLE_MS);
            count += 1;
        }
        count
    }

    fn finish(&mut self) {
        self.state = AutomationState::Idle;
        if let Some(cb) = self.done.take() {
            cb();
        }
    }
}

impl<L: AudioLink> Automation for AudioClipAutomation<L> {
    fn name(&self) -> &'static str {
        "audio-clip"
    }

    fn setup(&mut self) -> Result<()> {
        info!("setting up audio clip automation");
        self.link.begin();
        self.link.delay_ms(BOOT_DELAY_MS);

        self.clip_count = self.probe_clip_count();
        info!("audio: found {} clips", self.clip_count);

        self.link.set_volume(DEFAULT_VOLUME);
        Ok(())
    }

    fn run(&mut self, _now_ms: u32, done: DoneCallback) {
        if self.clip_count == 0 {
            // Unsupported content: log and skip the playback, but keep the
            // lifecycle intact so the caller still gets its completion.
            warn!("audio: no clips available, skipping playback");
        } else {
            info!("[action] playing clip {}", self.clip);
            self.link.play_clip(self.clip);
            self.clip += 1;
            if self.clip > self.clip_count {
                self.clip = 1;
            }
        }
        self.done = Some(done);
        self.state = AutomationState::AwaitingPeer;
    }

    fn update(&mut self, _now_ms: u32) {
        if self.state == AutomationState::Idle {
            return;
        }

        // Level check, gated behind the active state: HIGH = module idle.
        if self.link.busy() == PinState::High {
            info!("[action] clip finished");
            self.link.stop();
            self.finish();
        }
    }

    fn cancel(&mut self) {
        if self.state == AutomationState::Idle {
            return;
        }
        info!("[cancel] audio automation cancelled");
        self.link.stop();
        self.done = None;
        self.state = AutomationState::Idle;
    }

    fn state(&self) -> AutomationState {
        self.state
    }
}
