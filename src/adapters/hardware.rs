//! Hardware link adapters.
//!
//! Implements the automation port traits against real peripherals using raw
//! ESP-IDF sys calls, plus in-memory stand-ins for host builds. The
//! [`build_automation`] factory resolves the configured
//! [`AutomationKind`](crate::config::AutomationKind) into a boxed
//! [`Automation`] wired to the right link.
//!
//! Only the selected variant's pins are configured; the assignments in
//! [`pins`](crate::pins) overlap between variants on purpose.

#[cfg(target_os = "espidf")]
use embedded_hal::digital::PinState;

#[cfg(target_os = "espidf")]
use crate::automation::ports::{AudioLink, CommandLink, EdgeLink, SerialLink};
#[cfg(target_os = "espidf")]
use crate::automation::PeerCommand;
use crate::automation::{
    Automation, AudioClipAutomation, CompanionAutomation, FallingEdgeHandshake,
    FixedDelayAutomation, LightingAutomation, RisingEdgeHandshake,
};
use crate::config::{AutomationKind, KioskConfig};
use crate::error::Result;
#[cfg(target_os = "espidf")]
use crate::pins;

// ───────────────────────────────────────────────────────────────
// Raw GPIO / UART helpers (ESP-IDF)
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod hw {
    use esp_idf_svc::sys::*;

    use crate::error::LinkError;

    pub fn configure_output(pin: i32) -> Result<(), LinkError> {
        configure(pin, gpio_mode_t_GPIO_MODE_OUTPUT, false)
    }

    /// Output that can also be read back (loopback sensing).
    pub fn configure_inout(pin: i32) -> Result<(), LinkError> {
        configure(pin, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT, false)
    }

    pub fn configure_input(pin: i32, pull_up: bool) -> Result<(), LinkError> {
        configure(pin, gpio_mode_t_GPIO_MODE_INPUT, pull_up)
    }

    fn configure(pin: i32, mode: gpio_mode_t, pull_up: bool) -> Result<(), LinkError> {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode,
            pull_up_en: if pull_up {
                gpio_pullup_t_GPIO_PULLUP_ENABLE
            } else {
                gpio_pullup_t_GPIO_PULLUP_DISABLE
            },
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: called once from single-threaded startup.
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(LinkError::GpioConfigFailed);
        }
        Ok(())
    }

    pub fn gpio_write(pin: i32, high: bool) {
        // SAFETY: register write to an already-configured output pin.
        unsafe {
            gpio_set_level(pin, u32::from(high));
        }
    }

    pub fn gpio_read(pin: i32) -> bool {
        // SAFETY: read-only register access on a configured input pin.
        (unsafe { gpio_get_level(pin) }) != 0
    }

    /// Install UART1 with the given pins and baud rate.
    pub fn uart_open(tx: i32, rx: i32, baud: u32) -> Result<(), LinkError> {
        let cfg = uart_config_t {
            baud_rate: baud as i32,
            data_bits: uart_word_length_t_UART_DATA_8_BITS,
            parity: uart_parity_t_UART_PARITY_DISABLE,
            stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
            flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
            ..Default::default()
        };
        // SAFETY: UART1 is claimed exactly once; the active automation
        // variant is the sole user.
        unsafe {
            let ret = uart_driver_install(UART_PORT, 512, 512, 0, core::ptr::null_mut(), 0);
            if ret != ESP_OK as i32 {
                return Err(LinkError::UartInitFailed);
            }
            let ret = uart_param_config(UART_PORT, &cfg);
            if ret != ESP_OK as i32 {
                return Err(LinkError::UartInitFailed);
            }
            let ret = uart_set_pin(UART_PORT, tx, rx, -1, -1);
            if ret != ESP_OK as i32 {
                return Err(LinkError::UartInitFailed);
            }
        }
        Ok(())
    }

    pub fn uart_write(data: &[u8]) -> Result<(), LinkError> {
        // SAFETY: driver installed by uart_open before any write.
        let written = unsafe {
            uart_write_bytes(UART_PORT, data.as_ptr().cast(), data.len())
        };
        if written < 0 || written as usize != data.len() {
            return Err(LinkError::WriteFailed);
        }
        Ok(())
    }

    /// Non-blocking read of whatever bytes are already in the RX FIFO.
    pub fn uart_read_available(buf: &mut [u8]) -> usize {
        // SAFETY: driver installed by uart_open; zero timeout never blocks.
        let n = unsafe {
            uart_read_bytes(UART_PORT, buf.as_mut_ptr().cast(), buf.len() as u32, 0)
        };
        if n < 0 { 0 } else { n as usize }
    }

    const UART_PORT: uart_port_t = 1;
}

#[cfg(target_os = "espidf")]
fn delay_blocking(ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(ms);
}

// ───────────────────────────────────────────────────────────────
// Edge-handshake link
// ───────────────────────────────────────────────────────────────

/// GPIO edge link. The driven line is always [`pins::EDGE_TX_GPIO`]; which
/// line is sensed depends on the variant wiring.
#[cfg(target_os = "espidf")]
pub struct EspEdgeLink {
    sense_pin: i32,
}

#[cfg(target_os = "espidf")]
impl EspEdgeLink {
    /// Loopback wiring: the completion edge is read back from the driven
    /// line itself (rising-edge variant).
    pub fn loopback() -> Result<Self> {
        hw::configure_inout(pins::EDGE_TX_GPIO)?;
        Ok(Self {
            sense_pin: pins::EDGE_TX_GPIO,
        })
    }

    /// Peer wiring: a dedicated input senses the peer's line
    /// (falling-edge variant, external pull-up on the peer side).
    pub fn peer() -> Result<Self> {
        hw::configure_output(pins::EDGE_TX_GPIO)?;
        hw::configure_input(pins::EDGE_RX_GPIO, true)?;
        Ok(Self {
            sense_pin: pins::EDGE_RX_GPIO,
        })
    }
}

#[cfg(target_os = "espidf")]
impl EdgeLink for EspEdgeLink {
    fn drive(&mut self, level: PinState) {
        hw::gpio_write(pins::EDGE_TX_GPIO, level == PinState::High);
    }

    fn sense(&mut self) -> PinState {
        if hw::gpio_read(self.sense_pin) {
            PinState::High
        } else {
            PinState::Low
        }
    }

    fn settle(&mut self, ms: u32) {
        delay_blocking(ms);
    }
}

// ───────────────────────────────────────────────────────────────
// Audio module link (DY-SV17F class, 0xAA command frames)
// ───────────────────────────────────────────────────────────────

/// UART link to the audio module plus its busy line.
///
/// Command frames are `0xAA cmd len data… checksum` where the checksum is
/// the byte sum of everything before it.
#[cfg(target_os = "espidf")]
pub struct EspAudioLink;

#[cfg(target_os = "espidf")]
impl EspAudioLink {
    pub fn new() -> Result<Self> {
        hw::configure_input(pins::AUDIO_BUSY_GPIO, true)?;
        Ok(Self)
    }

    fn send_frame(&mut self, cmd: u8, data: &[u8]) {
        let mut frame = heapless::Vec::<u8, 8>::new();
        let _ = frame.push(0xAA);
        let _ = frame.push(cmd);
        let _ = frame.push(data.len() as u8);
        for &b in data {
            let _ = frame.push(b);
        }
        let sum = frame.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        let _ = frame.push(sum);
        if hw::uart_write(&frame).is_err() {
            log::warn!("audio link: frame 0x{cmd:02X} write failed");
        }
    }
}

#[cfg(target_os = "espidf")]
impl AudioLink for EspAudioLink {
    fn begin(&mut self) {
        if hw::uart_open(pins::AUDIO_TX_GPIO, pins::AUDIO_RX_GPIO, pins::AUDIO_BAUD).is_err() {
            log::warn!("audio link: UART bring-up failed");
        }
    }

    fn play_clip(&mut self, clip: u16) {
        self.send_frame(0x07, &clip.to_be_bytes());
    }

    fn stop(&mut self) {
        self.send_frame(0x04, &[]);
    }

    fn set_volume(&mut self, volume: u8) {
        self.send_frame(0x13, &[volume.min(30)]);
    }

    fn busy(&mut self) -> PinState {
        if hw::gpio_read(pins::AUDIO_BUSY_GPIO) {
            PinState::High
        } else {
            PinState::Low
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        delay_blocking(ms);
    }
}

// ───────────────────────────────────────────────────────────────
// Lighting serial link
// ───────────────────────────────────────────────────────────────

/// Newline-terminated serial link to the lighting controller.
#[cfg(target_os = "espidf")]
pub struct EspSerialLink;

#[cfg(target_os = "espidf")]
impl EspSerialLink {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "espidf")]
impl SerialLink for EspSerialLink {
    fn begin(&mut self) {
        if hw::uart_open(pins::LIGHT_TX_GPIO, pins::LIGHT_RX_GPIO, pins::LIGHT_BAUD).is_err() {
            log::warn!("lighting link: UART bring-up failed");
        }
    }

    fn send_line(&mut self, line: &str) {
        if hw::uart_write(line.as_bytes())
            .and_then(|()| hw::uart_write(b"\n"))
            .is_err()
        {
            log::warn!("lighting link: write failed");
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        delay_blocking(ms);
    }
}

// ───────────────────────────────────────────────────────────────
// Companion command link
// ───────────────────────────────────────────────────────────────

/// Framed command link to the companion controller.
///
/// Wire frame: `0xA5 0x5A payload[4] xor` where `xor` is the XOR of the
/// payload bytes. Anything that fails framing or decoding is dropped and
/// counted in the status byte.
#[cfg(target_os = "espidf")]
pub struct EspCommandLink {
    rx_buf: heapless::Vec<u8, 64>,
    frame_errors: u8,
}

#[cfg(target_os = "espidf")]
const FRAME_SYNC: [u8; 2] = [0xA5, 0x5A];
#[cfg(target_os = "espidf")]
const FRAME_LEN: usize = 2 + PeerCommand::WIRE_SIZE + 1;

#[cfg(target_os = "espidf")]
impl EspCommandLink {
    pub fn new() -> Self {
        Self {
            rx_buf: heapless::Vec::new(),
            frame_errors: 0,
        }
    }

    /// Pull pending UART bytes into the reassembly buffer.
    fn fill(&mut self) {
        let mut chunk = [0u8; 32];
        loop {
            let n = hw::uart_read_available(&mut chunk);
            if n == 0 {
                break;
            }
            for &b in &chunk[..n] {
                if self.rx_buf.push(b).is_err() {
                    // Overflow: drop the oldest frame's worth and resync.
                    self.rx_buf.clear();
                    self.frame_errors = self.frame_errors.wrapping_add(1);
                    let _ = self.rx_buf.push(b);
                }
            }
        }
    }

    /// Extract the next complete frame from the reassembly buffer.
    fn next_frame(&mut self) -> Option<[u8; PeerCommand::WIRE_SIZE]> {
        loop {
            // Resync: discard until the buffer starts with the sync pair.
            while !self.rx_buf.is_empty() && !self.rx_buf.starts_with(&FRAME_SYNC[..1]) {
                self.rx_buf.remove(0);
                self.frame_errors = self.frame_errors.wrapping_add(1);
            }
            if self.rx_buf.len() >= 2 && self.rx_buf[1] != FRAME_SYNC[1] {
                self.rx_buf.remove(0);
                self.frame_errors = self.frame_errors.wrapping_add(1);
                continue;
            }
            if self.rx_buf.len() < FRAME_LEN {
                return None;
            }

            let mut payload = [0u8; PeerCommand::WIRE_SIZE];
            payload.copy_from_slice(&self.rx_buf[2..2 + PeerCommand::WIRE_SIZE]);
            let xor = payload.iter().fold(0u8, |acc, &b| acc ^ b);
            let ok = xor == self.rx_buf[2 + PeerCommand::WIRE_SIZE];

            for _ in 0..FRAME_LEN {
                self.rx_buf.remove(0);
            }
            if ok {
                return Some(payload);
            }
            self.frame_errors = self.frame_errors.wrapping_add(1);
        }
    }
}

#[cfg(target_os = "espidf")]
impl CommandLink for EspCommandLink {
    fn begin(&mut self) {
        if hw::uart_open(
            pins::COMPANION_TX_GPIO,
            pins::COMPANION_RX_GPIO,
            pins::COMPANION_BAUD,
        )
        .is_err()
        {
            log::warn!("companion link: UART bring-up failed");
        }
    }

    fn send(&mut self, cmd: PeerCommand) {
        let payload = cmd.encode();
        let xor = payload.iter().fold(0u8, |acc, &b| acc ^ b);
        let mut frame = [0u8; FRAME_LEN];
        frame[..2].copy_from_slice(&FRAME_SYNC);
        frame[2..2 + PeerCommand::WIRE_SIZE].copy_from_slice(&payload);
        frame[FRAME_LEN - 1] = xor;
        if hw::uart_write(&frame).is_err() {
            log::warn!("companion link: send {cmd:?} failed");
        }
    }

    fn poll(&mut self) -> Option<PeerCommand> {
        self.fill();
        while let Some(payload) = self.next_frame() {
            if let Some(cmd) = PeerCommand::decode(payload) {
                return Some(cmd);
            }
            self.frame_errors = self.frame_errors.wrapping_add(1);
        }
        None
    }

    fn status(&self) -> u8 {
        self.frame_errors
    }

    fn delay_ms(&mut self, ms: u32) {
        delay_blocking(ms);
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulations
// ───────────────────────────────────────────────────────────────

/// In-memory links for host builds. The edge sim is wired loopback; the
/// companion sim acknowledges START with DONE on the next poll.
#[cfg(not(target_os = "espidf"))]
pub mod sim {
    use embedded_hal::digital::PinState;
    use log::debug;

    use crate::automation::ports::{AudioLink, CommandLink, EdgeLink, SerialLink};
    use crate::automation::PeerCommand;

    pub struct SimEdgeLink {
        level: PinState,
    }

    impl SimEdgeLink {
        pub fn new() -> Self {
            Self {
                level: PinState::Low,
            }
        }
    }

    impl EdgeLink for SimEdgeLink {
        fn drive(&mut self, level: PinState) {
            self.level = level;
        }

        fn sense(&mut self) -> PinState {
            self.level
        }

        fn settle(&mut self, _ms: u32) {}
    }

    pub struct SimAudioLink {
        clips: u16,
        playing: bool,
    }

    impl SimAudioLink {
        pub fn new(clips: u16) -> Self {
            Self {
                clips,
                playing: false,
            }
        }
    }

    impl AudioLink for SimAudioLink {
        fn begin(&mut self) {}

        fn play_clip(&mut self, clip: u16) {
            self.playing = clip >= 1 && clip <= self.clips;
            debug!("sim audio: play clip {clip} (playing={})", self.playing);
        }

        fn stop(&mut self) {
            self.playing = false;
        }

        fn set_volume(&mut self, volume: u8) {
            debug!("sim audio: volume {volume}");
        }

        fn busy(&mut self) -> PinState {
            // Sim clips finish immediately after one busy sample.
            if self.playing {
                self.playing = false;
                PinState::Low
            } else {
                PinState::High
            }
        }

        fn delay_ms(&mut self, _ms: u32) {}
    }

    pub struct SimSerialLink;

    impl SimSerialLink {
        pub fn new() -> Self {
            Self
        }
    }

    impl SerialLink for SimSerialLink {
        fn begin(&mut self) {}

        fn send_line(&mut self, line: &str) {
            debug!("sim serial: {line}");
        }

        fn delay_ms(&mut self, _ms: u32) {}
    }

    pub struct SimCommandLink {
        pending: Option<PeerCommand>,
    }

    impl SimCommandLink {
        pub fn new() -> Self {
            Self { pending: None }
        }
    }

    impl CommandLink for SimCommandLink {
        fn begin(&mut self) {}

        fn send(&mut self, cmd: PeerCommand) {
            debug!("sim companion: sent {cmd:?}");
            if cmd == PeerCommand::Start {
                self.pending = Some(PeerCommand::Done);
            }
        }

        fn poll(&mut self) -> Option<PeerCommand> {
            self.pending.take()
        }

        fn status(&self) -> u8 {
            0
        }

        fn delay_ms(&mut self, _ms: u32) {}
    }
}

// ───────────────────────────────────────────────────────────────
// Factory
// ───────────────────────────────────────────────────────────────

/// Resolve the configured automation variant into a concrete instance
/// wired to its hardware (or simulated) link.
#[cfg(target_os = "espidf")]
pub fn build_automation(config: &KioskConfig) -> Result<Box<dyn Automation>> {
    Ok(match config.automation {
        AutomationKind::FixedDelay => {
            Box::new(FixedDelayAutomation::new(config.fixed_delay_hold_ms))
        }
        AutomationKind::RisingEdge => Box::new(RisingEdgeHandshake::new(EspEdgeLink::loopback()?)),
        AutomationKind::FallingEdge => Box::new(FallingEdgeHandshake::new(EspEdgeLink::peer()?)),
        AutomationKind::Audio => Box::new(AudioClipAutomation::new(EspAudioLink::new()?)),
        AutomationKind::Lighting => Box::new(LightingAutomation::new(
            EspSerialLink::new(),
            config.lighting_run_time_ms,
        )),
        AutomationKind::Companion => Box::new(CompanionAutomation::new(EspCommandLink::new())),
    })
}

/// Host build: every variant runs against its in-memory link.
#[cfg(not(target_os = "espidf"))]
pub fn build_automation(config: &KioskConfig) -> Result<Box<dyn Automation>> {
    Ok(match config.automation {
        AutomationKind::FixedDelay => {
            Box::new(FixedDelayAutomation::new(config.fixed_delay_hold_ms))
        }
        AutomationKind::RisingEdge => Box::new(RisingEdgeHandshake::new(sim::SimEdgeLink::new())),
        AutomationKind::FallingEdge => Box::new(FallingEdgeHandshake::new(sim::SimEdgeLink::new())),
        AutomationKind::Audio => Box::new(AudioClipAutomation::new(sim::SimAudioLink::new(3))),
        AutomationKind::Lighting => Box::new(LightingAutomation::new(
            sim::SimSerialLink::new(),
            config.lighting_run_time_ms,
        )),
        AutomationKind::Companion => Box::new(CompanionAutomation::new(sim::SimCommandLink::new())),
    })
}
