//! Transmit Framer
//!
//! Sends bytes as asynchronous serial frames keyed onto the tone
//! oscillator:
//!
//! ```text
//!  idle  │start│ b7 │ b6 │ b5 │ b4 │ b3 │ b2 │ b1 │ b0 │stop│ idle
//!  MARK  │SPACE│ data bits, MSB first, 1=MARK 0=SPACE │MARK│ MARK
//! ```
//!
//! Each bit is held for one baud period with a busy-wait delay. The
//! transmitter owns the oscillator exclusively while it runs.

use embedded_hal::delay::DelayNs;

use crate::config::{ModemTiming, PREAMBLE_US};
use crate::radio::tone::{CompareTimer, ToneDriver};
use crate::types::Tone;

/// Bits in one frame (start + 8 data + stop)
pub const FRAME_BITS: usize = 10;

/// Tones of one frame, in wire order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameBits {
    byte: u8,
    position: u8,
}

impl FrameBits {
    /// Frame for `byte`
    #[must_use]
    pub const fn new(byte: u8) -> Self {
        Self { byte, position: 0 }
    }

    /// Byte carried by the frame
    #[must_use]
    pub const fn byte(&self) -> u8 {
        self.byte
    }
}

impl Iterator for FrameBits {
    type Item = Tone;

    fn next(&mut self) -> Option<Tone> {
        let tone = match self.position {
            0 => Tone::Space,
            n @ 1..=8 => Tone::for_bit(self.byte & (0x80 >> (n - 1)) != 0),
            9 => Tone::Mark,
            _ => return None,
        };
        self.position += 1;
        Some(tone)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = FRAME_BITS.saturating_sub(usize::from(self.position));
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameBits {}

/// Endless tone sequence for a repeating message
pub fn message_tones(message: &[u8]) -> impl Iterator<Item = Tone> + '_ {
    message.iter().cycle().flat_map(|&byte| FrameBits::new(byte))
}

/// Frame transmitter
pub struct Transmitter<T, D> {
    driver: ToneDriver<T>,
    delay: D,
    timing: ModemTiming,
    frames_sent: u32,
}

impl<T: CompareTimer, D: DelayNs> Transmitter<T, D> {
    /// Create a transmitter
    pub fn new(driver: ToneDriver<T>, delay: D, timing: ModemTiming) -> Self {
        Self {
            driver,
            delay,
            timing,
            frames_sent: 0,
        }
    }

    /// Hold one tone for one baud period
    fn hold(&mut self, tone: Tone) {
        self.driver.set(tone);
        self.delay.delay_us(self.timing.baud_period_us);
    }

    /// Idle on mark so the receiver sees a steady line before the first start bit
    pub fn preamble(&mut self, duration_us: u32) {
        self.driver.set(Tone::Mark);
        self.delay.delay_us(duration_us);
    }

    /// Send one frame
    pub fn send_byte(&mut self, byte: u8) {
        for tone in FrameBits::new(byte) {
            self.hold(tone);
        }
        self.frames_sent = self.frames_sent.wrapping_add(1);
    }

    /// Send each byte of `message` once
    pub fn send(&mut self, message: &[u8]) {
        for &byte in message {
            self.send_byte(byte);
        }
    }

    /// Send `message` forever, calling `on_frame` before each frame
    pub fn run_with<F: FnMut(u8)>(&mut self, message: &[u8], mut on_frame: F) -> ! {
        self.preamble(PREAMBLE_US);

        loop {
            if message.is_empty() {
                self.hold(Tone::Mark);
                continue;
            }

            for &byte in message {
                on_frame(byte);
                self.send_byte(byte);
            }
        }
    }

    /// Send `message` forever
    pub fn run(&mut self, message: &[u8]) -> ! {
        self.run_with(message, |_| {})
    }

    /// Frames sent so far (wrapping)
    #[must_use]
    pub const fn frames_sent(&self) -> u32 {
        self.frames_sent
    }

    /// Link timing
    #[must_use]
    pub const fn timing(&self) -> ModemTiming {
        self.timing
    }

    /// Tone driver
    pub fn driver_mut(&mut self) -> &mut ToneDriver<T> {
        &mut self.driver
    }
}
