//! Receive Frame Decoder
//!
//! Rebuilds asynchronous serial frames from the debounced line without a
//! UART peripheral. The decoder is polled every loop iteration with the
//! elapsed time and never waits.
//!
//! # State machine
//!
//! ```text
//! position:   0      1      2 ..= 9        10
//!           Idle → Start → Bit(1..=8) → Stop → Idle
//! ```
//!
//! A falling edge while idle starts a frame. Each bit is read once, at
//! its midpoint (half a baud period into the bit). Only after a full baud
//! period does the position advance, and the timer keeps the remainder
//! instead of restarting from zero so the sampling phase does not drift
//! across the frame. The stop bit resolves at its midpoint and the
//! decoder is idle again immediately, ready for a back-to-back frame.

use crate::config::{ModemTiming, SAMPLE_PERIOD_US, SAMPLE_WINDOW};
use crate::dsp::sampler::{LineInput, SignalSampler};
use crate::error::FrameError;
use crate::radio::report::{Report, Reporter};
use crate::types::Sample;

/// Position of the start bit
const START: u8 = 1;

/// Position of the stop bit
const STOP: u8 = 10;

/// Outcome of one decoder poll
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DecodeEvent {
    /// Nothing resolved on this poll
    #[default]
    None,
    /// Line was high at the start bit's midpoint
    StartBitError,
    /// Line was low at the stop bit's midpoint
    StopBitError,
    /// A complete frame was received
    ByteDecoded(u8),
}

impl DecodeEvent {
    /// Framing error carried by the event, if any
    #[must_use]
    pub const fn error(&self) -> Option<FrameError> {
        match self {
            Self::StartBitError => Some(FrameError::StartBit),
            Self::StopBitError => Some(FrameError::StopBit),
            Self::None | Self::ByteDecoded(_) => None,
        }
    }

    /// Decoded byte carried by the event, if any
    #[must_use]
    pub const fn byte(&self) -> Option<u8> {
        match self {
            Self::ByteDecoded(value) => Some(*value),
            _ => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for DecodeEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "None"),
            Self::StartBitError => defmt::write!(f, "StartBitError"),
            Self::StopBitError => defmt::write!(f, "StopBitError"),
            Self::ByteDecoded(value) => defmt::write!(f, "Byte({=u8:#x})", value),
        }
    }
}

/// Polling serial frame decoder
#[derive(Clone, Copy, Debug)]
pub struct FrameDecoder {
    /// 0 idle, 1 start, 2..=9 data, 10 stop
    position: u8,
    /// Time into the current bit
    elapsed_us: u32,
    /// Current bit's midpoint already handled
    midpoint: bool,
    /// Data bits shifted in so far, MSB first
    shift: u8,
    /// Bit duration and midpoint
    timing: ModemTiming,
}

impl FrameDecoder {
    /// Create an idle decoder for the given bit duration
    #[must_use]
    pub const fn new(baud_period_us: u32) -> Self {
        Self::with_timing(ModemTiming::new(baud_period_us, SAMPLE_PERIOD_US))
    }

    /// Create a decoder from link timing
    #[must_use]
    pub const fn with_timing(timing: ModemTiming) -> Self {
        Self {
            position: 0,
            elapsed_us: 0,
            midpoint: false,
            shift: 0,
            timing,
        }
    }

    /// Advance by `elapsed_us` with the latest debounced sample
    pub fn advance(&mut self, elapsed_us: u32, sample: Sample) -> DecodeEvent {
        self.elapsed_us = self.elapsed_us.saturating_add(elapsed_us);

        if self.position == 0 {
            if !sample.is_falling_edge() {
                return DecodeEvent::None;
            }
            self.position = START;
            self.midpoint = false;
            self.elapsed_us = 0;
        }

        if !self.midpoint && self.elapsed_us >= self.timing.half_baud_us() {
            self.midpoint = true;
            return self.resolve_midpoint(sample.level);
        }

        if self.elapsed_us >= self.timing.baud_period_us {
            self.position += 1;
            self.elapsed_us -= self.timing.baud_period_us;
            self.midpoint = false;
        }

        DecodeEvent::None
    }

    fn resolve_midpoint(&mut self, level: bool) -> DecodeEvent {
        match self.position {
            START if level => {
                self.position = 0;
                DecodeEvent::StartBitError
            }
            START => DecodeEvent::None,
            STOP => {
                self.position = 0;
                if level {
                    DecodeEvent::ByteDecoded(self.shift)
                } else {
                    DecodeEvent::StopBitError
                }
            }
            _ => {
                self.shift = (self.shift << 1) | u8::from(level);
                DecodeEvent::None
            }
        }
    }

    /// A frame is in flight
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.position != 0
    }

    /// Current frame position (0 idle, 1 start, 2..=9 data, 10 stop)
    #[must_use]
    pub const fn position(&self) -> u8 {
        self.position
    }

    /// Time into the current bit
    #[must_use]
    pub const fn elapsed_us(&self) -> u32 {
        self.elapsed_us
    }

    /// Link timing the decoder samples with
    #[must_use]
    pub const fn timing(&self) -> ModemTiming {
        self.timing
    }

    /// Abandon any frame in flight
    pub fn reset(&mut self) {
        self.position = 0;
        self.midpoint = false;
        self.elapsed_us = 0;
    }
}

/// Result of one receive loop iteration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Step {
    /// Debounced line observation
    pub sample: Sample,
    /// Decoder outcome
    pub event: DecodeEvent,
    /// Diagnostic line to emit
    pub report: Option<Report>,
    /// Frame in flight (drives the trigger pin)
    pub busy: bool,
}

/// Sampler, decoder and reporter advanced together
#[derive(Clone, Debug)]
pub struct ReceiveChain<const N: usize = SAMPLE_WINDOW> {
    sampler: SignalSampler<N>,
    decoder: FrameDecoder,
    reporter: Reporter,
}

impl<const N: usize> ReceiveChain<N> {
    /// Create a chain for the given link timing
    #[must_use]
    pub const fn new(timing: ModemTiming) -> Self {
        Self::with_reporter(timing, Reporter::new())
    }

    /// Create a chain with a custom reporter
    #[must_use]
    pub const fn with_reporter(timing: ModemTiming, reporter: Reporter) -> Self {
        Self {
            sampler: SignalSampler::new(timing.sample_period_us),
            decoder: FrameDecoder::with_timing(timing),
            reporter,
        }
    }

    /// Run one loop iteration
    pub fn step<L: LineInput + ?Sized>(&mut self, elapsed_us: u32, line: &mut L) -> Step {
        let sample = self.sampler.tick(elapsed_us, line);
        let event = self.decoder.advance(elapsed_us, sample);
        let report = self.reporter.observe(elapsed_us, event);
        Step {
            sample,
            event,
            report,
            busy: self.decoder.is_busy(),
        }
    }

    /// Line sampler
    #[must_use]
    pub const fn sampler(&self) -> &SignalSampler<N> {
        &self.sampler
    }

    /// Frame decoder
    #[must_use]
    pub const fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }
}
