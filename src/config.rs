//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the modem hardware.
//! Tone frequencies, link timing, pin mappings and timer assignments are
//! centralized here. Both ends of the link must agree on the baud period
//! and tones; nothing is negotiated on the wire.

/// Mark tone (binary 1, line idle) in Hz
pub const MARK_HZ: u32 = 2295;

/// Space tone (binary 0) in Hz
pub const SPACE_HZ: u32 = 2125;

/// Duration of one bit on the wire (~45.45 baud)
pub const BAUD_PERIOD_US: u32 = 22_000;

/// Raw line sampling period
pub const SAMPLE_PERIOD_US: u32 = 128;

/// Time represented by one observed timer overflow
pub const TICK_QUANTUM_US: u32 = 128;

/// Number of raw samples in the debounce window (power of two)
pub const SAMPLE_WINDOW: usize = 32;

/// Interval of the "nothing new" heartbeat report
pub const HEARTBEAT_INTERVAL_US: u32 = 1_000_000;

/// Mark idle time before the first transmitted frame
pub const PREAMBLE_US: u32 = 100_000;

/// Largest compare value the 16-bit tone timer accepts
pub const TONE_MAX_COMPARE: u16 = u16::MAX;

/// Diagnostic serial port baud rate
pub const SERIAL_BAUD: u32 = 115_200;

/// Capacity of one formatted diagnostic line
pub const REPORT_LINE_CAPACITY: usize = 48;

/// Message the transmitter repeats forever
pub const MESSAGE: &[u8] = b"RYRYRY DE RTTY MODEM\r\n";

/// Link timing shared by the framer, sampler and decoder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModemTiming {
    /// Duration of one bit in microseconds
    pub baud_period_us: u32,
    /// Raw line sampling period in microseconds
    pub sample_period_us: u32,
}

impl ModemTiming {
    /// Timing used by the firmware binaries
    pub const DEFAULT: Self = Self {
        baud_period_us: BAUD_PERIOD_US,
        sample_period_us: SAMPLE_PERIOD_US,
    };

    /// Create timing from explicit periods
    #[must_use]
    pub const fn new(baud_period_us: u32, sample_period_us: u32) -> Self {
        Self {
            baud_period_us,
            sample_period_us,
        }
    }

    /// Half a baud period (decoder sampling point)
    #[must_use]
    pub const fn half_baud_us(&self) -> u32 {
        self.baud_period_us / 2
    }

    /// Baud rate in milli-baud (45454 for the default 22 ms period)
    #[must_use]
    pub const fn baud_millis(&self) -> u32 {
        1_000_000_000 / self.baud_period_us
    }

    /// Raw samples taken per bit
    #[must_use]
    pub const fn samples_per_bit(&self) -> u32 {
        self.baud_period_us / self.sample_period_us
    }
}

impl Default for ModemTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ModemTiming {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{}us/bit, {}us/sample",
            self.baud_period_us,
            self.sample_period_us
        );
    }
}

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments (Nucleo-G474RE)

    /// Status LED, also shows the fault pattern
    pub const LED_STATUS: &str = "PA5";

    /// Demodulated line input
    pub const LINE_IN: &str = "PA0";

    /// Decode-in-progress / per-frame trigger output
    pub const TRIGGER: &str = "PA1";

    /// Tone output (TIM3 CH1, toggle on compare match)
    pub const TONE_OUT: &str = "PA6";

    /// Diagnostic USART2 TX
    pub const SERIAL_TX: &str = "PA2";

    /// Diagnostic USART2 RX
    pub const SERIAL_RX: &str = "PA3";
}

/// Timer assignments
pub mod timers {
    //! Hardware timer assignments

    /// Free-running timer whose overflow flag quantizes elapsed time
    pub const TICK: u8 = 2;

    /// Tone oscillator (output compare toggle)
    pub const TONE: u8 = 3;
}
