//! GPIO Abstractions
//!
//! Type-safe GPIO pin wrappers for the modem.
//! Provides semantic meaning to pins through the type system.

use embassy_stm32::gpio::{Input, Level, Output};

use crate::dsp::sampler::LineInput;

/// Demodulated line input (high = mark)
pub struct LineIn<'d> {
    pin: Input<'d>,
}

impl<'d> LineIn<'d> {
    /// Wrap the input pin
    #[must_use]
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl LineInput for LineIn<'_> {
    fn read_level(&mut self) -> bool {
        self.pin.is_high()
    }
}

/// Trigger output for a scope or logic analyzer
///
/// The receiver holds it high while a frame is being decoded; the
/// transmitter toggles it once per frame.
pub struct TriggerPin<'d> {
    pin: Output<'d>,
}

impl<'d> TriggerPin<'d> {
    /// Create trigger output (starts low)
    #[must_use]
    pub fn new(mut pin: Output<'d>) -> Self {
        pin.set_low();
        Self { pin }
    }

    /// Drive the trigger to `active`
    pub fn set(&mut self, active: bool) {
        self.pin.set_level(if active { Level::High } else { Level::Low });
    }

    /// Flip the trigger
    pub fn toggle(&mut self) {
        self.pin.toggle();
    }
}
