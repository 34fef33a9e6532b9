//! Tone Driver
//!
//! Keys the hardware oscillator between the configured tones. The
//! oscillator is a compare timer that toggles the tone pin on every
//! compare match, so switching tones is a register write and the audio
//! itself needs no CPU time.

use crate::dsp::synth::{ToneConfig, ToneTable};
use crate::types::{Prescaler, Tone};

/// Compare timer driving the tone pin
pub trait CompareTimer {
    /// Load the prescaler and compare threshold (`Stopped` halts the counter)
    fn program(&mut self, prescaler: Prescaler, compare: u16);

    /// Set the counter back to zero
    fn reset_counter(&mut self);
}

impl<T: CompareTimer + ?Sized> CompareTimer for &mut T {
    fn program(&mut self, prescaler: Prescaler, compare: u16) {
        (**self).program(prescaler, compare);
    }

    fn reset_counter(&mut self) {
        (**self).reset_counter();
    }
}

/// Tone oscillator driver
pub struct ToneDriver<T> {
    timer: T,
    table: ToneTable,
    tone: Tone,
}

impl<T: CompareTimer> ToneDriver<T> {
    /// Create a driver; the oscillator is stopped until the first `set`
    pub fn new(mut timer: T, table: ToneTable) -> Self {
        Self::program(&mut timer, &ToneConfig::DISABLED);
        Self {
            timer,
            table,
            tone: Tone::None,
        }
    }

    fn program(timer: &mut T, config: &ToneConfig) {
        timer.program(config.prescaler, config.compare);
        // A stale count above the new threshold would delay the next
        // toggle until the counter wraps.
        timer.reset_counter();
    }

    /// Program an arbitrary configuration
    pub fn apply(&mut self, config: &ToneConfig) {
        Self::program(&mut self.timer, config);
    }

    /// Switch to a tone from the table
    pub fn set(&mut self, tone: Tone) {
        let config = self.table.get(tone);
        self.apply(&config);
        self.tone = tone;
    }

    /// Toggle between mark and space
    pub fn toggle(&mut self) -> Tone {
        let next = self.tone.toggled();
        self.set(next);
        next
    }

    /// Tone currently emitted
    #[must_use]
    pub const fn tone(&self) -> Tone {
        self.tone
    }

    /// Tone table in use
    #[must_use]
    pub const fn table(&self) -> &ToneTable {
        &self.table
    }

    /// Mutable tone table (for runtime retuning)
    ///
    /// Changes take effect at the next `set`.
    pub fn table_mut(&mut self) -> &mut ToneTable {
        &mut self.table
    }

    /// Release the timer
    pub fn into_inner(self) -> T {
        self.timer
    }
}
