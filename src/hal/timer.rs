//! Timer Abstractions
//!
//! Two timers drive the modem: a free-running tick timer whose overflow
//! flag quantizes elapsed time for the polling loop, and a compare timer
//! that toggles the tone pin on every match.

use embassy_stm32::timer::low_level::{OutputCompareMode, Timer};
use embassy_stm32::timer::{Channel, GeneralInstance4Channel};
use embassy_stm32::Peripheral;

use crate::radio::tone::CompareTimer;
use crate::timing::{CounterSetup, ElapsedClock, QuantumClock};
use crate::types::Prescaler;

/// Start a timer that overflows once per `quantum_us` and poll it as a clock
///
/// The returned clock reports one quantum each time it observes (and
/// clears) the update flag.
pub fn overflow_clock<'d, T: GeneralInstance4Channel + 'd>(
    tim: impl Peripheral<P = T> + 'd,
    quantum_us: u32,
) -> impl ElapsedClock + 'd {
    let timer = Timer::new(tim);
    let clock_hz = timer.get_clock_frequency().0;

    let setup = CounterSetup::tick(clock_hz, quantum_us);

    timer.stop();
    let regs = timer.regs_core();
    regs.psc().write_value(setup.prescaler);
    regs.arr().write(|r| r.set_arr(setup.reload));
    // Latch PSC/ARR; this raises the update flag, so clear it
    regs.egr().write(|r| r.set_ug(true));
    timer.clear_update_interrupt();
    timer.start();

    defmt::debug!(
        "tick timer: {}Hz clock, psc={}, arr={}, {}us quantum",
        clock_hz,
        setup.prescaler,
        setup.reload,
        quantum_us
    );

    QuantumClock::with_quantum(move || timer.clear_update_interrupt(), quantum_us)
}

/// Tone oscillator on channel 1 of a general purpose timer
///
/// The counter restarts at the compare value (the reload), and the
/// channel toggles its pin on every match, so the output frequency is
/// `clock / divider / (compare + 1) / 2`.
pub struct ToneTimer<'d, T: GeneralInstance4Channel> {
    timer: Timer<'d, T>,
}

impl<'d, T: GeneralInstance4Channel> ToneTimer<'d, T> {
    /// Configure the timer for toggle-on-match output (initially stopped)
    ///
    /// The channel 1 pin must already be switched to its timer alternate
    /// function.
    pub fn new(tim: impl Peripheral<P = T> + 'd) -> Self {
        let timer = Timer::new(tim);
        timer.stop();
        timer.set_output_compare_mode(Channel::Ch1, OutputCompareMode::Toggle);
        timer.enable_channel(Channel::Ch1, true);
        Self { timer }
    }

    /// Timer input clock in Hz (before the prescaler)
    #[must_use]
    pub fn clock_hz(&self) -> u32 {
        self.timer.get_clock_frequency().0
    }
}

impl<T: GeneralInstance4Channel> CompareTimer for ToneTimer<'_, T> {
    fn program(&mut self, prescaler: Prescaler, compare: u16) {
        let Some(setup) = CounterSetup::tone(prescaler, compare) else {
            self.timer.stop();
            return;
        };

        let regs = self.timer.regs_core();
        regs.psc().write_value(setup.prescaler);
        regs.arr().write(|r| r.set_arr(setup.reload));
        self.timer.set_compare_value(Channel::Ch1, u32::from(compare));
        regs.egr().write(|r| r.set_ug(true));
        self.timer.start();
    }

    fn reset_counter(&mut self) {
        self.timer.reset();
    }
}
