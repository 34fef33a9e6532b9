//! Elapsed-Time Sources
//!
//! The main loops never block on a clock interrupt. Each iteration asks
//! an [`ElapsedClock`] how much time passed since the previous poll and
//! feeds that amount to every state machine. On hardware the answer is
//! quantized: a free-running timer's overflow flag is polled and, when
//! set, cleared and counted as one fixed quantum. The loop body must
//! finish well within one quantum or overflows are lost.

use crate::config::TICK_QUANTUM_US;
use crate::types::Prescaler;

/// Source of "time elapsed since the last poll"
pub trait ElapsedClock {
    /// Microseconds elapsed since the previous call
    fn poll_elapsed_us(&mut self) -> u32;
}

impl<C: ElapsedClock + ?Sized> ElapsedClock for &mut C {
    fn poll_elapsed_us(&mut self) -> u32 {
        (**self).poll_elapsed_us()
    }
}

/// Clock that converts observed overflow flags into fixed quanta
///
/// `overflowed` must return true at most once per overflow, clearing the
/// flag it observed.
pub struct QuantumClock<F> {
    overflowed: F,
    quantum_us: u32,
    total_us: u64,
}

impl<F: FnMut() -> bool> QuantumClock<F> {
    /// Create a clock with the default quantum
    pub fn new(overflowed: F) -> Self {
        Self::with_quantum(overflowed, TICK_QUANTUM_US)
    }

    /// Create a clock with an explicit quantum
    pub fn with_quantum(overflowed: F, quantum_us: u32) -> Self {
        Self {
            overflowed,
            quantum_us,
            total_us: 0,
        }
    }

    /// Time represented by one overflow
    #[must_use]
    pub const fn quantum_us(&self) -> u32 {
        self.quantum_us
    }

    /// Total time observed since creation
    #[must_use]
    pub const fn total_us(&self) -> u64 {
        self.total_us
    }
}

impl<F: FnMut() -> bool> ElapsedClock for QuantumClock<F> {
    fn poll_elapsed_us(&mut self) -> u32 {
        if (self.overflowed)() {
            self.total_us += u64::from(self.quantum_us);
            self.quantum_us
        } else {
            0
        }
    }
}

/// Synthetic clock advancing a fixed step per poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ManualClock {
    step_us: u32,
    now_us: u64,
}

impl ManualClock {
    /// Create a clock that reports `step_us` on every poll
    #[must_use]
    pub const fn new(step_us: u32) -> Self {
        Self { step_us, now_us: 0 }
    }

    /// Change the step reported by subsequent polls
    pub fn set_step(&mut self, step_us: u32) {
        self.step_us = step_us;
    }

    /// Time reported so far
    #[must_use]
    pub const fn now_us(&self) -> u64 {
        self.now_us
    }
}

impl ElapsedClock for ManualClock {
    fn poll_elapsed_us(&mut self) -> u32 {
        self.now_us += u64::from(self.step_us);
        self.step_us
    }
}

/// Counter rate of the tick timer (1 count per microsecond)
pub const TICK_COUNTER_HZ: u32 = 1_000_000;

/// Prescaler and auto-reload register values of a 16-bit up-counter
///
/// The counter runs at `clock / (prescaler + 1)` and restarts after
/// reaching `reload`, so one period lasts `reload + 1` counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterSetup {
    /// PSC register value (divider minus one)
    pub prescaler: u16,
    /// ARR register value (period in counts minus one)
    pub reload: u16,
}

impl CounterSetup {
    /// Tick timer counting microseconds and overflowing every `quantum_us`
    #[must_use]
    pub fn tick(clock_hz: u32, quantum_us: u32) -> Self {
        let divider = (clock_hz / TICK_COUNTER_HZ).max(1);
        Self {
            prescaler: saturate(divider - 1),
            reload: saturate(quantum_us.saturating_sub(1)),
        }
    }

    /// Tone timer for a divider/compare pair (`None` when stopped)
    ///
    /// The compare value doubles as the reload so the counter restarts
    /// on every match.
    #[must_use]
    pub const fn tone(prescaler: Prescaler, compare: u16) -> Option<Self> {
        if !prescaler.is_running() {
            return None;
        }
        // Largest divisor is 1024
        Some(Self {
            prescaler: (prescaler.divisor() - 1) as u16,
            reload: compare,
        })
    }
}

fn saturate(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
