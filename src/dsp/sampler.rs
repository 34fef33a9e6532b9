//! Line Sampler
//!
//! Recovers a clean binary signal from the noisy demodulated line. Raw
//! levels are taken at a fixed cadence into a circular window whose
//! two-bucket histogram is kept in sync incrementally: each new sample
//! evicts the oldest sample's count and adds its own.
//!
//! The debounced level is a majority vote with hysteresis. With
//! `H = N / 4`, a low output only goes high once `high > low + H`, and a
//! high output only goes low once `low > high + H`. A line sitting near
//! 50% duty therefore never chatters.

use crate::types::Sample;

/// Source of raw line levels
pub trait LineInput {
    /// Read the instantaneous line level (true = high)
    fn read_level(&mut self) -> bool;
}

impl<F: FnMut() -> bool> LineInput for F {
    fn read_level(&mut self) -> bool {
        self()
    }
}

/// Circular window of raw samples with a running histogram
#[derive(Clone, Debug)]
pub struct SampleWindow<const N: usize> {
    /// Raw samples; `index` points at the oldest
    ring: [bool; N],
    /// Next slot to overwrite
    index: usize,
    /// Sample counts: `[low, high]`
    histogram: [u16; 2],
}

impl<const N: usize> SampleWindow<N> {
    const VALID: () = assert!(
        N.is_power_of_two() && N >= 4 && N <= u16::MAX as usize,
        "window size must be a power of two between 4 and 65535"
    );

    /// Create a window filled with low samples
    #[must_use]
    pub const fn new() -> Self {
        let () = Self::VALID;
        Self {
            ring: [false; N],
            index: 0,
            histogram: [N as u16, 0],
        }
    }

    /// Replace the oldest sample with `level`
    pub fn push(&mut self, level: bool) {
        let oldest = self.ring[self.index];
        self.histogram[usize::from(oldest)] -= 1;
        self.ring[self.index] = level;
        self.histogram[usize::from(level)] += 1;
        self.index = (self.index + 1) & (N - 1);
    }

    /// Number of low samples in the window
    #[must_use]
    pub const fn low(&self) -> u16 {
        self.histogram[0]
    }

    /// Number of high samples in the window
    #[must_use]
    pub const fn high(&self) -> u16 {
        self.histogram[1]
    }

    /// Window capacity
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Hysteresis margin (`N / 4`)
    #[must_use]
    pub const fn hysteresis(&self) -> u16 {
        (N / 4) as u16
    }

    /// Majority vote with hysteresis around the previous level
    #[must_use]
    pub const fn vote(&self, previous: bool) -> bool {
        let h = self.hysteresis();
        if previous {
            self.low() <= self.high() + h
        } else {
            self.high() > self.low() + h
        }
    }

    /// Raw samples from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.ring[self.index..]
            .iter()
            .chain(self.ring[..self.index].iter())
            .copied()
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Debouncing sampler driven by elapsed time
#[derive(Clone, Debug)]
pub struct SignalSampler<const N: usize> {
    /// Raw sample window
    window: SampleWindow<N>,
    /// Time between raw samples
    sample_period_us: u32,
    /// Time accumulated toward the next sample
    elapsed_us: u32,
    /// Last debounced level
    level: bool,
}

impl<const N: usize> SignalSampler<N> {
    /// Create a sampler (window starts all low, output low)
    #[must_use]
    pub const fn new(sample_period_us: u32) -> Self {
        Self {
            window: SampleWindow::new(),
            sample_period_us,
            elapsed_us: 0,
            level: false,
        }
    }

    /// Advance by `elapsed_us`, sampling `line` if a sample period has passed
    ///
    /// At most one raw sample is taken per call; leftover time carries
    /// over to the next call.
    pub fn tick<L: LineInput + ?Sized>(&mut self, elapsed_us: u32, line: &mut L) -> Sample {
        self.elapsed_us = self.elapsed_us.saturating_add(elapsed_us);

        if self.elapsed_us < self.sample_period_us {
            return Sample::new(self.level, false);
        }
        self.elapsed_us -= self.sample_period_us;

        self.window.push(line.read_level());

        let previous = self.level;
        self.level = self.window.vote(previous);
        Sample::new(self.level, self.level != previous)
    }

    /// Current debounced level
    #[must_use]
    pub const fn level(&self) -> bool {
        self.level
    }

    /// Raw sample window
    #[must_use]
    pub const fn window(&self) -> &SampleWindow<N> {
        &self.window
    }

    /// Sampling period in microseconds
    #[must_use]
    pub const fn sample_period_us(&self) -> u32 {
        self.sample_period_us
    }
}
