//! Tone Frequency Synthesis
//!
//! Finds the prescaler and compare value that make the tone timer emit a
//! target frequency. This module is testable on the host.
//!
//! # Theory of Operation
//!
//! The tone timer counts at `clock / divider` and toggles its output pin
//! each time the counter matches the compare value, then restarts from
//! zero. One full output cycle therefore takes two matches:
//!
//! ```text
//! FOUT = clock / divider / (compare + 1) / 2
//! ```
//!
//! Only a handful of dividers exist, so every one is tried and the pair
//! with the smallest relative error wins. Rounding and the comparison
//! between candidates are done in integer arithmetic, so the choice is
//! exact and does not depend on float precision.

use crate::error::{SynthError, SynthResult};
use crate::types::{Prescaler, Tone};
#[cfg(feature = "embedded")]
use micromath::F32Ext;

/// Tone timer configuration for one frequency
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneConfig {
    /// Clock divider feeding the counter
    pub prescaler: Prescaler,
    /// Compare (and reload) value
    pub compare: u16,
    /// Relative deviation from the requested frequency, `|actual/target - 1|`
    pub error: f32,
}

impl ToneConfig {
    /// Oscillator disabled (steady output)
    pub const DISABLED: Self = Self {
        prescaler: Prescaler::Stopped,
        compare: 0,
        error: 0.0,
    };

    /// Check whether this configuration stops the oscillator
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        !self.prescaler.is_running()
    }

    /// Frequency produced with the given timer clock (0 when disabled)
    #[must_use]
    pub fn actual_hz(&self, clock_hz: u32) -> f32 {
        if self.is_disabled() {
            return 0.0;
        }
        let ticks = u64::from(self.prescaler.divisor()) * (u64::from(self.compare) + 1) * 2;
        clock_hz as f32 / ticks as f32
    }

    /// Relative error in parts per million (rounded)
    #[must_use]
    pub fn error_ppm(&self) -> u32 {
        (self.error * 1_000_000.0).round() as u32
    }
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self::DISABLED
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ToneConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "{} cmp={} err={}ppm",
            self.prescaler,
            self.compare,
            self.error_ppm()
        );
    }
}

/// One accepted divider/compare pair
#[derive(Clone, Copy, Debug)]
struct Candidate {
    prescaler: Prescaler,
    compare: u16,
    /// `|clock - ideal|` where `ideal = divider * (compare + 1) * 2 * target`
    deviation: u64,
    /// `divider * (compare + 1) * 2 * target`
    ideal: u64,
}

impl Candidate {
    /// Compare relative errors exactly: `dev_a / ideal_a < dev_b / ideal_b`
    fn beats(&self, other: &Self) -> bool {
        u128::from(self.deviation) * u128::from(other.ideal)
            < u128::from(other.deviation) * u128::from(self.ideal)
    }

    fn into_config(self) -> ToneConfig {
        ToneConfig {
            prescaler: self.prescaler,
            compare: self.compare,
            error: self.deviation as f32 / self.ideal as f32,
        }
    }
}

/// Evaluate one divider, returning `None` when the compare value is out of range
fn candidate(clock_hz: u32, target_hz: u32, max_compare: u16, prescaler: Prescaler) -> Option<Candidate> {
    let clock = u64::from(clock_hz);
    let step = u64::from(prescaler.divisor()) * u64::from(target_hz);
    if step == 0 {
        return None;
    }

    // round(clock / divider / target / 2), half up
    let cycles = (clock + step) / (2 * step);
    if cycles == 0 {
        return None;
    }

    let compare = cycles - 1;
    if compare > u64::from(max_compare) {
        return None;
    }

    let ideal = 2 * step * cycles;
    Some(Candidate {
        prescaler,
        compare: compare as u16,
        deviation: clock.abs_diff(ideal),
        ideal,
    })
}

/// Find the prescaler/compare pair closest to `target_hz`
///
/// A target of zero yields [`ToneConfig::DISABLED`] without searching.
/// Ties keep the smaller divider.
///
/// # Errors
///
/// Returns [`SynthError::Unreachable`] when no divider gives a compare
/// value in `0..=max_compare`.
pub fn synthesize(clock_hz: u32, target_hz: u32, max_compare: u16) -> SynthResult<ToneConfig> {
    if target_hz == 0 {
        return Ok(ToneConfig::DISABLED);
    }

    let mut best: Option<Candidate> = None;

    for prescaler in Prescaler::DIVIDERS {
        let Some(found) = candidate(clock_hz, target_hz, max_compare, prescaler) else {
            continue;
        };

        let should_update = match &best {
            None => true,
            Some(current) => found.beats(current),
        };

        if should_update {
            best = Some(found);

            // Exact match, nothing can beat it
            if found.deviation == 0 {
                break;
            }
        }
    }

    best.map(Candidate::into_config)
        .ok_or(SynthError::Unreachable { target_hz })
}

/// Tone timer configurations for none/mark/space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneTable {
    configs: [ToneConfig; 3],
}

impl ToneTable {
    /// Synthesize the mark and space tones for a timer clock
    ///
    /// # Errors
    ///
    /// Fails if either tone is unreachable.
    pub fn new(clock_hz: u32, mark_hz: u32, space_hz: u32, max_compare: u16) -> SynthResult<Self> {
        Ok(Self {
            configs: [
                ToneConfig::DISABLED,
                synthesize(clock_hz, mark_hz, max_compare)?,
                synthesize(clock_hz, space_hz, max_compare)?,
            ],
        })
    }

    /// Configuration for a tone
    #[must_use]
    pub const fn get(&self, tone: Tone) -> ToneConfig {
        self.configs[tone.index()]
    }

    /// Replace one tone's configuration at runtime
    ///
    /// # Errors
    ///
    /// Leaves the table untouched if the new frequency is unreachable.
    pub fn retune(&mut self, tone: Tone, clock_hz: u32, target_hz: u32, max_compare: u16) -> SynthResult<ToneConfig> {
        let config = synthesize(clock_hz, target_hz, max_compare)?;
        self.configs[tone.index()] = config;
        Ok(config)
    }
}

impl Default for ToneTable {
    fn default() -> Self {
        Self {
            configs: [ToneConfig::DISABLED; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_up() {
        // 1000 / (2 * 1000) = 0.5 -> 1 cycle -> compare 0
        let c = candidate(1000, 1000, 10, Prescaler::Div1).unwrap();
        assert_eq!(c.compare, 0);
        assert_eq!(c.ideal, 2000);
    }

    #[test]
    fn zero_cycles_rejected() {
        assert!(candidate(1000, 10_000, 10, Prescaler::Div1).is_none());
    }

    #[test]
    fn compare_over_limit_rejected() {
        // 16 MHz / 4590 = 3485.8 -> compare 3485
        assert!(candidate(16_000_000, 2295, 255, Prescaler::Div1).is_none());
        assert!(candidate(16_000_000, 2295, 3485, Prescaler::Div1).is_some());
    }

    #[test]
    fn exact_candidate_has_zero_deviation() {
        let c = candidate(170_000_000, 2125, u16::MAX, Prescaler::Div1).unwrap();
        assert_eq!(c.compare, 39_999);
        assert_eq!(c.deviation, 0);
    }

    #[test]
    fn beats_compares_relative_error() {
        let a = Candidate { prescaler: Prescaler::Div1, compare: 0, deviation: 1, ideal: 100 };
        let b = Candidate { prescaler: Prescaler::Div8, compare: 0, deviation: 3, ideal: 200 };
        assert!(a.beats(&b));
        assert!(!b.beats(&a));
        assert!(!a.beats(&a));
    }
}
