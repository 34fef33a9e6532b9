//! Shared types used across the modem firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

/// Logical line tone
///
/// Mark and space carry binary 1 and 0; `None` stops the oscillator and
/// leaves the output at a steady level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    /// Oscillator disabled
    #[default]
    None,
    /// Mark tone (binary 1, stop bit, idle line)
    Mark,
    /// Space tone (binary 0, start bit)
    Space,
}

impl Tone {
    /// All tones, in table order
    pub const ALL: [Self; 3] = [Self::None, Self::Mark, Self::Space];

    /// Tone that carries a data bit
    #[must_use]
    pub const fn for_bit(bit: bool) -> Self {
        if bit {
            Self::Mark
        } else {
            Self::Space
        }
    }

    /// Line level a demodulator recovers for this tone
    #[must_use]
    pub const fn level(self) -> bool {
        matches!(self, Self::Mark)
    }

    /// Next tone in manual keying (mark and space alternate, none starts on mark)
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Mark => Self::Space,
            Self::Space | Self::None => Self::Mark,
        }
    }

    /// Index into a per-tone table
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::None => 0,
            Self::Mark => 1,
            Self::Space => 2,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Mark => write!(f, "mark"),
            Self::Space => write!(f, "space"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Tone {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "NONE"),
            Self::Mark => defmt::write!(f, "MARK"),
            Self::Space => defmt::write!(f, "SPACE"),
        }
    }
}

/// Tone timer clock prescaler
///
/// The discrete divider set of the compare timer. `Stopped` removes the
/// clock from the counter entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Prescaler {
    /// No clock, counter frozen
    #[default]
    Stopped,
    /// Timer clock / 1
    Div1,
    /// Timer clock / 8
    Div8,
    /// Timer clock / 64
    Div64,
    /// Timer clock / 256
    Div256,
    /// Timer clock / 1024
    Div1024,
}

impl Prescaler {
    /// Dividers tried by the synthesizer, in search order
    pub const DIVIDERS: [Self; 5] = [
        Self::Div1,
        Self::Div8,
        Self::Div64,
        Self::Div256,
        Self::Div1024,
    ];

    /// Division factor (0 when stopped)
    #[must_use]
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Stopped => 0,
            Self::Div1 => 1,
            Self::Div8 => 8,
            Self::Div64 => 64,
            Self::Div256 => 256,
            Self::Div1024 => 1024,
        }
    }

    /// Check whether the counter is clocked
    #[must_use]
    pub const fn is_running(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl fmt::Display for Prescaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            other => write!(f, "/{}", other.divisor()),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Prescaler {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Stopped => defmt::write!(f, "stopped"),
            other => defmt::write!(f, "/{}", other.divisor()),
        }
    }
}

/// One observation of the debounced line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Sample {
    /// Debounced level (true = high/mark)
    pub level: bool,
    /// Level changed on this observation
    pub edge: bool,
}

impl Sample {
    /// Create a sample
    #[must_use]
    pub const fn new(level: bool, edge: bool) -> Self {
        Self { level, edge }
    }

    /// High-to-low transition (start of a frame)
    #[must_use]
    pub const fn is_falling_edge(&self) -> bool {
        self.edge && !self.level
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Sample {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Sample({}, edge={})", self.level, self.edge);
    }
}
