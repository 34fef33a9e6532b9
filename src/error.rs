//! Error types
//!
//! Frame errors are non-fatal and reported per frame; synthesis errors
//! only happen at startup and halt the firmware.

use thiserror::Error;

/// Framing error detected by the receive decoder
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Line was high (mark) at the midpoint of the start bit
    #[error("start bit")]
    StartBit,

    /// Line was low (space) at the midpoint of the stop bit
    #[error("stop bit")]
    StopBit,
}

/// Tone synthesis failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SynthError {
    /// No prescaler yields a compare value within the register width
    #[error("no divider/compare pair reaches {target_hz} Hz")]
    Unreachable {
        /// Requested tone frequency
        target_hz: u32,
    },
}

#[cfg(feature = "embedded")]
impl defmt::Format for FrameError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::StartBit => defmt::write!(f, "StartBit"),
            Self::StopBit => defmt::write!(f, "StopBit"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SynthError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Unreachable { target_hz } => defmt::write!(f, "Unreachable({} Hz)", target_hz),
        }
    }
}

/// Result alias for tone synthesis
pub type SynthResult<T> = Result<T, SynthError>;
