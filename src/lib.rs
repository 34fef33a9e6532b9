//! RTTY Modem Firmware Library
//!
//! This library provides the core functionality for a bare-metal
//! two-tone (FSK) telegraphy modem on the STM32G474. One node keys a
//! hardware oscillator between a mark and a space tone; the other node
//! samples the demodulated line and rebuilds the asynchronous serial
//! bitstream without a UART receiver.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │   rtty-tx (framer loop)   │   rtty-rx (receive chain loop)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                       RADIO LAYER                            │
//! │  Tone driver │ Transmit framer │ Frame decoder │ Reporter    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                        DSP LAYER                             │
//! │      Frequency synthesizer   │   Signal sampler (debounce)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / TIMING LAYER                         │
//! │  Overflow clock │ Compare timer │ GPIO │ USART (embassy-stm32)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Polling, not interrupts**: every loop iteration advances each
//!   state machine by the time elapsed since the previous one
//! - **Functional core, imperative shell**: all timing logic takes
//!   `elapsed_us` values, so it runs unchanged against synthetic clocks
//! - **No unsafe in application code**: register access goes through the PAC
//! - **Explicit error handling**: fallible setup returns `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// embassy-stm32 backed implementations of the core's hardware traits.
#[cfg(feature = "embedded")]
pub mod hal;

/// Digital Signal Processing
///
/// Tone synthesis search and the debouncing line sampler.
pub mod dsp;

/// Modem Control Logic
///
/// Tone driver, transmit framer, receive decoder and diagnostics.
pub mod radio;

/// Elapsed-time sources for the polling loops
pub mod timing;

/// Error types
pub mod error;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::types::*;

    // Common traits
    pub use crate::timing::ElapsedClock;
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::{OutputPin, StatefulOutputPin};

    // Embassy
    pub use embassy_time::Delay;

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
