//! Hardware Abstraction Layer
//!
//! Provides embassy-stm32 implementations of the core's hardware traits.
//! This module isolates hardware-specific code; everything above it only
//! sees `ElapsedClock`, `CompareTimer`, `LineInput` and byte sinks.

pub mod gpio;
pub mod serial;
pub mod timer;
