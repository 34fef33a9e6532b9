//! Digital Signal Processing
//!
//! Provides the signal-level algorithms of the modem:
//! - Tone synthesis (prescaler/compare search for the tone timer)
//! - Line sampling with a windowed majority filter and hysteresis

pub mod synth;
pub mod sampler;
