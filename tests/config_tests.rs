//! Configuration and Constants Tests
//!
//! Tests to verify configuration values are valid and consistent.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test config_tests

use rtty_modem::config::*;
use rtty_modem::dsp::synth::synthesize;
use rtty_modem::radio::report::{format_line, Report, ReportKind};
use rtty_modem::error::FrameError;

// =============================================================================
// Tone Tests
// =============================================================================

#[test]
fn tones_distinct() {
    // 170 Hz shift, mark above space
    assert_eq!(MARK_HZ - SPACE_HZ, 170);
}

#[test]
fn tones_reachable_on_common_clocks() {
    for clock in [4_000_000, 8_000_000, 16_000_000, 170_000_000] {
        for tone in [MARK_HZ, SPACE_HZ] {
            let config = synthesize(clock, tone, TONE_MAX_COMPARE).unwrap();
            assert!(config.error < 1e-3, "{tone}Hz at {clock}Hz: {}", config.error);
        }
    }
}

// =============================================================================
// Timing Tests
// =============================================================================

#[test]
fn default_timing() {
    let timing = ModemTiming::default();
    assert_eq!(timing, ModemTiming::DEFAULT);
    assert_eq!(timing.baud_period_us, BAUD_PERIOD_US);
    assert_eq!(timing.half_baud_us(), 11_000);
    assert_eq!(timing.baud_millis(), 45_454);
}

#[test]
fn sampling_fast_enough() {
    // Decoder needs several samples per bit
    assert!(ModemTiming::DEFAULT.samples_per_bit() >= 4);
    assert_eq!(ModemTiming::DEFAULT.samples_per_bit(), 171);
}

#[test]
fn tick_quantum_within_sample_period() {
    assert!(TICK_QUANTUM_US <= SAMPLE_PERIOD_US);
    assert_eq!(SAMPLE_PERIOD_US % TICK_QUANTUM_US, 0);
}

#[test]
fn filter_delay_within_half_bit() {
    // Debounce needs about 2/3 of the window to flip the output
    let delay_us = (SAMPLE_WINDOW as u32 * 2 / 3 + 1) * SAMPLE_PERIOD_US;
    assert!(delay_us < BAUD_PERIOD_US / 2);
}

#[test]
fn sample_window_power_of_two() {
    assert!(SAMPLE_WINDOW.is_power_of_two());
    assert!(SAMPLE_WINDOW >= 4);
}

#[test]
fn heartbeat_slower_than_frame() {
    assert!(HEARTBEAT_INTERVAL_US > 10 * BAUD_PERIOD_US);
}

#[test]
fn preamble_longer_than_filter_window() {
    assert!(PREAMBLE_US > SAMPLE_WINDOW as u32 * SAMPLE_PERIOD_US);
}

// =============================================================================
// Serial Tests
// =============================================================================

#[test]
fn report_line_fits_capacity() {
    let longest = Report {
        sequence: 255,
        kind: ReportKind::FrameError(FrameError::StartBit),
    };
    assert!(format_line(&longest).len() < REPORT_LINE_CAPACITY);
}

#[test]
fn serial_line_drains_between_frames() {
    // Bytes the port can send in one baud period (10 bits per byte)
    let bytes_per_bit = SERIAL_BAUD / 10 * BAUD_PERIOD_US / 1_000_000;
    assert!(bytes_per_bit as usize >= REPORT_LINE_CAPACITY);
}

#[test]
fn message_ends_with_newline() {
    assert!(!MESSAGE.is_empty());
    assert!(MESSAGE.ends_with(b"\r\n"));
    assert!(MESSAGE.is_ascii());
}

// =============================================================================
// Pin and Timer Tests
// =============================================================================

#[test]
fn pins_unique() {
    let all = [
        pins::LED_STATUS,
        pins::LINE_IN,
        pins::TRIGGER,
        pins::TONE_OUT,
        pins::SERIAL_TX,
        pins::SERIAL_RX,
    ];
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn timers_distinct() {
    assert_ne!(timers::TICK, timers::TONE);
}
