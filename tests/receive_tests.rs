//! Frame Decoder Tests
//!
//! Tests for the polling receive state machine on clean line levels.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test receive_tests

use rtty_modem::config::ModemTiming;
use rtty_modem::error::FrameError;
use rtty_modem::radio::receive::{DecodeEvent, FrameDecoder, ReceiveChain};
use rtty_modem::types::Sample;

const BAUD_US: u32 = 22_000;
const TICK_US: u32 = 128;

/// Piecewise-constant line levels: (level, duration in us)
#[derive(Default)]
struct Line {
    segments: Vec<(bool, u32)>,
}

impl Line {
    fn hold(mut self, level: bool, duration_us: u32) -> Self {
        self.segments.push((level, duration_us));
        self
    }

    fn idle(self, duration_us: u32) -> Self {
        self.hold(true, duration_us)
    }

    /// One frame: start, 8 data bits MSB first, stop
    fn frame(mut self, byte: u8) -> Self {
        self.segments.push((false, BAUD_US));
        for bit in (0..8).rev() {
            self.segments.push((byte & (1 << bit) != 0, BAUD_US));
        }
        self.segments.push((true, BAUD_US));
        self
    }

    fn duration_us(&self) -> u32 {
        self.segments.iter().map(|&(_, d)| d).sum()
    }

    fn level_at(&self, t_us: u32) -> bool {
        let mut end = 0;
        for &(level, duration) in &self.segments {
            end += duration;
            if t_us < end {
                return level;
            }
        }
        true
    }
}

/// Poll `decoder` every `tick_us` across the line, returning non-empty events
fn decode(decoder: &mut FrameDecoder, line: &Line, tick_us: u32) -> Vec<DecodeEvent> {
    let mut previous = true;
    let mut events = Vec::new();
    let mut t = 0;
    while t < line.duration_us() {
        t += tick_us;
        let level = line.level_at(t);
        let sample = Sample::new(level, level != previous);
        previous = level;
        let event = decoder.advance(tick_us, sample);
        if event != DecodeEvent::None {
            events.push(event);
        }
    }
    events
}

fn decoder() -> FrameDecoder {
    FrameDecoder::with_timing(ModemTiming::DEFAULT)
}

// =============================================================================
// Decoded Frames
// =============================================================================

#[test]
fn test_decodes_single_frame() {
    let line = Line::default().idle(5_000).frame(0x41).idle(30_000);
    let mut d = decoder();
    assert_eq!(decode(&mut d, &line, TICK_US), [DecodeEvent::ByteDecoded(0x41)]);
    assert!(!d.is_busy());
}

#[test]
fn test_decodes_bit_patterns() {
    for byte in [0x00, 0x01, 0x55, 0x80, 0xAA, 0xFE, 0xFF] {
        let line = Line::default().idle(5_000).frame(byte).idle(30_000);
        let mut d = decoder();
        assert_eq!(
            decode(&mut d, &line, TICK_US),
            [DecodeEvent::ByteDecoded(byte)],
            "byte {byte:#04x}"
        );
    }
}

#[test]
fn test_back_to_back_frames() {
    let message = b"RYRY\r\n";
    let mut line = Line::default().idle(5_000);
    for &byte in message {
        line = line.frame(byte);
    }
    let line = line.idle(30_000);

    let mut d = decoder();
    let bytes: Vec<u8> = decode(&mut d, &line, TICK_US)
        .iter()
        .map(|e| e.byte().expect("framing error"))
        .collect();
    assert_eq!(bytes, message);
}

#[test]
fn test_coarse_tick_keeps_phase() {
    // 1.5 ms polling does not divide the bit period evenly
    let line = Line::default().idle(5_000).frame(0x5A).frame(0xC3).idle(30_000);
    let mut d = decoder();
    assert_eq!(
        decode(&mut d, &line, 1_500),
        [DecodeEvent::ByteDecoded(0x5A), DecodeEvent::ByteDecoded(0xC3)]
    );
}

#[test]
fn test_long_idle_produces_nothing() {
    let line = Line::default().idle(2_000_000);
    let mut d = decoder();
    assert!(decode(&mut d, &line, TICK_US).is_empty());
    assert_eq!(d.position(), 0);
}

// =============================================================================
// Framing Errors
// =============================================================================

#[test]
fn test_short_glitch_is_start_bit_error() {
    let line = Line::default().idle(5_000).hold(false, 3_000).idle(50_000);
    let mut d = decoder();
    let events = decode(&mut d, &line, TICK_US);
    assert_eq!(events, [DecodeEvent::StartBitError]);
    assert_eq!(events[0].error(), Some(FrameError::StartBit));
    assert!(!d.is_busy());
}

#[test]
fn test_low_stop_bit_is_stop_bit_error() {
    // Line stuck low from the start bit on
    let line = Line::default().idle(5_000).hold(false, 10 * BAUD_US + 20_000).idle(50_000);
    let mut d = decoder();
    let events = decode(&mut d, &line, TICK_US);
    assert_eq!(events, [DecodeEvent::StopBitError]);
    assert_eq!(events[0].error(), Some(FrameError::StopBit));
    assert_eq!(events[0].byte(), None);
}

#[test]
fn test_recovers_after_errors() {
    let line = Line::default()
        .idle(5_000)
        .hold(false, 2_000)
        .idle(40_000)
        .frame(0x42)
        .idle(30_000);
    let mut d = decoder();
    assert_eq!(
        decode(&mut d, &line, TICK_US),
        [DecodeEvent::StartBitError, DecodeEvent::ByteDecoded(0x42)]
    );
}

#[test]
fn test_rising_edge_while_idle_ignored() {
    let mut d = decoder();
    assert_eq!(d.advance(TICK_US, Sample::new(true, true)), DecodeEvent::None);
    assert_eq!(d.advance(TICK_US, Sample::new(false, false)), DecodeEvent::None);
    assert!(!d.is_busy());
}

// =============================================================================
// Decoder State
// =============================================================================

#[test]
fn test_positions_through_frame() {
    let mut d = decoder();
    d.advance(0, Sample::new(false, true));
    assert_eq!(d.position(), 1);

    // Midpoint, then the end of each bit; low only for the start bit
    for expected in 2..=10 {
        let level = expected > 2;
        assert_eq!(d.advance(BAUD_US / 2, Sample::new(level, false)), DecodeEvent::None);
        d.advance(BAUD_US / 2, Sample::new(level, false));
        assert_eq!(d.position(), expected);
    }

    assert_eq!(d.advance(BAUD_US / 2, Sample::new(true, false)), DecodeEvent::ByteDecoded(0xFF));
    assert_eq!(d.position(), 0);
}

#[test]
fn test_midpoint_at_half_baud() {
    let timing = ModemTiming::new(1_001, 128);
    let mut d = FrameDecoder::with_timing(timing);
    assert_eq!(d.timing(), timing);
    d.advance(0, Sample::new(false, true));

    // Start bit resolves at half_baud_us (500), not a full period
    d.advance(timing.half_baud_us() - 1, Sample::new(true, false));
    assert_eq!(d.advance(1, Sample::new(true, false)), DecodeEvent::StartBitError);
    assert!(!d.is_busy());
}

#[test]
fn test_new_uses_default_sampling() {
    let d = FrameDecoder::new(BAUD_US);
    assert_eq!(d.timing(), ModemTiming::DEFAULT);
}

#[test]
fn test_reset_abandons_frame() {
    let mut d = decoder();
    d.advance(0, Sample::new(false, true));
    d.advance(5_000, Sample::new(false, false));
    assert!(d.is_busy());
    d.reset();
    assert!(!d.is_busy());
    assert_eq!(d.elapsed_us(), 0);
}

#[test]
fn test_event_accessors() {
    assert_eq!(DecodeEvent::ByteDecoded(7).byte(), Some(7));
    assert_eq!(DecodeEvent::ByteDecoded(7).error(), None);
    assert_eq!(DecodeEvent::None.byte(), None);
    assert_eq!(DecodeEvent::default(), DecodeEvent::None);
}

// =============================================================================
// Receive Chain
// =============================================================================

#[test]
fn test_chain_busy_during_frame() {
    let line = Line::default().idle(10_000).frame(0x41).idle(30_000);
    let mut chain: ReceiveChain = ReceiveChain::new(ModemTiming::DEFAULT);

    let mut t = 0;
    let mut busy_us = 0;
    let mut bytes = Vec::new();
    while t < line.duration_us() {
        t += TICK_US;
        let step = chain.step(TICK_US, &mut || line.level_at(t));
        if step.busy {
            busy_us += TICK_US;
        }
        if let Some(byte) = step.event.byte() {
            bytes.push(byte);
        }
    }

    assert_eq!(bytes, [0x41]);
    assert!(!chain.decoder().is_busy());
    // Busy from the start edge to the stop bit's midpoint (9.5 bits)
    let expected = 9 * BAUD_US + BAUD_US / 2;
    assert!(busy_us.abs_diff(expected) <= 2 * TICK_US, "busy for {busy_us}us");
}
