//! Fatal Fault Handling
//!
//! A tone the hardware cannot produce means every frame would be wrong.
//! Rather than transmit garbage the firmware stops before the main loop
//! and blinks a pattern that cannot be mistaken for normal activity:
//! a burst of slow toggles followed by a burst of fast ones, forever.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::StatefulOutputPin;

/// One burst of the fault pattern
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Burst {
    /// Number of LED toggles
    pub toggles: u8,
    /// Delay after each toggle in milliseconds
    pub delay_ms: u32,
}

/// The repeating fault pattern
pub const FAULT_PATTERN: [Burst; 2] = [
    Burst {
        toggles: 8,
        delay_ms: 25,
    },
    Burst {
        toggles: 16,
        delay_ms: 15,
    },
];

/// Endless sequence of per-toggle delays of the fault pattern
#[derive(Clone, Copy, Debug, Default)]
pub struct FaultBlink {
    burst: usize,
    toggle: u8,
}

impl FaultBlink {
    /// Start at the first toggle of the first burst
    #[must_use]
    pub const fn new() -> Self {
        Self {
            burst: 0,
            toggle: 0,
        }
    }

    /// Toggles in one full cycle of the pattern
    #[must_use]
    pub fn cycle_len() -> usize {
        FAULT_PATTERN.iter().map(|b| usize::from(b.toggles)).sum()
    }

    /// Delay after the next toggle, advancing through the pattern
    pub fn next_delay_ms(&mut self) -> u32 {
        let burst = FAULT_PATTERN[self.burst];
        self.toggle += 1;
        if self.toggle >= burst.toggles {
            self.toggle = 0;
            self.burst = (self.burst + 1) % FAULT_PATTERN.len();
        }
        burst.delay_ms
    }
}

impl Iterator for FaultBlink {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        Some(self.next_delay_ms())
    }
}

/// Blink the fault pattern on `led` forever
pub fn halt<P: StatefulOutputPin, D: DelayNs>(led: &mut P, delay: &mut D) -> ! {
    let mut blink = FaultBlink::new();
    loop {
        // Nothing left to report a pin error to
        let _ = led.toggle();
        delay.delay_ms(blink.next_delay_ms());
    }
}
