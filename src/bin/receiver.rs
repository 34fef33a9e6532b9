//! RTTY Receiver
//!
//! Entry point for the receiving node. Polls the tick timer, samples the
//! demodulated line and decodes frames in a single loop that never
//! blocks, reporting each event on the diagnostic serial port.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::usart::UartTx;
use {defmt_rtt as _, panic_probe as _};

use rtty_modem::hal::gpio::{LineIn, TriggerPin};
use rtty_modem::hal::serial::{serial_config, SerialLog};
use rtty_modem::hal::timer::overflow_clock;
use rtty_modem::prelude::*;
use rtty_modem::radio::fault;
use rtty_modem::radio::receive::ReceiveChain;

/// Main entry point
#[entry]
fn main() -> ! {
    info!("RTTY Receiver v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    let mut led = Output::new(p.PA5, Level::Low, Speed::Low);
    let mut trigger = TriggerPin::new(Output::new(p.PA1, Level::Low, Speed::Low));
    let mut line = LineIn::new(Input::new(p.PA0, Pull::None));

    let serial = match UartTx::new_blocking(p.USART2, p.PA2, serial_config()) {
        Ok(serial) => serial,
        Err(_) => {
            error!("Serial configuration rejected");
            fault::halt(&mut led, &mut Delay)
        }
    };
    let mut log = SerialLog::new(serial);

    let mut clock = overflow_clock(p.TIM2, TICK_QUANTUM_US);
    let mut chain: ReceiveChain = ReceiveChain::new(ModemTiming::DEFAULT);

    info!("Receiver ready: {}, {} sample window", ModemTiming::DEFAULT, SAMPLE_WINDOW);
    led.set_high();

    loop {
        let elapsed_us = clock.poll_elapsed_us();
        let step = chain.step(elapsed_us, &mut line);

        trigger.set(step.busy);

        if let Some(e) = step.event.error() {
            warn!("Frame error: {}", e);
        }

        if let Some(report) = step.report {
            debug!("{}", report);
            if log.write(&report).is_err() {
                warn!("Serial write failed");
            }
        }
    }
}
