//! RTTY Transmitter
//!
//! Entry point for the transmitting node. Synthesizes the mark and space
//! tones for the tone timer's clock, then keys the message forever.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use embassy_stm32::gpio::{Level, Output, OutputType, Speed};
use embassy_stm32::peripherals::TIM3;
use embassy_stm32::timer::simple_pwm::PwmPin;
use {defmt_rtt as _, panic_probe as _};

use rtty_modem::dsp::synth::ToneTable;
use rtty_modem::hal::gpio::TriggerPin;
use rtty_modem::hal::timer::ToneTimer;
use rtty_modem::prelude::*;
use rtty_modem::radio::fault;
use rtty_modem::radio::tone::ToneDriver;
use rtty_modem::radio::transmit::Transmitter;

/// Main entry point
#[entry]
fn main() -> ! {
    info!("RTTY Transmitter v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    // Status LED doubles as the fault indicator
    let mut led = Output::new(p.PA5, Level::Low, Speed::Low);
    let mut trigger = TriggerPin::new(Output::new(p.PA1, Level::Low, Speed::Low));

    // TIM3 CH1 on PA6 toggles on every compare match
    let _tone_pin: PwmPin<'_, TIM3, _> = PwmPin::new_ch1(p.PA6, OutputType::PushPull);
    let timer = ToneTimer::new(p.TIM3);
    let clock_hz = timer.clock_hz();

    let table = match ToneTable::new(clock_hz, MARK_HZ, SPACE_HZ, TONE_MAX_COMPARE) {
        Ok(table) => table,
        Err(e) => {
            error!("Tone synthesis failed at {}Hz: {}", clock_hz, e);
            fault::halt(&mut led, &mut Delay)
        }
    };

    info!("Mark  {}Hz: {}", MARK_HZ, table.get(Tone::Mark));
    info!("Space {}Hz: {}", SPACE_HZ, table.get(Tone::Space));

    let driver = ToneDriver::new(timer, table);
    let mut transmitter = Transmitter::new(driver, Delay, ModemTiming::DEFAULT);

    #[cfg(feature = "manual-keying")]
    manual_keying(&mut transmitter, p.USART2, p.PA3, p.PA2, &mut led, &mut trigger);

    #[cfg(not(feature = "manual-keying"))]
    send_message(&mut transmitter, &mut led, &mut trigger);
}

/// Key the configured message forever, toggling the trigger per frame
#[cfg(not(feature = "manual-keying"))]
fn send_message<T: rtty_modem::radio::tone::CompareTimer>(
    transmitter: &mut Transmitter<T, Delay>,
    led: &mut Output<'static>,
    trigger: &mut TriggerPin<'static>,
) -> ! {
    info!("Sending {} byte message at {}", MESSAGE.len(), ModemTiming::DEFAULT);
    led.set_high();
    transmitter.run_with(MESSAGE, |_| trigger.toggle())
}

/// Echo each byte received on the serial port and flip mark/space
#[cfg(feature = "manual-keying")]
fn manual_keying<T: rtty_modem::radio::tone::CompareTimer>(
    transmitter: &mut Transmitter<T, Delay>,
    usart: embassy_stm32::peripherals::USART2,
    rx: embassy_stm32::peripherals::PA3,
    tx: embassy_stm32::peripherals::PA2,
    led: &mut Output<'static>,
    trigger: &mut TriggerPin<'static>,
) -> ! {
    use embassy_stm32::usart::Uart;
    use rtty_modem::hal::serial::{serial_config, SerialLog};

    let uart = match Uart::new_blocking(usart, rx, tx, serial_config()) {
        Ok(uart) => uart,
        Err(_) => {
            error!("Serial configuration rejected");
            fault::halt(led, &mut Delay)
        }
    };
    let (tx, mut rx) = uart.split();
    let mut echo = SerialLog::new(tx);

    info!("Manual keying: each received byte toggles the tone");
    let mut byte = [0u8; 1];
    loop {
        if rx.blocking_read(&mut byte).is_err() {
            warn!("Serial read error");
            continue;
        }
        if echo.write_raw(&byte).is_err() {
            warn!("Serial echo failed");
        }
        let tone = transmitter.driver_mut().toggle();
        trigger.set(tone.level());
        debug!("Key {=u8:#x} -> {}", byte[0], tone);
    }
}
