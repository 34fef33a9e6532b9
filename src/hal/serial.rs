//! Diagnostic Serial Port
//!
//! Blocking USART used only for human-readable report lines (and, in
//! manual keying mode, for reading keystrokes). Writes spin on the data
//! register, which is acceptable at the report rate.

use embassy_stm32::mode::Blocking;
use embassy_stm32::usart::{Config, UartTx};

use crate::config::SERIAL_BAUD;
use crate::radio::report::ReportWriter;

/// Report writer on a blocking USART transmitter
pub type SerialLog<'d> = ReportWriter<UartTx<'d, Blocking>>;

/// USART configuration: 8 data bits, no parity, one stop bit
#[must_use]
pub fn serial_config() -> Config {
    let mut config = Config::default();
    config.baudrate = SERIAL_BAUD;
    config
}
