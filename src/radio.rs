//! Modem Control Logic
//!
//! State machines and business logic for both link roles.
//! Implements the functional core of the modem.

pub mod tone;
pub mod transmit;
pub mod receive;
pub mod report;
pub mod fault;
