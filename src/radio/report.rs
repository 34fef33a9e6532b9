//! Diagnostic Reports
//!
//! Turns decoder events into human-readable lines for the diagnostic
//! serial port: one line per decoded byte or frame error, and a
//! heartbeat once per second when nothing arrives.

use core::fmt::{self, Write as _};

use embedded_io::Write;
use heapless::String;

use crate::config::{HEARTBEAT_INTERVAL_US, REPORT_LINE_CAPACITY};
use crate::error::FrameError;
use crate::radio::receive::DecodeEvent;

/// What a report line announces
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    /// Heartbeat, nothing decoded during the interval
    Idle,
    /// A frame was discarded
    FrameError(FrameError),
    /// A byte was decoded
    Byte(u8),
}

/// One diagnostic line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Report {
    /// Report counter (wrapping)
    pub sequence: u8,
    /// Report content
    pub kind: ReportKind,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ReportKind::Idle => write!(f, "{} : Nothing new.", self.sequence),
            ReportKind::FrameError(kind) => write!(f, "{} : Frame error: {}.", self.sequence, kind),
            ReportKind::Byte(value @ 32..=126) => {
                write!(f, "{} : {} : '{}'", self.sequence, value, char::from(value))
            }
            ReportKind::Byte(value) => write!(f, "{} : {}", self.sequence, value),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Report {
    fn format(&self, f: defmt::Formatter) {
        match self.kind {
            ReportKind::Idle => defmt::write!(f, "#{} idle", self.sequence),
            ReportKind::FrameError(kind) => defmt::write!(f, "#{} error {}", self.sequence, kind),
            ReportKind::Byte(value) => defmt::write!(f, "#{} byte {=u8:#x}", self.sequence, value),
        }
    }
}

/// Heartbeat and event report generator
#[derive(Clone, Copy, Debug)]
pub struct Reporter {
    /// Time since the last decoded byte or heartbeat
    elapsed_us: u32,
    /// Heartbeat period
    interval_us: u32,
    /// Last sequence number handed out
    sequence: u8,
}

impl Reporter {
    /// Create a reporter with the default one-second heartbeat
    #[must_use]
    pub const fn new() -> Self {
        Self::with_interval(HEARTBEAT_INTERVAL_US)
    }

    /// Create a reporter with an explicit heartbeat period
    #[must_use]
    pub const fn with_interval(interval_us: u32) -> Self {
        Self {
            elapsed_us: 0,
            interval_us,
            sequence: 0,
        }
    }

    fn next(&mut self, kind: ReportKind) -> Report {
        self.sequence = self.sequence.wrapping_add(1);
        Report {
            sequence: self.sequence,
            kind,
        }
    }

    /// Account for `elapsed_us` and the decoder's latest event
    ///
    /// Frame errors do not restart the heartbeat interval; decoded bytes do.
    pub fn observe(&mut self, elapsed_us: u32, event: DecodeEvent) -> Option<Report> {
        self.elapsed_us = self.elapsed_us.saturating_add(elapsed_us);

        match event {
            DecodeEvent::None => {
                if self.elapsed_us >= self.interval_us {
                    self.elapsed_us = 0;
                    Some(self.next(ReportKind::Idle))
                } else {
                    None
                }
            }
            DecodeEvent::StartBitError => Some(self.next(ReportKind::FrameError(FrameError::StartBit))),
            DecodeEvent::StopBitError => Some(self.next(ReportKind::FrameError(FrameError::StopBit))),
            DecodeEvent::ByteDecoded(value) => {
                self.elapsed_us = 0;
                Some(self.next(ReportKind::Byte(value)))
            }
        }
    }

    /// Sequence number of the last report
    #[must_use]
    pub const fn sequence(&self) -> u8 {
        self.sequence
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

/// One formatted report line, newline included
pub type ReportLine = String<REPORT_LINE_CAPACITY>;

/// Format a report as a newline-terminated line
#[must_use]
pub fn format_line(report: &Report) -> ReportLine {
    let mut line = ReportLine::new();
    // The longest report is well under the line capacity
    let _ = writeln!(line, "{report}");
    line
}

/// Writes report lines to a byte sink (the diagnostic serial port)
pub struct ReportWriter<W> {
    sink: W,
}

impl<W: Write> ReportWriter<W> {
    /// Wrap a byte sink
    pub const fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Write one report line
    ///
    /// # Errors
    ///
    /// Propagates the sink's write error.
    pub fn write(&mut self, report: &Report) -> Result<(), W::Error> {
        self.sink.write_all(format_line(report).as_bytes())
    }

    /// Write raw bytes with no line framing
    ///
    /// # Errors
    ///
    /// Propagates the sink's write error.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<(), W::Error> {
        self.sink.write_all(bytes)
    }

    /// Underlying sink
    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Release the sink
    pub fn into_inner(self) -> W {
        self.sink
    }
}
