// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `log` backend that never waits on the console.
//!
//! Each record is formatted into a stack line first, then appended to a shared RAM buffer under a
//! short critical section. A low-priority task later drains the buffer to any [`fmt::Write`] sink
//! (the debug USART on the board), so the step interrupt is only masked for a copy.

use core::cell::{Cell, RefCell};
use core::fmt::{self, Write};

use critical_section::Mutex;
use heapless::String;
use log::{LevelFilter, Log, Metadata, Record};

pub const BUFFER_LEN: usize = 1024;
/// Longest single record, terminator included. Longer records are dropped.
pub const LINE_LEN: usize = 160;

const OVERFLOW_MARKER: &str = "[log overflow]\r\n";

pub struct BufferedLogger {
    level: LevelFilter,
    buffer: Mutex<RefCell<String<BUFFER_LEN>>>,
    overflowed: Mutex<Cell<bool>>,
}

impl BufferedLogger {
    pub const fn new(level: LevelFilter) -> Self {
        Self {
            level,
            buffer: Mutex::new(RefCell::new(String::new())),
            overflowed: Mutex::new(Cell::new(false)),
        }
    }

    /// Install as the global logger.
    pub fn install(&'static self) {
        if log::set_logger(self).is_ok() {
            log::set_max_level(self.level);
        }
    }

    /// Write everything buffered so far to `out`, followed by a marker if records were lost.
    pub fn drain<W: Write>(&self, out: &mut W) -> fmt::Result {
        let (pending, overflowed) = critical_section::with(|cs| {
            let pending = core::mem::take(&mut *self.buffer.borrow_ref_mut(cs));
            let overflowed = self.overflowed.borrow(cs).replace(false);
            (pending, overflowed)
        });
        out.write_str(&pending)?;
        if overflowed {
            out.write_str(OVERFLOW_MARKER)?;
        }
        Ok(())
    }

    fn append(&self, line: &str) {
        critical_section::with(|cs| {
            if self.buffer.borrow_ref_mut(cs).push_str(line).is_err() {
                self.overflowed.borrow(cs).set(true);
            }
        });
    }

    fn mark_overflow(&self) {
        critical_section::with(|cs| self.overflowed.borrow(cs).set(true));
    }
}

impl Log for BufferedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut line: String<LINE_LEN> = String::new();
        match write!(line, "[{}] {}\r\n", record.level(), record.args()) {
            Ok(()) => self.append(&line),
            Err(_) => self.mark_overflow(),
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    fn emit(logger: &BufferedLogger, level: Level, args: fmt::Arguments) {
        logger.log(&Record::builder().level(level).args(args).build());
    }

    fn drained(logger: &BufferedLogger) -> std::string::String {
        let mut out = std::string::String::new();
        logger.drain(&mut out).unwrap();
        out
    }

    #[test]
    fn records_come_out_in_order() {
        let logger = BufferedLogger::new(LevelFilter::Info);
        emit(&logger, Level::Info, format_args!("motion: finished at {} pulses", 8733));
        emit(&logger, Level::Warn, format_args!("heading {:.1}", 12.5f32));
        assert_eq!(
            drained(&logger),
            "[INFO] motion: finished at 8733 pulses\r\n[WARN] heading 12.5\r\n"
        );
        assert_eq!(drained(&logger), "");
    }

    #[test]
    fn filtered_levels_are_skipped() {
        let logger = BufferedLogger::new(LevelFilter::Info);
        emit(&logger, Level::Debug, format_args!("noise"));
        assert_eq!(drained(&logger), "");
    }

    #[test]
    fn oversized_record_is_dropped_whole() {
        let logger = BufferedLogger::new(LevelFilter::Info);
        let long = [b'x'; LINE_LEN];
        let long = core::str::from_utf8(&long).unwrap();
        emit(&logger, Level::Info, format_args!("{long}"));
        emit(&logger, Level::Info, format_args!("after"));
        assert_eq!(drained(&logger), "[INFO] after\r\n[log overflow]\r\n");
    }

    #[test]
    fn full_buffer_keeps_earlier_records() {
        let logger = BufferedLogger::new(LevelFilter::Info);
        // 100 bytes per line, ten fit.
        let body = [b'y'; 91];
        let body = core::str::from_utf8(&body).unwrap();
        for _ in 0..11 {
            emit(&logger, Level::Info, format_args!("{body}"));
        }
        let out = drained(&logger);
        assert_eq!(out.matches("[INFO]").count(), 10);
        assert!(out.ends_with(OVERFLOW_MARKER));
        assert_eq!(drained(&logger), "");
    }
}
