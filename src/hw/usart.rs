// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer.
//!
//! [`Usart`] is the blocking transmit half used by the debug console and the logger.
//! [`UsartRx`] is the receive half of a sensor link: its interrupt handler drains the data
//! register into a [`ByteQueue`] for the matching decoder task.
//!
//! To access the debug terminal on the host machine, connect to the ST-LINK USB port and use
//! ```
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::fmt;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Event, Instance, Pins, Rx, Serial, Tx},
};

use crate::sync::ByteQueue;

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    /// Transmit-only port. The receive half is dropped.
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    /// Both halves, with the receive interrupt enabled.
    pub fn with_rx<PINS: Pins<U>>(mut serial: Serial<U, PINS>) -> (Self, UsartRx<U>) {
        serial.listen(Event::Rxne);
        let (tx, rx) = serial.split();
        (Self { tx }, UsartRx { rx, dropped: 0 })
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

pub struct UsartRx<U: Instance> {
    rx: Rx<U>,
    dropped: u32,
}

impl<U: Instance> UsartRx<U> {
    /// Move every received byte into `queue`. Call from the USART interrupt.
    ///
    /// Bytes that find the queue full are counted and discarded; a framing or overrun error ends
    /// the drain (reading clears it).
    pub fn drain(&mut self, queue: &ByteQueue) {
        while let Ok(byte) = self.rx.read() {
            if queue.try_send(byte).is_err() {
                self.dropped = self.dropped.wrapping_add(1);
            }
        }
    }

    /// Bytes lost to a full queue since start-up.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
