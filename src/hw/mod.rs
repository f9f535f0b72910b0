// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level wrappers for the STM32F767 board.

pub mod pins;
pub mod tick_timer;
pub mod usart;

pub use pins::{BoardPins, GpioOut, InPin, OutPin};
pub use tick_timer::TickTimer;
pub use usart::{Usart, UsartRx};
