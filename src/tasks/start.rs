// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Start button poller.

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use log::info;

use crate::drivers::Button;
use crate::sync::Shared;

pub const POLL_MS: u32 = 200;

pub async fn run<P: InputPin, D: DelayNs>(
    button: &mut Button<P>,
    shared: &Shared,
    mut delay: D,
) -> ! {
    loop {
        if button.poll_pressed() {
            info!("start: pressed");
            shared.events.mission_start.signal(());
        }
        delay.delay_ms(POLL_MS).await;
    }
}
