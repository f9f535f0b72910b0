// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-rate tick interrupt on the TIM6 basic timer.
//!
//! The step generators and soft servos are serviced from this interrupt, so its rate bounds the
//! highest step frequency (`rate / 2`) and the servo pulse resolution (`1 / rate`).

use stm32f7xx_hal::pac;

/// Counter clock after the prescaler.
const COUNTER_HZ: u32 = 1_000_000;

pub struct TickTimer<TIM> {
    tim: TIM,
    rate_hz: u32,
}

impl<TIM> TickTimer<TIM> {
    #[inline]
    pub fn rate_hz(&self) -> u32 {
        self.rate_hz
    }

    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> TIM {
        self.tim
    }
}

impl TickTimer<pac::TIM6> {
    /// Start TIM6 with an update interrupt at `rate_hz`. `timer_clk_hz` is the APB1 timer clock.
    pub fn tim6(tim6: pac::TIM6, timer_clk_hz: u32, rate_hz: u32) -> Self {
        let tim = tim6;
        let rate_hz = rate_hz.clamp(1, COUNTER_HZ);

        // Clock the peripheral
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim6en().set_bit());

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // 1 MHz counter, reload at the tick rate
        let psc = (timer_clk_hz / COUNTER_HZ).saturating_sub(1);
        let arr = (COUNTER_HZ / rate_hz).saturating_sub(1);
        tim.psc.write(|w| unsafe { w.bits(psc) });
        tim.arr.write(|w| unsafe { w.bits(arr) });

        // Only overflow raises the update event, then latch PSC/ARR
        tim.cr1.modify(|_, w| w.urs().set_bit());
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());

        // Update interrupt on, counter on
        tim.dier.modify(|_, w| w.uie().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { tim, rate_hz }
    }

    /// Acknowledge the update interrupt. Call first thing in the handler.
    #[inline]
    pub fn clear_interrupt(&mut self) {
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
    }
}
