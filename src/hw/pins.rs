// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F767ZI robot controller.
//!
//! Step, direction, enable and servo lines are plain GPIOs driven from the tick interrupt, so they
//! are type-erased and wrapped in [`OutPin`] to expose the `embedded-hal` 1.0 traits the drivers
//! are written against.

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};
use embedded_hal_02::digital::v2 as hal02;
use stm32f7xx_hal::{
    gpio::{gpioa, gpioc, gpiod, Alternate, ErasedPin, Input, Output, PullUp, PushPull},
    pac,
    prelude::*,
};

/// `embedded-hal` 1.0 view of a HAL output pin.
pub struct OutPin<P>(pub P);

impl<P> ErrorType for OutPin<P> {
    type Error = ErrorKind;
}

impl<P: hal02::OutputPin> OutputPin for OutPin<P> {
    #[inline]
    fn set_high(&mut self) -> Result<(), ErrorKind> {
        self.0.set_high().map_err(|_| ErrorKind::Other)
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), ErrorKind> {
        self.0.set_low().map_err(|_| ErrorKind::Other)
    }
}

/// `embedded-hal` 1.0 view of a HAL input pin.
pub struct InPin<P>(pub P);

impl<P> ErrorType for InPin<P> {
    type Error = ErrorKind;
}

impl<P: hal02::InputPin> InputPin for InPin<P> {
    fn is_high(&mut self) -> Result<bool, ErrorKind> {
        self.0.is_high().map_err(|_| ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, ErrorKind> {
        self.0.is_low().map_err(|_| ErrorKind::Other)
    }
}

pub type GpioOut = OutPin<ErasedPin<Output<PushPull>>>;
pub type StartButtonPin = InPin<gpioa::PA0<Input<PullUp>>>;

pub struct BoardPins {
    /// Debug console, ST-LINK virtual COM port
    pub usart3: Usart3Pins,
    /// Code scanner
    pub usart1: Usart1Pins,
    /// Inertial module
    pub usart2: Usart2Pins,
    /// Item camera
    pub usart6: Usart6Pins,
    /// m1..m4 wheels (FL, FR, RL, RR) then the lift
    pub steppers: [StepperPins; 5],
    /// Claw, arm base, carrier turntable
    pub servos: [GpioOut; 3],
    /// S1, active low
    pub start: StartButtonPin,
}

pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

pub struct Usart2Pins {
    pub tx: gpiod::PD5<Alternate<7>>,
    pub rx: gpiod::PD6<Alternate<7>>,
}

pub struct Usart6Pins {
    pub tx: gpioc::PC6<Alternate<8>>,
    pub rx: gpioc::PC7<Alternate<8>>,
}

pub struct StepperPins {
    pub step: GpioOut,
    pub dir: GpioOut,
    /// Driver enable, active low
    pub enable: GpioOut,
}

impl BoardPins {
    pub fn new(
        gpioa: pac::GPIOA,
        gpioc: pac::GPIOC,
        gpiod: pac::GPIOD,
        gpioe: pac::GPIOE,
        gpiog: pac::GPIOG,
    ) -> Self {
        let gpioa = gpioa.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();
        let gpiog = gpiog.split();

        macro_rules! out {
            ($pin:expr) => {
                OutPin($pin.into_push_pull_output().erase())
            };
        }

        Self {
            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            usart2: Usart2Pins {
                tx: gpiod.pd5.into_alternate::<7>(),
                rx: gpiod.pd6.into_alternate::<7>(),
            },

            usart6: Usart6Pins {
                tx: gpioc.pc6.into_alternate::<8>(),
                rx: gpioc.pc7.into_alternate::<8>(),
            },

            steppers: [
                StepperPins {
                    step: out!(gpioe.pe9),
                    dir: out!(gpiod.pd0),
                    enable: out!(gpiod.pd1),
                },
                StepperPins {
                    step: out!(gpioe.pe11),
                    dir: out!(gpiod.pd3),
                    enable: out!(gpiod.pd4),
                },
                StepperPins {
                    step: out!(gpioe.pe13),
                    dir: out!(gpiod.pd7),
                    enable: out!(gpiod.pd10),
                },
                StepperPins {
                    step: out!(gpioe.pe14),
                    dir: out!(gpiog.pg9),
                    enable: out!(gpiog.pg10),
                },
                StepperPins {
                    step: out!(gpioe.pe10),
                    dir: out!(gpiog.pg12),
                    enable: out!(gpiog.pg11),
                },
            ],

            servos: [out!(gpioa.pa3), out!(gpioe.pe5), out!(gpioe.pe6)],

            start: InPin(gpioa.pa0.into_pull_up_input()),
        }
    }
}
