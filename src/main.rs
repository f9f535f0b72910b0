// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Firmware entry point: RTIC app wiring the library tasks to the STM32F767.
//!
//! | Priority | Task |
//! | -------- | ---- |
//! | 7 | step/servo tick interrupt (50 kHz) |
//! | 6 | sensor UART receive interrupts |
//! | 4 | motion control loop |
//! | 3 | heading provider |
//! | 2 | mission, vision and scan decoders |
//! | 1 | arm, start button, log output |

#![no_main]
#![no_std]

use embedded_hal_async::delay::DelayNs;
use log::{info, LevelFilter};
use panic_halt as _;
use rtic::app;
use rtic_monotonics::systick::prelude::*;

use stm32f7xx_hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};

use mecabot::{
    arm::{Arm, LiftChannel, ServoId},
    chassis::MotionController,
    config::{ArmConfig, HeadingConfig, MissionConfig, MotionConfig},
    drivers::{
        stepper::{CHANNELS, LIFT_CHANNEL},
        Button, ServoPulses, SoftServo, StepChannel, StepperBank,
    },
    hw::{pins::StartButtonPin, BoardPins, GpioOut, TickTimer, Usart, UsartRx},
    logging::BufferedLogger,
    mission::{MissionRunner, SharedIo},
    sync::Shared as SharedState,
    tasks::{self, HeadingProvider, MotionLoop, VisionConsumer},
};

systick_monotonic!(Mono, 1000);

const TICK_HZ: u32 = 50_000;
const TICK_US: u32 = 1_000_000 / TICK_HZ;
const LOG_FLUSH_MS: u32 = 20;

static SHARED: SharedState = SharedState::new();
static STEPPERS: StepperBank<CHANNELS> = StepperBank::new();
static SERVOS: ServoPulses<{ ServoId::COUNT }> = ServoPulses::new();
static LOGGER: BufferedLogger = BufferedLogger::new(LevelFilter::Info);

/// [`DelayNs`] on the SysTick monotonic. Resolution is one millisecond.
#[derive(Copy, Clone)]
pub struct MonoDelay;

impl DelayNs for MonoDelay {
    async fn delay_ns(&mut self, ns: u32) {
        Mono::delay(ns.div_ceil(1_000_000).millis()).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        Mono::delay(ms.millis()).await;
    }
}

type BoardStepper = StepChannel<GpioOut, GpioOut>;
type BoardArm = Arm<
    &'static ServoPulses<{ ServoId::COUNT }>,
    LiftChannel<'static, CHANNELS>,
    MonoDelay,
>;

/// Interrupt-owned pin drivers.
pub struct StepOutputs {
    channels: [BoardStepper; CHANNELS],
    // Held low for the lifetime of the firmware.
    _enable: [GpioOut; CHANNELS],
}

impl StepOutputs {
    fn service(&mut self) {
        let [fl, fr, rl, rr, lift] = &mut self.channels;
        STEPPERS.service(&mut [fl, fr, rl, rr, lift]);
    }
}

pub struct ServoOutputs {
    channels: [SoftServo<GpioOut>; ServoId::COUNT],
}

impl ServoOutputs {
    fn service(&mut self) {
        let [claw, base, turntable] = &mut self.channels;
        SERVOS.service(&mut [claw, base, turntable]);
    }
}

#[app(
    device = stm32f7xx_hal::pac,
    peripherals = true,
    dispatchers = [UART4, UART5, UART7, UART8]
)]
mod app {
    use super::*;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        console: Usart<pac::USART3>,
        imu_rx: UsartRx<pac::USART2>,
        scan_rx: UsartRx<pac::USART1>,
        vision_rx: UsartRx<pac::USART6>,
        tick_timer: TickTimer<pac::TIM6>,
        step_outputs: StepOutputs,
        servo_outputs: ServoOutputs,
        motion_loop: MotionLoop<&'static StepperBank<CHANNELS>>,
        heading_provider: HeadingProvider,
        vision_consumer: VisionConsumer,
        arm: BoardArm,
        mission: MissionRunner<SharedIo<'static>, MonoDelay>,
        button: Button<StartButtonPin>,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        let dp: pac::Peripherals = cx.device;

        // Clocks
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();
        Mono::start(cx.core.SYST, clocks.sysclk().raw());

        let pins = BoardPins::new(dp.GPIOA, dp.GPIOC, dp.GPIOD, dp.GPIOE, dp.GPIOG);

        // USART3 (DBG) + logger
        let usart_cfg = Config {
            baud_rate: 115_200.bps(),
            ..Default::default()
        };
        let console = Usart::new(Serial::new(
            dp.USART3,
            (pins.usart3.tx, pins.usart3.rx),
            &clocks,
            usart_cfg,
        ));
        LOGGER.install();

        // Sensor links
        let (_, imu_rx) = Usart::with_rx(Serial::new(
            dp.USART2,
            (pins.usart2.tx, pins.usart2.rx),
            &clocks,
            Config {
                baud_rate: 115_200.bps(),
                ..Default::default()
            },
        ));
        let (_, scan_rx) = Usart::with_rx(Serial::new(
            dp.USART1,
            (pins.usart1.tx, pins.usart1.rx),
            &clocks,
            Config {
                baud_rate: 9_600.bps(),
                ..Default::default()
            },
        ));
        let (_, vision_rx) = Usart::with_rx(Serial::new(
            dp.USART6,
            (pins.usart6.tx, pins.usart6.rx),
            &clocks,
            Config {
                baud_rate: 115_200.bps(),
                ..Default::default()
            },
        ));

        // Steppers: right-side wheels are mounted mirrored
        let motion_cfg = MotionConfig::DEFAULT;
        let hz_per_unit = motion_cfg.step_hz_per_unit();
        let [m1, m2, m3, m4, m5] = pins.steppers;
        let mut enable = [m1.enable, m2.enable, m3.enable, m4.enable, m5.enable];
        for pin in enable.iter_mut() {
            let _ = embedded_hal::digital::OutputPin::set_low(pin);
        }
        let step_outputs = StepOutputs {
            channels: [
                StepChannel::new(m1.step, m1.dir, hz_per_unit, TICK_HZ),
                StepChannel::new(m2.step, m2.dir, hz_per_unit, TICK_HZ).reversed(),
                StepChannel::new(m3.step, m3.dir, hz_per_unit, TICK_HZ),
                StepChannel::new(m4.step, m4.dir, hz_per_unit, TICK_HZ).reversed(),
                StepChannel::new(m5.step, m5.dir, 1.0, TICK_HZ),
            ],
            _enable: enable,
        };

        let [claw, base, turntable] = pins.servos;
        let servo_outputs = ServoOutputs {
            channels: [
                SoftServo::new(claw, TICK_US),
                SoftServo::new(base, TICK_US),
                SoftServo::new(turntable, TICK_US),
            ],
        };

        let tick_timer = TickTimer::tim6(dp.TIM6, clocks.timclk1().raw(), TICK_HZ);

        let arm = Arm::new(
            &SERVOS,
            LiftChannel::new(&STEPPERS, LIFT_CHANNEL),
            MonoDelay,
            ArmConfig::DEFAULT,
        );

        info!("mecabot: up, sysclk {} Hz", clocks.sysclk().raw());

        motion::spawn().ok();
        heading::spawn().ok();
        vision::spawn().ok();
        scan::spawn().ok();
        mission::spawn().ok();
        arm::spawn().ok();
        start_button::spawn().ok();
        log_flush::spawn().ok();

        (
            Shared {},
            Local {
                console,
                imu_rx,
                scan_rx,
                vision_rx,
                tick_timer,
                step_outputs,
                servo_outputs,
                motion_loop: MotionLoop::new(MotionController::new(motion_cfg), &STEPPERS),
                heading_provider: HeadingProvider::new(&HeadingConfig::DEFAULT),
                vision_consumer: VisionConsumer::new(),
                arm,
                mission: MissionRunner::new(
                    SharedIo::new(&SHARED),
                    MonoDelay,
                    MissionConfig::DEFAULT,
                ),
                button: Button::active_low(pins.start),
            },
        )
    }

    #[task(binds = TIM6_DAC, priority = 7, local = [tick_timer, step_outputs, servo_outputs])]
    fn step_tick(cx: step_tick::Context) {
        cx.local.tick_timer.clear_interrupt();
        cx.local.step_outputs.service();
        cx.local.servo_outputs.service();
    }

    #[task(binds = USART2, priority = 6, local = [imu_rx])]
    fn usart2(cx: usart2::Context) {
        cx.local.imu_rx.drain(&SHARED.imu_rx);
    }

    #[task(binds = USART1, priority = 6, local = [scan_rx])]
    fn usart1(cx: usart1::Context) {
        cx.local.scan_rx.drain(&SHARED.scan_rx);
    }

    #[task(binds = USART6, priority = 6, local = [vision_rx])]
    fn usart6(cx: usart6::Context) {
        cx.local.vision_rx.drain(&SHARED.vision_rx);
    }

    #[task(priority = 4, local = [motion_loop])]
    async fn motion(cx: motion::Context) {
        cx.local.motion_loop.run(&SHARED, MonoDelay).await
    }

    #[task(priority = 3, local = [heading_provider])]
    async fn heading(cx: heading::Context) {
        cx.local.heading_provider.run(&SHARED).await
    }

    #[task(priority = 2, local = [vision_consumer])]
    async fn vision(cx: vision::Context) {
        cx.local.vision_consumer.run(&SHARED).await
    }

    #[task(priority = 2)]
    async fn scan(_cx: scan::Context) {
        tasks::scan::run(&SHARED).await
    }

    #[task(priority = 2, local = [mission])]
    async fn mission(cx: mission::Context) {
        cx.local.mission.run().await
    }

    #[task(priority = 1, local = [arm])]
    async fn arm(cx: arm::Context) {
        tasks::arm::run(cx.local.arm, &SHARED).await
    }

    #[task(priority = 1, local = [button])]
    async fn start_button(cx: start_button::Context) {
        tasks::start::run(cx.local.button, &SHARED, MonoDelay).await
    }

    #[task(priority = 1, local = [console])]
    async fn log_flush(cx: log_flush::Context) {
        loop {
            // The console write is blocking and infallible.
            let _ = LOGGER.drain(cx.local.console);
            Mono::delay(LOG_FLUSH_MS.millis()).await;
        }
    }
}
