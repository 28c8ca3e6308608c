//! Interrupt-driven RGB LED on an STM32F103 with a Longan Nano pinout
//! =============================================================================================
//!
//! Two interrupt lines drive the LED; the main task only reports status.
//! - Button edge (PA8, EXTI line 8, both edges)  -> toggles green
//! - RTC counter tick (LXTAL / 8192 = 4 Hz)        -> toggles red
//!
//! Hardware Connections:
//!   RGB LED (common anode, active low)
//!      R -> PC13
//!      G -> PA1
//!      B -> PA2
//!
//!   Button:
//!      PA8 (floating input, external pull resistor)
//!
//!   32768 Hz crystal on OSC32_IN / OSC32_OUT
//!
//! Expected Behavior:
//!   - Red LED blinks at 2 Hz (toggled 4 times per second)
//!   - Green LED changes state on every press and every release
//!   - RTC counter and LED state are logged via defmt RTT every second

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::interrupt;
use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embassy_time::{Duration, Ticker};
use longan_irq::exti::ExtiConfig;
use longan_irq::hardware::gpio_led::GpioLed;
use longan_irq::hardware::stm32f1::{NvicController, PacExti, PacRtc};
use longan_irq::hardware::traits::RtcRegs;
use longan_irq::{
    BoardConfig, Color, ColorLed, Error, Irq, IrqContext, Peripherals, RgbLed, VectorTable,
    board, irq,
};
use {defmt_rtt as _, panic_probe as _};

type BoardLed = RgbLed<GpioLed<Output<'static>>>;
type Context = IrqContext<PacExti, PacRtc, SharedLed>;

// LED channels, shared between the boot sequence, the handlers and the status loop
static LED: Mutex<CriticalSectionRawMutex, RefCell<Option<BoardLed>>> =
    Mutex::new(RefCell::new(None));

static VECTORS: VectorTable<Context> = irq::default_table();

// Arms the EXTI line at boot and tells the handlers which line is the button
const BUTTON: ExtiConfig = ExtiConfig::button(ExtiConfig::BOOT_BUTTON);

/// Handle to the LED singleton; every access is one short critical section.
struct SharedLed;

impl SharedLed {
    fn with<T>(&self, f: impl FnOnce(&mut BoardLed) -> T) -> Option<T> {
        LED.lock(|cell| cell.borrow_mut().as_mut().map(f))
    }
}

impl ColorLed for SharedLed {
    fn init(&mut self) -> Result<(), Error> {
        self.with(|led| led.init())
            .unwrap_or(Err(Error::LedUnavailable))
    }

    fn set_color(&mut self, color: Color) {
        self.with(|led| led.set_color(color));
    }

    fn toggle(&mut self, color: Color) {
        self.with(|led| led.toggle(color));
    }

    fn color(&self) -> Color {
        self.with(|led| led.color()).unwrap_or(Color::Black)
    }
}

fn context() -> Context {
    IrqContext::new(PacExti, PacRtc, SharedLed).with_button(BUTTON.line())
}

#[interrupt]
fn EXTI9_5() {
    VECTORS.dispatch(Irq::Exti5To9, &mut context());
}

#[interrupt]
fn RTC() {
    VECTORS.dispatch(Irq::Rtc, &mut context());
}

/// Main application entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    // Initialize peripherals with default configuration
    let p = embassy_stm32::init(Default::default());
    info!("longan_irq starting");

    // Common-anode LED: High = off
    let red = GpioLed::new(Output::new(p.PC13, Level::High, Speed::Low));
    let green = GpioLed::new(Output::new(p.PA1, Level::High, Speed::Low));
    let blue = GpioLed::new(Output::new(p.PA2, Level::High, Speed::Low));
    LED.lock(|cell| *cell.borrow_mut() = Some(RgbLed::new(red, green, blue)));

    // EXTI and RTC lines stay masked in the NVIC until the boot sequence enables them
    let mut peripherals = Peripherals {
        exti: PacExti,
        rtc: PacRtc,
        irq: NvicController::new(),
    };
    let config = BoardConfig {
        exti: BUTTON,
        ..BoardConfig::default()
    };

    if let Err(err) = board::init(&mut peripherals, &mut SharedLed, &config, &VECTORS) {
        error!("{}", err);
    }

    // Status loop; all LED activity happens in the handlers
    let mut ticker = Ticker::every(Duration::from_secs(1));
    loop {
        ticker.next().await;
        info!(
            "RTC counter {}, LED {}",
            peripherals.rtc.counter(),
            SharedLed.color()
        );
    }
}
