//! Board bring-up: LED, EXTI, RTC, then the interrupt controller.

use core::fmt;

use heapless::Vec;

use crate::eclic::{self, EclicConfig};
use crate::error::Error;
use crate::exti::{self, ExtiConfig};
use crate::hardware::rgb_led::{Color, ColorLed};
use crate::hardware::traits::{ExtiRegs, IrqController, RtcRegs};
use crate::irq::{Irq, VectorTable};
use crate::rtc::{self, RtcConfig};

/// Register handles the boot sequence owns.
pub struct Peripherals<E, R, C> {
    pub exti: E,
    pub rtc: R,
    pub irq: C,
}

#[derive(Debug, Clone, Default)]
pub struct BoardConfig {
    pub exti: ExtiConfig,
    pub rtc: RtcConfig,
    pub eclic: EclicConfig,
}

impl BoardConfig {
    /// The button's vector has to be among the lines the controller enables, otherwise
    /// its edges latch but never reach a handler.
    fn check_button_vector(&self) -> Result<(), Error> {
        let line = self.exti.line();
        match Irq::for_line(line) {
            Some(irq) if self.eclic.lines.iter().any(|l| l.irq == irq) => Ok(()),
            Some(irq) => Err(Error::VectorDisabled(irq)),
            None => Err(Error::InvalidPin(line.number())),
        }
    }
}

/// Boot sequence stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Led,
    Exti,
    Rtc,
    Eclic,
}

impl Step {
    pub const COUNT: usize = 4;
}

/// Every stage that failed during [`init`], in boot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitError {
    failures: Vec<(Step, Error), { Step::COUNT }>,
}

impl InitError {
    fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    fn record(&mut self, step: Step, result: Result<(), Error>) {
        if let Err(err) = result {
            error!("{} failed: {}", step, err);
            // Each step records at most once and there are `Step::COUNT` steps.
            let _ = self.failures.push((step, err));
        }
    }

    pub fn failures(&self) -> &[(Step, Error)] {
        &self.failures
    }

    pub fn failed(&self, step: Step) -> Option<Error> {
        self.failures
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, err)| *err)
    }

    fn into_result(self) -> Result<(), InitError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "board init failed:")?;
        for (step, err) in &self.failures {
            write!(f, " [{:?}: {}]", step, err)?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InitError {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "board init failed:");
        for (step, err) in &self.failures {
            defmt::write!(f, " [{}: {}]", step, err);
        }
    }
}

/// Bring the board up in a fixed order: LED off, EXTI, RTC, interrupt controller.
///
/// EXTI and RTC are configured before the controller enables interrupts, so no edge or tick
/// reaches a half-configured handler. A failing step does not stop the later ones; all
/// failures are collected into the returned [`InitError`].
pub fn init<E, R, C, L, Ctx>(
    p: &mut Peripherals<E, R, C>,
    led: &mut L,
    config: &BoardConfig,
    vectors: &VectorTable<Ctx>,
) -> Result<(), InitError>
where
    E: ExtiRegs,
    R: RtcRegs,
    C: IrqController,
    L: ColorLed,
{
    let mut status = InitError::new();

    status.record(Step::Led, led.init());
    led.set_color(Color::Black);

    status.record(Step::Exti, exti::configure(&mut p.exti, &config.exti));
    status.record(Step::Rtc, rtc::configure(&mut p.rtc, &config.rtc));
    status.record(
        Step::Eclic,
        config
            .check_button_vector()
            .and_then(|()| eclic::configure(&mut p.irq, &config.eclic, vectors)),
    );

    status.into_result()?;
    info!("board ready, RTC tick {} Hz", config.rtc.tick_hz());
    Ok(())
}
