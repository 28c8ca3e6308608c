//! Interrupt vectors and their handlers.
//!
//! The fixed-name entry points (`EXTI9_5`, `RTC`) only build an [`IrqContext`] and forward
//! to a static [`VectorTable`]. The table is checked for duplicate vectors when it is built,
//! which for a `static` means at compile time, and the interrupt controller setup refuses
//! to enable a line the table has no handler for.

use crate::exti::{ExtiConfig, ExtiLine};
use crate::hardware::rgb_led::{Color, ColorLed};
use crate::hardware::traits::{ExtiRegs, RtcRegs};
use crate::rtc::RtcEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Irq {
    Exti0,
    Exti1,
    Exti2,
    Exti3,
    Exti4,
    Exti5To9,
    Exti10To15,
    Rtc,
}

impl Irq {
    pub const COUNT: usize = 8;

    const fn index(self) -> usize {
        self as usize
    }

    /// Vector an EXTI line is delivered on. Lines above 15 have no GPIO vector.
    pub const fn for_line(line: ExtiLine) -> Option<Irq> {
        match line.number() {
            0 => Some(Irq::Exti0),
            1 => Some(Irq::Exti1),
            2 => Some(Irq::Exti2),
            3 => Some(Irq::Exti3),
            4 => Some(Irq::Exti4),
            5..=9 => Some(Irq::Exti5To9),
            10..=15 => Some(Irq::Exti10To15),
            _ => None,
        }
    }

    /// First and last EXTI line sharing this vector.
    pub const fn exti_lines(self) -> Option<(u8, u8)> {
        match self {
            Irq::Exti0 => Some((0, 0)),
            Irq::Exti1 => Some((1, 1)),
            Irq::Exti2 => Some((2, 2)),
            Irq::Exti3 => Some((3, 3)),
            Irq::Exti4 => Some((4, 4)),
            Irq::Exti5To9 => Some((5, 9)),
            Irq::Exti10To15 => Some((10, 15)),
            Irq::Rtc => None,
        }
    }
}

pub type Handler<Ctx> = fn(&mut Ctx);

/// Maps each interrupt vector to at most one handler.
pub struct VectorTable<Ctx> {
    handlers: [Option<Handler<Ctx>>; Irq::COUNT],
}

impl<Ctx> VectorTable<Ctx> {
    /// Panics on a duplicate vector, which fails the build when used in a `static`.
    pub const fn new(entries: &[(Irq, Handler<Ctx>)]) -> Self {
        let mut handlers: [Option<Handler<Ctx>>; Irq::COUNT] = [None; Irq::COUNT];
        let mut i = 0;
        while i < entries.len() {
            let (irq, handler) = entries[i];
            if handlers[irq.index()].is_some() {
                panic!("interrupt vector registered twice");
            }
            handlers[irq.index()] = Some(handler);
            i += 1;
        }
        Self { handlers }
    }

    pub const fn has_handler(&self, irq: Irq) -> bool {
        self.handlers[irq.index()].is_some()
    }

    /// Run the handler for `irq`. Returns `false` if there is none.
    pub fn dispatch(&self, irq: Irq, ctx: &mut Ctx) -> bool {
        match self.handlers[irq.index()] {
            Some(handler) => {
                handler(ctx);
                true
            }
            None => {
                warn!("no handler for {}", irq);
                false
            }
        }
    }
}

/// Everything a handler may touch.
pub struct IrqContext<E, R, L> {
    pub exti: E,
    pub rtc: R,
    pub led: L,
    /// EXTI line the button is wired to.
    pub button: ExtiLine,
}

impl<E, R, L> IrqContext<E, R, L> {
    pub fn new(exti: E, rtc: R, led: L) -> Self {
        Self {
            exti,
            rtc,
            led,
            button: ExtiConfig::BOOT_BUTTON.exti_line(),
        }
    }

    pub fn with_button(mut self, button: ExtiLine) -> Self {
        self.button = button;
        self
    }
}

/// Service every pending line sharing `irq`.
///
/// The button line toggles the green LED. Any other pending line in the group is not armed
/// by this firmware; its flag is cleared so the vector does not fire again immediately.
pub fn service_exti<E, R, L>(ctx: &mut IrqContext<E, R, L>, irq: Irq)
where
    E: ExtiRegs,
    L: ColorLed,
{
    let Some((first, last)) = irq.exti_lines() else {
        return;
    };

    for number in first..=last {
        let Some(line) = ExtiLine::new(number) else {
            continue;
        };
        if !ctx.exti.is_pending(line) {
            continue;
        }
        ctx.exti.clear_pending(line);

        if line == ctx.button {
            ctx.led.toggle(Color::Green);
            trace!("button edge, LED now {}", ctx.led.color());
        } else {
            warn!("cleared stray EXTI line {}", number);
        }
    }
}

/// EXTI lines 5 to 9.
pub fn on_exti5_9<E, R, L>(ctx: &mut IrqContext<E, R, L>)
where
    E: ExtiRegs,
    L: ColorLed,
{
    service_exti(ctx, Irq::Exti5To9);
}

/// RTC second, alarm and overflow flags.
pub fn on_rtc<E, R, L>(ctx: &mut IrqContext<E, R, L>)
where
    R: RtcRegs,
    L: ColorLed,
{
    if ctx.rtc.flag(RtcEvent::Second) {
        ctx.rtc.clear_flag(RtcEvent::Second);
        ctx.led.toggle(Color::Red);
        trace!("tick {}", ctx.rtc.counter());
    }

    if ctx.rtc.flag(RtcEvent::Alarm) {
        ctx.rtc.clear_flag(RtcEvent::Alarm);
        info!("RTC alarm at {}", ctx.rtc.counter());
    }

    if ctx.rtc.flag(RtcEvent::Overflow) {
        ctx.rtc.clear_flag(RtcEvent::Overflow);
        warn!("RTC counter wrapped");
    }
}

/// Button on `Exti5To9`, tick on `Rtc`.
pub const fn default_table<E, R, L>() -> VectorTable<IrqContext<E, R, L>>
where
    E: ExtiRegs,
    R: RtcRegs,
    L: ColorLed,
{
    VectorTable::new(&[
        (
            Irq::Exti5To9,
            on_exti5_9::<E, R, L> as Handler<IrqContext<E, R, L>>,
        ),
        (Irq::Rtc, on_rtc::<E, R, L> as Handler<IrqContext<E, R, L>>),
    ])
}
