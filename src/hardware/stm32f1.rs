//! Register backends for the STM32F103 through the embassy-stm32 PAC.
//!
//! The GD32VF103 peripherals these drivers were written against share this register layout
//! (RCU = RCC, PMU = PWR). The 4-bit level/priority field is mapped onto the NVIC, whose
//! priority grouping works the same way with the urgency order reversed.

use embassy_stm32::interrupt::{self, InterruptExt, Priority};
use embassy_stm32::pac;
use embassy_stm32::pac::gpio::vals::{CnfIn, Mode};
use embassy_stm32::pac::rcc::vals::Rtcsel;

use super::traits::{ExtiRegs, IrqController, RtcRegs};
use crate::eclic::{CTL_BITS, PriorityGroup};
use crate::exti::{ExtiLine, ExtiMode, InputMode, Pin, Port, Speed, Trigger};
use crate::irq::Irq;
use crate::rtc::{RtcEvent, RtcEvents};

const AIRCR_VECTKEY: u32 = 0x05FA << 16;

fn gpio(port: Port) -> pac::gpio::Gpio {
    match port {
        Port::A => pac::GPIOA,
        Port::B => pac::GPIOB,
        Port::C => pac::GPIOC,
        Port::D => pac::GPIOD,
        Port::E => pac::GPIOE,
    }
}

/// GPIO, AFIO and EXTI blocks.
#[derive(Clone, Copy, Default)]
pub struct PacExti;

impl ExtiRegs for PacExti {
    fn enable_port_clock(&mut self, port: Port) {
        pac::RCC.apb2enr().modify(|w| match port {
            Port::A => w.set_gpioaen(true),
            Port::B => w.set_gpioben(true),
            Port::C => w.set_gpiocen(true),
            Port::D => w.set_gpioden(true),
            Port::E => w.set_gpioeen(true),
        });
    }

    fn configure_input(&mut self, pin: Pin, mode: InputMode, _speed: Speed) {
        // Input mode has no slew control; speed only applies once the pin becomes an output.
        let port = gpio(pin.port());
        let n = pin.index() as usize;

        match mode {
            InputMode::PullUp => port.bsrr().write(|w| w.set_bs(n, true)),
            InputMode::PullDown => port.bsrr().write(|w| w.set_br(n, true)),
            InputMode::Floating => {}
        }

        let cnf = match mode {
            InputMode::Floating => CnfIn::FLOATING,
            InputMode::PullUp | InputMode::PullDown => CnfIn::PULL,
        };
        port.cr(n / 8).modify(|w| {
            w.set_mode(n % 8, Mode::INPUT);
            w.set_cnf_in(n % 8, cnf);
        });
    }

    fn enable_afio_clock(&mut self) {
        pac::RCC.apb2enr().modify(|w| w.set_afioen(true));
    }

    fn select_source(&mut self, pin: Pin) {
        let n = pin.index() as usize;
        pac::AFIO
            .exticr(n / 4)
            .modify(|w| w.set_exti(n % 4, pin.port().index()));
    }

    fn configure_line(&mut self, line: ExtiLine, mode: ExtiMode, trigger: Trigger) {
        let n = line.number() as usize;
        let interrupt = mode == ExtiMode::Interrupt;

        pac::EXTI.imr(0).modify(|w| w.set_line(n, interrupt));
        pac::EXTI.emr(0).modify(|w| w.set_line(n, !interrupt));
        pac::EXTI.rtsr(0).modify(|w| w.set_line(n, trigger.rising()));
        pac::EXTI.ftsr(0).modify(|w| w.set_line(n, trigger.falling()));
    }

    fn is_pending(&self, line: ExtiLine) -> bool {
        pac::EXTI.pr(0).read().line(line.number() as usize)
    }

    fn clear_pending(&mut self, line: ExtiLine) {
        // Write-one-to-clear.
        pac::EXTI
            .pr(0)
            .write(|w| w.set_line(line.number() as usize, true));
    }
}

/// RCC backup-domain control, PWR and RTC blocks.
#[derive(Clone, Copy, Default)]
pub struct PacRtc;

impl PacRtc {
    /// PRL, CNT and ALR are only writable with CNF set; the write is committed when it clears.
    fn in_config_mode(&mut self, f: impl FnOnce()) {
        pac::RTC.crl().modify(|w| w.set_cnf(true));
        f();
        pac::RTC.crl().modify(|w| w.set_cnf(false));
    }
}

impl RtcRegs for PacRtc {
    fn enable_backup_clocks(&mut self) {
        pac::RCC.apb1enr().modify(|w| {
            w.set_bkpen(true);
            w.set_pwren(true);
        });
    }

    fn unlock_backup_domain(&mut self) {
        pac::PWR.cr().modify(|w| w.set_dbp(true));
    }

    fn reset_backup_domain(&mut self) {
        pac::RCC.bdcr().modify(|w| w.set_bdrst(true));
        pac::RCC.bdcr().modify(|w| w.set_bdrst(false));
    }

    fn start_lxtal(&mut self) {
        pac::RCC.bdcr().modify(|w| w.set_lseon(true));
    }

    fn lxtal_stable(&self) -> bool {
        pac::RCC.bdcr().read().lserdy()
    }

    fn select_lxtal_clock(&mut self) {
        pac::RCC.bdcr().modify(|w| w.set_rtcsel(Rtcsel::LSE));
    }

    fn enable_rtc_clock(&mut self) {
        pac::RCC.bdcr().modify(|w| w.set_rtcen(true));
    }

    fn clear_sync_flag(&mut self) {
        pac::RTC.crl().modify(|w| w.set_rsf(false));
    }

    fn registers_synced(&self) -> bool {
        pac::RTC.crl().read().rsf()
    }

    fn write_complete(&self) -> bool {
        pac::RTC.crl().read().rtoff()
    }

    fn write_prescaler(&mut self, reload: u32) {
        self.in_config_mode(|| {
            pac::RTC
                .prlh()
                .write(|w| w.set_prlh(((reload >> 16) & 0x0F) as u8));
            pac::RTC.prll().write(|w| w.set_prll(reload as u16));
        });
    }

    fn write_alarm(&mut self, value: u32) {
        self.in_config_mode(|| {
            pac::RTC.alrh().write(|w| w.set_alrh((value >> 16) as u16));
            pac::RTC.alrl().write(|w| w.set_alrl(value as u16));
        });
    }

    fn enable_interrupt(&mut self, event: RtcEvent) {
        pac::RTC.crh().modify(|w| match event {
            RtcEvent::Second => w.set_secie(true),
            RtcEvent::Alarm => w.set_alrie(true),
            RtcEvent::Overflow => w.set_owie(true),
        });
    }

    fn flag(&self, event: RtcEvent) -> bool {
        let crl = pac::RTC.crl().read();
        match event {
            RtcEvent::Second => crl.secf(),
            RtcEvent::Alarm => crl.alrf(),
            RtcEvent::Overflow => crl.owf(),
        }
    }

    fn clear_flag(&mut self, event: RtcEvent) {
        // Flags are write-zero-to-clear. A plain write with every other flag at one cannot
        // drop a flag that sets between a read and the write back. CNF stays zero.
        let keep = RtcEvents::ALL.without(event);
        pac::RTC.crl().write(|w| {
            w.set_rsf(true);
            w.set_secf(keep.contains(RtcEvent::Second));
            w.set_alrf(keep.contains(RtcEvent::Alarm));
            w.set_owf(keep.contains(RtcEvent::Overflow));
        });
    }

    fn counter(&self) -> u32 {
        loop {
            let high = pac::RTC.cnth().read().cnth();
            let low = pac::RTC.cntl().read().cntl();
            // Retry if the low half carried into the high half between the two reads.
            if pac::RTC.cnth().read().cnth() == high {
                return (u32::from(high) << 16) | u32::from(low);
            }
        }
    }
}

/// NVIC with 4 implemented priority bits.
pub struct NvicController {
    group: PriorityGroup,
}

impl NvicController {
    pub const fn new() -> Self {
        Self {
            group: PriorityGroup::Level1Prio3,
        }
    }

    fn vector(irq: Irq) -> interrupt::Interrupt {
        match irq {
            Irq::Exti0 => interrupt::EXTI0,
            Irq::Exti1 => interrupt::EXTI1,
            Irq::Exti2 => interrupt::EXTI2,
            Irq::Exti3 => interrupt::EXTI3,
            Irq::Exti4 => interrupt::EXTI4,
            Irq::Exti5To9 => interrupt::EXTI9_5,
            Irq::Exti10To15 => interrupt::EXTI15_10,
            Irq::Rtc => interrupt::RTC,
        }
    }
}

impl Default for NvicController {
    fn default() -> Self {
        Self::new()
    }
}

impl IrqController for NvicController {
    fn set_priority_group(&mut self, group: PriorityGroup) {
        self.group = group;
        // PRIGROUP n puts bits [n:0] in the subpriority; implemented bits are [7:4].
        let prigroup = 3 + u32::from(group.priority_bits());
        // SAFETY: AIRCR is only written here, before any handler is enabled.
        unsafe {
            (*cortex_m::peripheral::SCB::PTR)
                .aircr
                .write(AIRCR_VECTKEY | (prigroup << 8));
        }
    }

    fn enable_irq(&mut self, irq: Irq, level: u8, priority: u8) {
        // A higher control value is more urgent; on the NVIC a lower number is.
        let ctl = self.group.encode(level, priority);
        let max = (1u8 << CTL_BITS) - 1;
        let vector = Self::vector(irq);

        vector.set_priority(Priority::from((max - ctl) << (8 - CTL_BITS)));
        vector.unpend();
        // SAFETY: the handler for this line is present in the vector table.
        unsafe { vector.enable() };
    }

    fn enable_global(&mut self) {
        // SAFETY: called once, at the end of the boot sequence.
        unsafe { cortex_m::interrupt::enable() };
    }
}
